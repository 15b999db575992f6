//! Variant adaptors for the standard sum types.
//!
//! Thin wrappers that destructure one `Option`/`Result` variant and hand
//! the payload to an inner pattern at the next depth. They exist so the
//! common cases read like the match they replace:
//!
//! ```
//! use casework::prelude::*;
//!
//! fn square(opt: &Option<i32>) -> i32 {
//!     let x: Id<i32> = Id::new();
//!     match_value(opt)
//!         .clause(some(&x), || x.get() * x.get())
//!         .clause(none(), || 0)
//!         .eval()
//!         .expect("clauses are exhaustive")
//! }
//!
//! assert_eq!(square(&Some(5)), 25);
//! assert_eq!(square(&None), 0);
//! ```

use crate::pattern::{match_pattern, IdOutcome, Pattern};

/// Matches `Some(payload)` iff the inner pattern matches the payload.
pub struct SomeOf<P>(P);

/// Builds an `Option::Some` pattern.
#[inline]
pub fn some<P>(inner: P) -> SomeOf<P> {
    SomeOf(inner)
}

impl<'v, T, P> Pattern<'v, Option<T>> for SomeOf<P>
where
    P: Pattern<'v, T>,
{
    fn match_value(&self, value: &'v Option<T>, depth: usize) -> bool {
        match value {
            Some(payload) => match_pattern(payload, &self.0, depth + 1),
            None => false,
        }
    }

    fn process_id(&self, depth: usize, outcome: IdOutcome) {
        self.0.process_id(depth, outcome);
    }
}

/// Matches `Option::None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneOf;

/// Builds an `Option::None` pattern.
#[inline]
pub fn none() -> NoneOf {
    NoneOf
}

impl<'v, T> Pattern<'v, Option<T>> for NoneOf {
    #[inline]
    fn match_value(&self, value: &'v Option<T>, _depth: usize) -> bool {
        value.is_none()
    }

    #[inline]
    fn process_id(&self, _depth: usize, _outcome: IdOutcome) {}
}

/// Matches `Ok(payload)` iff the inner pattern matches the payload.
pub struct OkOf<P>(P);

/// Builds a `Result::Ok` pattern.
#[inline]
pub fn ok<P>(inner: P) -> OkOf<P> {
    OkOf(inner)
}

impl<'v, T, E, P> Pattern<'v, Result<T, E>> for OkOf<P>
where
    P: Pattern<'v, T>,
{
    fn match_value(&self, value: &'v Result<T, E>, depth: usize) -> bool {
        match value {
            Ok(payload) => match_pattern(payload, &self.0, depth + 1),
            Err(_) => false,
        }
    }

    fn process_id(&self, depth: usize, outcome: IdOutcome) {
        self.0.process_id(depth, outcome);
    }
}

/// Matches `Err(payload)` iff the inner pattern matches the payload.
pub struct ErrOf<P>(P);

/// Builds a `Result::Err` pattern.
#[inline]
pub fn err<P>(inner: P) -> ErrOf<P> {
    ErrOf(inner)
}

impl<'v, T, E, P> Pattern<'v, Result<T, E>> for ErrOf<P>
where
    P: Pattern<'v, E>,
{
    fn match_value(&self, value: &'v Result<T, E>, depth: usize) -> bool {
        match value {
            Ok(_) => false,
            Err(payload) => match_pattern(payload, &self.0, depth + 1),
        }
    }

    fn process_id(&self, depth: usize, outcome: IdOutcome) {
        self.0.process_id(depth, outcome);
    }
}
