//! The clause driver: tries pattern → action clauses in order against one
//! scrutinee.
//!
//! [`match_value`] opens a match; each [`Match::clause`] call tries its
//! pattern immediately (clauses after the first success are skipped, and
//! their user callables never run); [`Match::eval`] closes the match in
//! expression form, [`Match::run`] in statement form.
//!
//! Every clause attempt resets the identifier cells its pattern
//! references — on failure, on success after the action has read them,
//! and on unwind if a user callable or the action panics — so cells are
//! empty again by the time the driver returns, whatever happened.

use std::marker::PhantomData;

use thiserror::Error;

use crate::combinators::guarded;
use crate::pattern::{match_pattern, IdOutcome, Pattern};

/// Error produced by an expression-form match with no satisfying clause.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// No clause matched the scrutinee.
    #[error("no patterns got matched")]
    NoMatch,
}

/// Cancels a clause's identifier cells on every exit path, including
/// unwinding out of user code.
struct ClauseReset<'p, 'v, V: ?Sized, P: Pattern<'v, V>> {
    pattern: &'p P,
    _scrutinee: PhantomData<&'v V>,
}

impl<'p, 'v, V: ?Sized, P: Pattern<'v, V>> ClauseReset<'p, 'v, V, P> {
    fn new(pattern: &'p P) -> Self {
        Self {
            pattern,
            _scrutinee: PhantomData,
        }
    }
}

impl<'p, 'v, V: ?Sized, P: Pattern<'v, V>> Drop for ClauseReset<'p, 'v, V, P> {
    fn drop(&mut self) {
        self.pattern.process_id(0, IdOutcome::Cancel);
    }
}

/// An in-progress match over a borrowed scrutinee.
///
/// Built by [`match_value`]; consumed by [`Match::eval`] or
/// [`Match::run`]. All clauses must produce the same result type.
pub struct Match<'v, V: ?Sized, R> {
    scrutinee: &'v V,
    outcome: Option<R>,
}

/// Opens a match over `scrutinee`.
pub fn match_value<'v, V: ?Sized, R>(scrutinee: &'v V) -> Match<'v, V, R> {
    Match {
        scrutinee,
        outcome: None,
    }
}

impl<'v, V: ?Sized, R> Match<'v, V, R> {
    /// Tries one clause: if no earlier clause matched, match `pattern` and
    /// on success run `action` while the pattern's captures are live.
    ///
    /// The action's captures become invalid when it returns; cells are
    /// reset before `clause` hands the match back.
    pub fn clause<P, F>(mut self, pattern: P, action: F) -> Self
    where
        P: Pattern<'v, V>,
        F: FnOnce() -> R,
    {
        if self.outcome.is_some() {
            return self;
        }
        let reset = ClauseReset::new(&pattern);
        if match_pattern(self.scrutinee, &pattern, 0) {
            self.outcome = Some(action());
        }
        drop(reset);
        self
    }

    /// Tries a guarded clause; shorthand for
    /// `clause(guarded(pattern, guard), action)`.
    pub fn guarded<P, G, F>(self, pattern: P, guard: G, action: F) -> Self
    where
        P: Pattern<'v, V>,
        G: Fn() -> bool,
        F: FnOnce() -> R,
    {
        self.clause(guarded(pattern, guard), action)
    }

    /// Expression form: the result of the first matching clause's action,
    /// or [`MatchError::NoMatch`] if no clause matched.
    pub fn eval(self) -> Result<R, MatchError> {
        self.outcome.ok_or(MatchError::NoMatch)
    }

    /// Statement form: the result of the first matching clause's action,
    /// if any. A mismatch is not an error.
    pub fn run(self) -> Option<R> {
        self.outcome
    }
}
