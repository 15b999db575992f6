//! Identifier cells: the capture slots of the pattern algebra.
//!
//! An [`Id`] is declared by user code in the scope enclosing a match and
//! referenced from patterns with `&cell`. During matching the cell is
//! provisionally filled; the enclosing clause confirms the binding on
//! success and rolls it back on failure, so after every clause — matched
//! or not — the cell is empty again.
//!
//! # Invariants
//! - A cell is empty on entry to the clause driver.
//! - While matching, at most one binding exists; re-encountering the same
//!   cell with an equal value succeeds, with any other value fails.
//! - The recorded depth tracks where the binding was made so that rollback
//!   of a failed subtree (`reset(depth)`) leaves shallower bindings alone.
//!
//! # Capture storage
//! Captures are stored owned (`T: Clone`). To observe a large or
//! non-clonable value in place, capture the reference itself: an
//! `Id<&T>` used where a `T` is being matched stores the `&T` pointing
//! into the scrutinee's live storage. Temporaries produced by `app` can
//! only be captured owned; the matcher's lifetime bounds reject borrowing
//! from them at compile time.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::marker::PhantomData;

use thiserror::Error;

use crate::pattern::{match_pattern, IdOutcome, Pattern};

/// Error raised by the fallible identifier accessors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    /// The cell holds no value; either no clause has matched yet or the
    /// clause that bound it has already finished.
    #[error("identifier read outside a successful match")]
    Unbound,
}

/// Equality hook used when a bound cell re-encounters a value.
///
/// The hook is keyed by the captured type and plugged into [`Id`] as a
/// type parameter, so one match may compare floats tolerantly while
/// another compares them exactly.
pub trait CaptureEq<T> {
    /// Whether the previously captured value and a newly matched value
    /// should be considered the same capture.
    fn equal(held: &T, incoming: &T) -> bool;
}

/// Default equality policy: defer to `PartialEq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactEq;

impl<T: PartialEq> CaptureEq<T> for ExactEq {
    #[inline]
    fn equal(held: &T, incoming: &T) -> bool {
        held == incoming
    }
}

/// Internal cell state: the optional captured value plus the recursion
/// depth the binding was made at.
struct Slot<T> {
    value: Option<T>,
    depth: usize,
}

/// An identifier cell capturing a `T`, compared on re-encounter with the
/// policy `E`.
///
/// Declare cells with [`Id::new`] before building clauses, reference them
/// from patterns as `&cell`, and read them inside the clause's action:
///
/// ```
/// use casework::prelude::*;
///
/// let x: Id<i32> = Id::new();
/// let doubled = match_value(&21)
///     .clause(&x, || x.get() * 2)
///     .run();
/// assert_eq!(doubled, Some(42));
/// assert!(!x.is_bound());
/// ```
pub struct Id<T, E = ExactEq> {
    slot: RefCell<Slot<T>>,
    _eq: PhantomData<E>,
}

impl<T, E> Id<T, E> {
    /// Creates an empty cell.
    pub fn new() -> Self {
        Self {
            slot: RefCell::new(Slot {
                value: None,
                depth: 0,
            }),
            _eq: PhantomData,
        }
    }

    /// Whether the cell currently holds a binding.
    pub fn is_bound(&self) -> bool {
        self.slot.borrow().value.is_some()
    }

    /// Reads the captured value.
    ///
    /// # Panics
    /// Panics with [`IdError::Unbound`] if the cell is empty; only call
    /// this from a clause's action (or guard), where the binding is live.
    pub fn value(&self) -> Ref<'_, T> {
        self.try_value()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Reads the captured value, or reports that the cell is empty.
    pub fn try_value(&self) -> Result<Ref<'_, T>, IdError> {
        let slot = self.slot.borrow();
        if slot.value.is_none() {
            return Err(IdError::Unbound);
        }
        Ok(Ref::map(slot, |slot| {
            slot.value.as_ref().expect("checked above")
        }))
    }

    /// Clones the captured value out of the cell.
    ///
    /// # Panics
    /// Panics with [`IdError::Unbound`] if the cell is empty.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value().clone()
    }

    /// Moves the captured value out, leaving the cell empty.
    ///
    /// # Panics
    /// Panics with [`IdError::Unbound`] if the cell is empty.
    pub fn take(&self) -> T {
        self.slot
            .borrow_mut()
            .value
            .take()
            .unwrap_or_else(|| panic!("{}", IdError::Unbound))
    }

    /// Constrains this cell with another pattern: `cell.at(p)` matches
    /// iff `p` matches and the cell can capture (or re-match) the value.
    pub fn at<P>(&self, pattern: P) -> At<'_, T, E, P> {
        At { id: self, pattern }
    }

    /// Binds the value if the cell is empty, otherwise compares against
    /// the held value with the `E` policy. The depth is recorded by the
    /// confirm that immediately follows a successful sub-match.
    pub(crate) fn capture(&self, incoming: T) -> bool
    where
        E: CaptureEq<T>,
    {
        let mut slot = self.slot.borrow_mut();
        match &slot.value {
            Some(held) => E::equal(held, &incoming),
            None => {
                slot.value = Some(incoming);
                true
            }
        }
    }

    /// Rolls back the binding iff it was made at `depth` or deeper.
    pub(crate) fn reset(&self, depth: usize) {
        let mut slot = self.slot.borrow_mut();
        if slot.depth >= depth {
            slot.value = None;
            slot.depth = depth;
        }
    }

    /// Promotes the binding to `depth` so it survives rollbacks of deeper
    /// siblings. Fresh cells (recorded depth 0) adopt the confirming depth.
    pub(crate) fn confirm(&self, depth: usize) {
        let mut slot = self.slot.borrow_mut();
        if slot.depth > depth || slot.depth == 0 {
            slot.depth = depth;
        }
    }

    #[inline]
    pub(crate) fn apply_outcome(&self, depth: usize, outcome: IdOutcome) {
        match outcome {
            IdOutcome::Confirm => self.confirm(depth),
            IdOutcome::Cancel => self.reset(depth),
        }
    }
}

impl<T, E> Default for Id<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Id<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("Id")
            .field("value", &slot.value)
            .field("depth", &slot.depth)
            .finish()
    }
}

/// Owned capture: the cell clones the matched value in.
impl<'v, T: Clone, E: CaptureEq<T>> Pattern<'v, T> for Id<T, E> {
    #[inline]
    fn match_value(&self, value: &'v T, _depth: usize) -> bool {
        self.capture(value.clone())
    }

    #[inline]
    fn process_id(&self, depth: usize, outcome: IdOutcome) {
        self.apply_outcome(depth, outcome);
    }
}

/// Borrow capture: an `Id<&T>` matched against a `T` stores the reference
/// itself, observing the scrutinee's live storage without cloning. Only
/// lvalue positions (the scrutinee and `proj`ections of it) can be
/// captured this way; `app` temporaries do not live long enough, which
/// the borrow checker enforces.
impl<'v, T, E> Pattern<'v, T> for Id<&'v T, E>
where
    T: ?Sized,
    E: CaptureEq<&'v T>,
{
    #[inline]
    fn match_value(&self, value: &'v T, _depth: usize) -> bool {
        self.capture(value)
    }

    #[inline]
    fn process_id(&self, depth: usize, outcome: IdOutcome) {
        self.apply_outcome(depth, outcome);
    }
}

/// `cell.at(pattern)`: conjunction of a pattern and a capture of the same
/// value, with both children matched at `depth + 1` like any `and_`.
#[derive(Debug)]
pub struct At<'i, T, E, P> {
    id: &'i Id<T, E>,
    pattern: P,
}

impl<'v, 'i, T, E, P> Pattern<'v, T> for At<'i, T, E, P>
where
    T: Clone,
    E: CaptureEq<T>,
    P: Pattern<'v, T>,
{
    fn match_value(&self, value: &'v T, depth: usize) -> bool {
        match_pattern(value, &self.pattern, depth + 1)
            && match_pattern(value, self.id, depth + 1)
    }

    fn process_id(&self, depth: usize, outcome: IdOutcome) {
        self.pattern.process_id(depth, outcome);
        self.id.apply_outcome(depth, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_then_reread() {
        let cell: Id<i32> = Id::new();
        assert!(cell.capture(3));
        assert!(cell.is_bound());
        // Same value re-matches, different value does not.
        assert!(cell.capture(3));
        assert!(!cell.capture(4));
        // A mismatch does not clear the cell; rollback does.
        assert!(cell.is_bound());
        cell.reset(0);
        assert!(!cell.is_bound());
    }

    #[test]
    fn reset_respects_depth_window() {
        let cell: Id<i32> = Id::new();
        assert!(cell.capture(1));
        cell.confirm(2);
        // A rollback of a deeper subtree leaves the binding alone.
        cell.reset(3);
        assert!(cell.is_bound());
        // A rollback at the binding's own depth clears it.
        cell.reset(2);
        assert!(!cell.is_bound());
    }

    #[test]
    fn confirm_promotes_towards_the_root() {
        let cell: Id<i32> = Id::new();
        assert!(cell.capture(9));
        cell.confirm(3);
        cell.confirm(2);
        cell.confirm(1);
        // Deeper rollbacks no longer touch the promoted binding.
        cell.reset(2);
        assert!(cell.is_bound());
        cell.reset(0);
        assert!(!cell.is_bound());
    }

    #[test]
    fn unbound_reads_are_errors() {
        let cell: Id<i32> = Id::new();
        assert_eq!(cell.try_value().err(), Some(IdError::Unbound));
    }

    #[test]
    #[should_panic(expected = "identifier read outside a successful match")]
    fn unbound_value_panics() {
        let cell: Id<i32> = Id::new();
        let _ = cell.value();
    }

    #[test]
    fn take_moves_the_binding_out() {
        let cell: Id<String> = Id::new();
        assert!(cell.capture(String::from("captured")));
        assert_eq!(cell.take(), "captured");
        assert!(!cell.is_bound());
    }

    #[test]
    fn custom_equality_policy() {
        struct Tolerant;
        impl CaptureEq<f64> for Tolerant {
            fn equal(held: &f64, incoming: &f64) -> bool {
                (held - incoming).abs() < 1e-6
            }
        }

        let cell: Id<f64, Tolerant> = Id::new();
        assert!(cell.capture(1.0));
        assert!(cell.capture(1.0000000001));
        assert!(!cell.capture(1.5));
    }

    #[test]
    fn borrow_capture_observes_in_place() {
        #[derive(PartialEq)]
        struct Opaque(u64);

        let big = Opaque(7);
        let cell: Id<&Opaque> = Id::new();
        assert!(match_pattern(&big, &&cell, 0));
        assert!(std::ptr::eq(*cell.value(), &big));
        cell.reset(0);
    }
}
