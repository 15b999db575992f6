//! Composite pattern kinds: disjunction, conjunction, negation, predicate,
//! apply-then-match, projection, and post-match guards.
//!
//! Children are always matched at `depth + 1` through
//! [`match_pattern`], so a failing alternative rolls back exactly the
//! captures its own subtree made. Alternatives and conjuncts are tried in
//! source order and short-circuit; this ordering is observable, because
//! `meet`, `app`, `proj`, and `guarded` run user code.

use crate::pattern::{match_pattern, IdOutcome, Pattern};

/// Disjunction over a tuple of alternatives; the first match wins.
pub struct Or<Ps>(Ps);

/// Builds a disjunction: `or_((1, 2, 3))` matches any of the three.
#[inline]
pub fn or_<Ps>(alternatives: Ps) -> Or<Ps> {
    Or(alternatives)
}

/// Conjunction over a tuple of patterns, all matched against the same
/// value. Conjuncts share identifier cells, so a later conjunct can
/// constrain a capture made by an earlier one.
pub struct And<Ps>(Ps);

/// Builds a conjunction: `and_((meet(|v| *v > 0), &cell))`.
#[inline]
pub fn and_<Ps>(conjuncts: Ps) -> And<Ps> {
    And(conjuncts)
}

macro_rules! variadic_combinators {
    ($(($($P:ident : $idx:tt),+))+) => {$(
        impl<'v, V: ?Sized, $($P),+> Pattern<'v, V> for Or<($($P,)+)>
        where
            $($P: Pattern<'v, V>),+
        {
            fn match_value(&self, value: &'v V, depth: usize) -> bool {
                false $(|| match_pattern(value, &self.0.$idx, depth + 1))+
            }

            fn process_id(&self, depth: usize, outcome: IdOutcome) {
                $(self.0.$idx.process_id(depth, outcome);)+
            }
        }

        impl<'v, V: ?Sized, $($P),+> Pattern<'v, V> for And<($($P,)+)>
        where
            $($P: Pattern<'v, V>),+
        {
            fn match_value(&self, value: &'v V, depth: usize) -> bool {
                true $(&& match_pattern(value, &self.0.$idx, depth + 1))+
            }

            fn process_id(&self, depth: usize, outcome: IdOutcome) {
                $(self.0.$idx.process_id(depth, outcome);)+
            }
        }
    )+};
}

variadic_combinators! {
    (P0: 0)
    (P0: 0, P1: 1)
    (P0: 0, P1: 1, P2: 2)
    (P0: 0, P1: 1, P2: 2, P3: 3)
    (P0: 0, P1: 1, P2: 2, P3: 3, P4: 4)
    (P0: 0, P1: 1, P2: 2, P3: 3, P4: 4, P5: 5)
    (P0: 0, P1: 1, P2: 2, P3: 3, P4: 4, P5: 5, P6: 6)
    (P0: 0, P1: 1, P2: 2, P3: 3, P4: 4, P5: 5, P6: 6, P7: 7)
}

/// Negation: matches iff the inner pattern does not.
///
/// Captures made while probing the inner pattern are rolled back whether
/// the negation succeeds or fails; an identifier used only inside a
/// `not_` is never observable afterwards.
pub struct Not<P>(P);

/// Builds a negation.
#[inline]
pub fn not_<P>(pattern: P) -> Not<P> {
    Not(pattern)
}

impl<'v, V: ?Sized, P: Pattern<'v, V>> Pattern<'v, V> for Not<P> {
    fn match_value(&self, value: &'v V, depth: usize) -> bool {
        let matched = match_pattern(value, &self.0, depth + 1);
        // The probe must stay invisible even when it succeeded.
        self.0.process_id(depth + 1, IdOutcome::Cancel);
        !matched
    }

    fn process_id(&self, depth: usize, outcome: IdOutcome) {
        self.0.process_id(depth, outcome);
    }
}

/// Predicate pattern: matches iff the user predicate accepts the value.
pub struct Meet<F>(F);

/// Builds a predicate pattern: `meet(|v: &i32| *v % 2 == 0)`.
#[inline]
pub fn meet<F>(predicate: F) -> Meet<F> {
    Meet(predicate)
}

impl<'v, V: ?Sized + 'v, F> Pattern<'v, V> for Meet<F>
where
    F: Fn(&'v V) -> bool,
{
    #[inline]
    fn match_value(&self, value: &'v V, _depth: usize) -> bool {
        (self.0)(value)
    }

    #[inline]
    fn process_id(&self, _depth: usize, _outcome: IdOutcome) {}
}

/// Apply-then-match: computes an owned intermediate from the scrutinee and
/// matches the inner pattern against it.
///
/// The intermediate lives on the matcher's stack for exactly the nested
/// match, so the inner pattern must accept any borrow lifetime
/// (`for<'a> Pattern<'a, R>`). In practice that means captures inside an
/// `app` store owned clones; trying to borrow-capture a temporary is a
/// compile error. Projections that merely reach into the scrutinee should
/// use [`proj`], which keeps borrows alive for the whole action.
pub struct App<F, P> {
    transform: F,
    pattern: P,
}

/// Builds an apply-then-match pattern: `app(|v: &u32| v % 10, 0)`.
#[inline]
pub fn app<F, P>(transform: F, pattern: P) -> App<F, P> {
    App { transform, pattern }
}

impl<'v, V: ?Sized + 'v, R, F, P> Pattern<'v, V> for App<F, P>
where
    F: Fn(&'v V) -> R,
    P: for<'a> Pattern<'a, R>,
{
    fn match_value(&self, value: &'v V, depth: usize) -> bool {
        let produced = (self.transform)(value);
        match_pattern(&produced, &self.pattern, depth + 1)
    }

    fn process_id(&self, depth: usize, outcome: IdOutcome) {
        self.pattern.process_id(depth, outcome);
    }
}

/// Reference projection: reaches into the scrutinee's live storage and
/// matches the inner pattern against the projected reference directly.
///
/// Because the projection has the scrutinee's lifetime, captures beneath
/// it may be borrows (`Id<&T>`) that remain valid for the clause's action.
pub struct Proj<F, P> {
    project: F,
    pattern: P,
}

/// Builds a projection pattern: `proj(|p: &Point| &p.x, &x_cell)`.
#[inline]
pub fn proj<F, P>(project: F, pattern: P) -> Proj<F, P> {
    Proj { project, pattern }
}

impl<'v, V: ?Sized + 'v, R: ?Sized + 'v, F, P> Pattern<'v, V> for Proj<F, P>
where
    F: Fn(&'v V) -> &'v R,
    P: Pattern<'v, R>,
{
    fn match_value(&self, value: &'v V, depth: usize) -> bool {
        match_pattern((self.project)(value), &self.pattern, depth + 1)
    }

    fn process_id(&self, depth: usize, outcome: IdOutcome) {
        self.pattern.process_id(depth, outcome);
    }
}

/// Post-match guard: matches the inner pattern, then requires the guard
/// predicate (which typically reads captured cells) to hold. A rejected
/// guard fails the whole node; the enclosing rollback clears the inner
/// pattern's bindings.
pub struct Guard<P, G> {
    pattern: P,
    guard: G,
}

/// Attaches a guard to a pattern:
/// `guarded(ds((&a, &b)), || a.get() + b.get() == 9)`.
#[inline]
pub fn guarded<P, G>(pattern: P, guard: G) -> Guard<P, G> {
    Guard { pattern, guard }
}

impl<'v, V: ?Sized, P, G> Pattern<'v, V> for Guard<P, G>
where
    P: Pattern<'v, V>,
    G: Fn() -> bool,
{
    fn match_value(&self, value: &'v V, depth: usize) -> bool {
        match_pattern(value, &self.pattern, depth + 1) && (self.guard)()
    }

    fn process_id(&self, depth: usize, outcome: IdOutcome) {
        self.pattern.process_id(depth, outcome);
    }
}
