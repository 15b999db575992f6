//! Casework: nestable, first-match pattern matching for Rust values.
//!
//! This crate is a value-level DSL: a match is a sequence of
//! *pattern → action* clauses tried in order against a borrowed
//! scrutinee. Patterns compose — disjunction, conjunction, negation,
//! predicates, computed views, destructuring with variadic splices — and
//! capture sub-values into user-declared [`Id`] cells that the winning
//! clause's action reads.
//!
//! Matching is atomic per clause: a failing pattern rolls back every
//! provisional capture its subtree made, so a cell never leaks state
//! between alternatives, clauses, or matches. The evaluator is direct
//! (no decision-tree compilation), single-threaded per match, and
//! performs no I/O; clause order, alternative order, and left-to-right
//! child order are guaranteed, which makes user predicates with side
//! effects behave predictably.
//!
//! # Example
//!
//! ```
//! use casework::prelude::*;
//!
//! let a: Id<i32> = Id::new();
//! let b: Id<i32> = Id::new();
//! let kind = match_value(&(4, 5))
//!     .clause(ds((0, 0)), || "origin")
//!     .guarded(ds((&a, &b)), || a.get() + b.get() == 9, || "sums to nine")
//!     .clause(ANY, || "other")
//!     .eval()
//!     .unwrap();
//! assert_eq!(kind, "sums to nine");
//! ```
//!
//! # Citations
//! - Matching with variables: Baader & Nipkow, "Term Rewriting and All
//!   That", Chapter 4 (1998)
//! - First-match clause semantics: Peyton Jones, "The Implementation of
//!   Functional Programming Languages", Chapter 4 (1987)

pub mod adaptors;
pub mod combinators;
pub mod destructure;
pub mod id;
pub mod matcher;
pub mod pattern;

pub use adaptors::{err, none, ok, some};
pub use combinators::{and_, app, guarded, meet, not_, or_, proj};
pub use destructure::{ds, ds_split, ooo, ooo_bind, Subrange};
pub use id::{CaptureEq, ExactEq, Id, IdError};
pub use matcher::{match_value, Match, MatchError};
pub use pattern::{lit, match_pattern, IdOutcome, Pattern, Wildcard, ANY};

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::adaptors::{err, none, ok, some};
    pub use crate::combinators::{and_, app, guarded, meet, not_, or_, proj};
    pub use crate::destructure::{ds, ds_split, ooo, ooo_bind, Subrange};
    pub use crate::id::{CaptureEq, ExactEq, Id, IdError};
    pub use crate::matcher::{match_value, Match, MatchError};
    pub use crate::pattern::{lit, match_pattern, IdOutcome, Pattern, Wildcard, ANY};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    /// Option-like dispatch: `Some(x) → x²`, `None → 0`.
    #[test]
    fn option_dispatch() {
        let square = |opt: &Option<i32>| {
            let x: Id<i32> = Id::new();
            match_value(opt)
                .clause(some(&x), || x.get() * x.get())
                .clause(none(), || 0)
                .eval()
                .unwrap()
        };
        assert_eq!(square(&Some(5)), 25);
        assert_eq!(square(&None), 0);
    }

    /// Literal clauses fall through to the wildcard.
    #[test]
    fn literal_fallthrough() {
        let label = match_value(&7)
            .clause(1, || "one")
            .clause(2, || "two")
            .clause(ANY, || "other")
            .eval();
        assert_eq!(label, Ok("other"));
    }

    /// A disjunction of literals behaves like a set membership test.
    #[test]
    fn disjunction_of_literals() {
        let size = match_value(&3)
            .clause(or_((1, 2, 3)), || "small")
            .clause(ANY, || "big")
            .eval();
        assert_eq!(size, Ok("small"));
    }

    /// Destructure with a binding splice: the cell sees the spliced
    /// window while the action runs.
    #[test]
    fn splice_binding_over_an_array() {
        let xs = [10, 20, 30, 40, 50];
        let tail: Id<Subrange<i32>> = Id::new();
        let collected = match_value(&xs)
            .clause(ds((10, ooo_bind(&tail), 50)), || tail.value().to_vec())
            .run();
        assert_eq!(collected, Some(vec![20, 30, 40]));
        assert!(!tail.is_bound());
    }

    /// Nested destructure plus a guard over both captures.
    #[test]
    fn destructure_with_guard() {
        let sums_to_nine = |pair: &(i32, i32)| {
            let a: Id<i32> = Id::new();
            let b: Id<i32> = Id::new();
            match_value(pair)
                .guarded(ds((&a, &b)), || a.get() + b.get() == 9, || {
                    (a.get(), b.get())
                })
                .run()
        };
        assert_eq!(sums_to_nine(&(4, 5)), Some((4, 5)));
        assert_eq!(sums_to_nine(&(4, 4)), None);
    }

    /// Expression-form matches with no satisfying clause are errors.
    #[test]
    fn exhausted_expression_match() {
        let result = match_value(&99).clause(1, || 'a').clause(2, || 'b').eval();
        assert_eq!(result, Err(MatchError::NoMatch));
    }

    /// Borrow captures observe the scrutinee in place; no clone happens.
    #[test]
    fn borrow_capture_through_projection() {
        struct Packet {
            header: String,
            length: usize,
        }
        fn packet_header(p: &Packet) -> &String {
            &p.header
        }
        fn packet_length(p: &Packet) -> &usize {
            &p.length
        }

        let packet = Packet {
            header: String::from("SYN"),
            length: 1280,
        };
        let header: Id<&String> = Id::new();
        let summary = match_value(&packet)
            .clause(
                and_((
                    proj(packet_header, &header),
                    proj(packet_length, meet(|len: &usize| *len >= 1000)),
                )),
                || format!("large {} packet", *header.value()),
            )
            .run();
        assert_eq!(summary.as_deref(), Some("large SYN packet"));
        assert!(!header.is_bound());
    }

    /// Computed views through `app`: capture owns the temporary.
    #[test]
    fn computed_view_capture() {
        let digits: Id<u32> = Id::new();
        let last_digit = match_value(&451u32)
            .clause(app(|v: &u32| v % 10, &digits), || digits.get())
            .run();
        assert_eq!(last_digit, Some(1));
    }

    /// The same cells can be reused across sequential matches.
    #[test]
    fn cells_are_reusable_across_matches() {
        let x: Id<i32> = Id::new();
        for value in [1, 2, 3] {
            let echoed = match_value(&value).clause(&x, || x.get()).run();
            assert_eq!(echoed, Some(value));
            assert!(!x.is_bound());
        }
    }

    /// A custom equality policy applies on re-encounter.
    #[test]
    fn tolerant_recapture() {
        struct Tolerant;
        impl CaptureEq<f64> for Tolerant {
            fn equal(held: &f64, incoming: &f64) -> bool {
                (held - incoming).abs() < 1e-6
            }
        }

        let t: Id<f64, Tolerant> = Id::new();
        let matched = match_value(&1.0)
            .clause(and_((&t, app(|v: &f64| v + 1e-9, &t))), || ())
            .run();
        assert_eq!(matched, Some(()));

        let strict: Id<f64> = Id::new();
        let matched = match_value(&1.0)
            .clause(and_((&strict, app(|v: &f64| v + 1e-9, &strict))), || ())
            .run();
        assert_eq!(matched, None);
    }
}
