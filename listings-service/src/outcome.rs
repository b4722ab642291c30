//! Two-variant outcome type
//!
//! [`Outcome`] holds exactly one of a failure value or a success value. It is
//! the result type used wherever a fallible computation crosses an internal
//! boundary in this crate.
//!
//! [`Outcome::fold`] is the only primitive that looks inside. Every other
//! accessor (`is_success`, `map`, `get_or_else`, ...) is written in terms of
//! it, so no caller can observe the two variants inconsistently.
//!
//! # Example
//!
//! ```rust
//! use listings_service::outcome::Outcome;
//!
//! let outcome: Outcome<String, u32> = Outcome::success(21);
//! let doubled = outcome.map(|n| n * 2);
//!
//! assert!(doubled.is_success());
//! assert_eq!(doubled.get_or_else(0), 42);
//!
//! let message = Outcome::<String, u32>::failure("boom".to_string())
//!     .fold(|err| format!("failed: {err}"), |n| format!("got {n}"));
//! assert_eq!(message, "failed: boom");
//! ```

/// Exactly one of a failure `F` or a success `T`
///
/// The variant is private; construct with [`Outcome::failure`] or
/// [`Outcome::success`] and consume with [`Outcome::fold`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Outcome<F, T>(Variant<F, T>);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Variant<F, T> {
    Failure(F),
    Success(T),
}

impl<F, T> Outcome<F, T> {
    /// Wrap a failure value
    pub const fn failure(value: F) -> Self {
        Self(Variant::Failure(value))
    }

    /// Wrap a success value
    pub const fn success(value: T) -> Self {
        Self(Variant::Success(value))
    }

    /// Consume the outcome, running exactly one of the two continuations
    pub fn fold<B>(self, on_failure: impl FnOnce(F) -> B, on_success: impl FnOnce(T) -> B) -> B {
        match self.0 {
            Variant::Failure(value) => on_failure(value),
            Variant::Success(value) => on_success(value),
        }
    }

    /// Borrow both sides, producing an outcome of references
    ///
    /// The borrowing counterpart of [`Outcome::fold`], which consumes the
    /// outcome. Borrowing helpers go through `as_ref().fold(..)`.
    pub fn as_ref(&self) -> Outcome<&F, &T> {
        match &self.0 {
            Variant::Failure(value) => Outcome::failure(value),
            Variant::Success(value) => Outcome::success(value),
        }
    }

    /// Run `on_failure` only when this is a failure, returning the result
    pub fn fold_failure<B>(self, on_failure: impl FnOnce(F) -> B) -> Option<B> {
        self.fold(|f| Some(on_failure(f)), |_| None)
    }

    /// Run `on_success` only when this is a success, returning the result
    pub fn fold_success<B>(self, on_success: impl FnOnce(T) -> B) -> Option<B> {
        self.fold(|_| None, |t| Some(on_success(t)))
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.as_ref().fold(|_| false, |_| true)
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.as_ref().fold(|_| true, |_| false)
    }

    /// Transform the success value, leaving a failure untouched
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<F, U> {
        self.fold(Outcome::failure, |t| Outcome::success(f(t)))
    }

    /// Transform the failure value, leaving a success untouched
    pub fn map_failure<G>(self, f: impl FnOnce(F) -> G) -> Outcome<G, T> {
        self.fold(|e| Outcome::failure(f(e)), Outcome::success)
    }

    /// Chain a further fallible step onto a success
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<F, U>) -> Outcome<F, U> {
        self.fold(Outcome::failure, f)
    }

    /// Return the success value or `default`
    pub fn get_or_else(self, default: T) -> T {
        self.fold(|_| default, |t| t)
    }

    /// Return the success value or compute one from the failure
    pub fn get_or_else_with(self, f: impl FnOnce(F) -> T) -> T {
        self.fold(f, |t| t)
    }

    /// The success value, if any
    pub fn into_success(self) -> Option<T> {
        self.fold(|_| None, Some)
    }

    /// The failure value, if any
    pub fn into_failure(self) -> Option<F> {
        self.fold(Some, |_| None)
    }

    /// Convert into a standard `Result`
    pub fn into_result(self) -> Result<T, F> {
        self.fold(Err, Ok)
    }
}

impl<F, T> From<Result<T, F>> for Outcome<F, T> {
    fn from(result: Result<T, F>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(value) => Self::failure(value),
        }
    }
}

impl<F, T> From<Outcome<F, T>> for Result<T, F> {
    fn from(outcome: Outcome<F, T>) -> Self {
        outcome.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_fold_runs_exactly_one_branch() {
        let failures = Cell::new(0);
        let successes = Cell::new(0);

        let outcomes: Vec<Outcome<&str, i32>> =
            vec![Outcome::success(1), Outcome::failure("nope"), Outcome::success(3)];
        for outcome in outcomes {
            outcome.fold(
                |_| failures.set(failures.get() + 1),
                |_| successes.set(successes.get() + 1),
            );
        }

        assert_eq!(failures.get(), 1);
        assert_eq!(successes.get(), 2);
    }

    #[test]
    fn test_predicates_agree_with_fold() {
        let ok: Outcome<String, i32> = Outcome::success(7);
        let err: Outcome<String, i32> = Outcome::failure("bad".to_string());

        assert!(ok.is_success());
        assert!(!ok.is_failure());
        assert!(err.is_failure());
        assert!(!err.is_success());
    }

    #[test]
    fn test_map_only_touches_success() {
        let ok: Outcome<String, i32> = Outcome::success(2);
        assert_eq!(ok.map(|n| n + 1).into_success(), Some(3));

        let err: Outcome<String, i32> = Outcome::failure("bad".to_string());
        let mapped = err.map(|n| n + 1);
        assert_eq!(mapped.into_failure(), Some("bad".to_string()));
    }

    #[test]
    fn test_get_or_else() {
        assert_eq!(Outcome::<(), i32>::success(5).get_or_else(0), 5);
        assert_eq!(Outcome::<(), i32>::failure(()).get_or_else(0), 0);
        assert_eq!(
            Outcome::<usize, usize>::failure(4).get_or_else_with(|len| len * 10),
            40
        );
    }

    #[test]
    fn test_fold_failure_and_fold_success() {
        let err: Outcome<&str, i32> = Outcome::failure("x");
        assert_eq!(err.clone().fold_failure(str::len), Some(1));
        assert_eq!(err.fold_success(|n| n * 2), None);
    }

    #[test]
    fn test_and_then_short_circuits() {
        let called = Cell::new(false);
        let err: Outcome<&str, i32> = Outcome::failure("stop");
        let chained = err.and_then(|n| {
            called.set(true);
            Outcome::<&str, i32>::success(n)
        });

        assert!(chained.is_failure());
        assert!(!called.get());
    }

    #[test]
    fn test_result_round_trip() {
        let outcome: Outcome<String, u8> = Ok::<u8, String>(9).into();
        assert_eq!(outcome.clone().into_result(), Ok(9));

        let back: Result<u8, String> = Outcome::<String, u8>::failure("e".into()).into();
        assert_eq!(back, Err("e".to_string()));
    }
}
