//! Rules deciding which failed computations
//! [`skip_erroneous`](crate::iter::ext::IteratorExt::skip_erroneous) may drop.
//!
//! A rule matches on the *kind* of an error, the way `std::io::Error` exposes
//! an [`io::ErrorKind`](std::io::ErrorKind), and can additionally require a
//! predicate over the error itself:
//!
//! ```
//! use core::num::IntErrorKind;
//! use fusion_more::{prelude::*, skip::catch};
//!
//! let numbers: Vec<_> = "O,l,2,3,4,S,6,7,B,9"
//!     .split(',')
//!     .map(str::parse::<i32>)
//!     .skip_erroneous(catch(IntErrorKind::InvalidDigit))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(numbers, [2, 3, 4, 6, 7, 9]);
//! ```

use core::num::{IntErrorKind, ParseIntError};

/// Classifies an error into a closed set of kinds.
pub trait ErrorKind {
    type Kind: PartialEq;

    fn kind(&self) -> Self::Kind;
}

impl ErrorKind for ParseIntError {
    type Kind = IntErrorKind;

    fn kind(&self) -> Self::Kind {
        ParseIntError::kind(self).clone()
    }
}

#[cfg(feature = "std")]
impl ErrorKind for std::io::Error {
    type Kind = std::io::ErrorKind;

    fn kind(&self) -> Self::Kind {
        std::io::Error::kind(self)
    }
}

/// A rule, or an ordered list of rules, deciding whether an error is skipped.
pub trait ErrorFilter<E> {
    fn accepts(&mut self, error: &E) -> bool;
}

/// Extra condition attached to a rule with `when`.
pub trait Predicate<E> {
    fn test(&mut self, error: &E) -> bool;
}

/// The condition of a rule without `when`: accepts every error it sees.
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl<E> Predicate<E> for Always {
    fn test(&mut self, _: &E) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy)]
pub struct When<P>(P);

impl<E, P> Predicate<E> for When<P>
where
    P: FnMut(&E) -> bool,
{
    fn test(&mut self, error: &E) -> bool {
        (self.0)(error)
    }
}

/// Skips errors of one kind.
#[derive(Debug, Clone, Copy)]
pub struct Catch<K, P = Always> {
    kind: K,
    predicate: P,
}

/// Skips errors of every kind.
#[derive(Debug, Clone, Copy)]
pub struct CatchAll<P = Always> {
    predicate: P,
}

pub fn catch<K>(kind: K) -> Catch<K> {
    Catch {
        kind,
        predicate: Always,
    }
}

pub fn catch_all() -> CatchAll {
    CatchAll { predicate: Always }
}

impl<K> Catch<K> {
    /// Only skips matching errors for which `predicate` returns `true`.
    /// Errors of another kind never reach the predicate.
    pub fn when<P>(self, predicate: P) -> Catch<K, When<P>> {
        Catch {
            kind: self.kind,
            predicate: When(predicate),
        }
    }
}

impl CatchAll {
    pub fn when<P>(self, predicate: P) -> CatchAll<When<P>> {
        CatchAll {
            predicate: When(predicate),
        }
    }
}

impl<E, K, P> ErrorFilter<E> for Catch<K, P>
where
    E: ErrorKind<Kind = K>,
    K: PartialEq,
    P: Predicate<E>,
{
    fn accepts(&mut self, error: &E) -> bool {
        error.kind() == self.kind && self.predicate.test(error)
    }
}

impl<E, P> ErrorFilter<E> for CatchAll<P>
where
    P: Predicate<E>,
{
    fn accepts(&mut self, error: &E) -> bool {
        self.predicate.test(error)
    }
}

impl<E, A, B> ErrorFilter<E> for (A, B)
where
    A: ErrorFilter<E>,
    B: ErrorFilter<E>,
{
    fn accepts(&mut self, error: &E) -> bool {
        self.0.accepts(error) || self.1.accepts(error)
    }
}

impl<E, A, B, C> ErrorFilter<E> for (A, B, C)
where
    A: ErrorFilter<E>,
    B: ErrorFilter<E>,
    C: ErrorFilter<E>,
{
    fn accepts(&mut self, error: &E) -> bool {
        self.0.accepts(error) || self.1.accepts(error) || self.2.accepts(error)
    }
}

/// A computation that may fail.
///
/// A `Result` pulled from a lazy iterator is a computation that already ran
/// on demand; [`defer`] wraps a closure that runs when the adaptor reaches it.
pub trait Fallible {
    type Output;
    type Error;

    fn run(self) -> Result<Self::Output, Self::Error>;
}

impl<T, E> Fallible for Result<T, E> {
    type Output = T;
    type Error = E;

    fn run(self) -> Result<T, E> {
        self
    }
}

#[derive(Debug, Clone, Copy)]
#[must_use = "deferred computations do nothing unless run"]
pub struct Deferred<F>(F);

pub fn defer<F, T, E>(f: F) -> Deferred<F>
where
    F: FnOnce() -> Result<T, E>,
{
    Deferred(f)
}

impl<F, T, E> Fallible for Deferred<F>
where
    F: FnOnce() -> Result<T, E>,
{
    type Output = T;
    type Error = E;

    fn run(self) -> Result<T, E> {
        (self.0)()
    }
}

#[cfg(test)]
mod tests {
    use core::num::IntErrorKind;

    use super::{catch, catch_all, defer, ErrorFilter, ErrorKind, Fallible};

    #[derive(Debug, PartialEq)]
    enum Fault {
        Timeout(u32),
        Refused,
    }

    #[derive(Debug, PartialEq)]
    enum FaultKind {
        Timeout,
        Refused,
    }

    impl ErrorKind for Fault {
        type Kind = FaultKind;

        fn kind(&self) -> FaultKind {
            match self {
                Fault::Timeout(_) => FaultKind::Timeout,
                Fault::Refused => FaultKind::Refused,
            }
        }
    }

    #[test]
    fn catch_matches_kind_then_predicate() {
        let mut short = catch(FaultKind::Timeout)
            .when(|e: &Fault| matches!(e, Fault::Timeout(ms) if *ms < 100));
        assert!(short.accepts(&Fault::Timeout(10)));
        assert!(!short.accepts(&Fault::Timeout(500)));
        assert!(!short.accepts(&Fault::Refused));
    }

    #[test]
    fn rules_are_tried_in_order() {
        let mut seen = alloc::vec::Vec::new();
        let mut rules = (
            catch(FaultKind::Refused).when(|_: &Fault| {
                seen.push("refused");
                false
            }),
            catch_all(),
        );
        assert!(rules.accepts(&Fault::Refused));
        assert!(rules.accepts(&Fault::Timeout(1)));
        drop(rules);
        assert_eq!(seen, ["refused"]);
    }

    #[test]
    fn parse_errors_expose_their_kind() {
        let err = "x".parse::<u8>().unwrap_err();
        assert!(catch(IntErrorKind::InvalidDigit).accepts(&err));
        assert!(!catch(IntErrorKind::Empty).accepts(&err));
    }

    #[test]
    fn deferred_runs_once_on_demand() {
        let computation = defer(|| "42".parse::<u8>());
        assert_eq!(computation.run(), Ok(42));
        assert_eq!(Err::<u8, _>(Fault::Refused).run(), Err(Fault::Refused));
    }
}
