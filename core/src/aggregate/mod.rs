//! Several accumulations over a single pass of an iterator.
//!
//! ```
//! use fusion_more::{
//!     aggregate::{connect, fold, Subject},
//!     prelude::*,
//! };
//!
//! let (sum, max, evens) = (1..=6)
//!     .aggregate(
//!         (
//!             fold(0, |sum, n: &i32| sum + n),
//!             connect(|s: &mut Subject<i32>| s.max()),
//!             connect(|s: &mut Subject<i32>| s.filter(|n| n % 2 == 0, |evens| evens.count())),
//!         ),
//!         |results| results,
//!     )
//!     .unwrap();
//!
//! assert_eq!((sum, max, evens), (21, 6, 3));
//! ```

pub mod observable;

use core::{fmt, marker::PhantomData};

pub use self::observable::{connection, Connection, Observer, Publisher, Subject};
use crate::error::{Error, Result};

/// Running state of one accumulation.
pub trait Accumulator<T> {
    type Output;

    fn accumulate(&mut self, item: &T);

    /// Called on every accumulator of a pass once the source is exhausted,
    /// before any of them is finished.
    fn complete(&mut self) {}

    /// `index` is the 1-based position of the accumulator, used in errors.
    fn finish(self, index: usize) -> Result<Self::Output>;
}

/// Something that can start an [`Accumulator`].
pub trait IntoAccumulator<T> {
    type Output;
    type Accumulator: Accumulator<T, Output = Self::Output>;

    fn into_accumulator(self) -> Self::Accumulator;
}

/// A tuple of 2 to 15 [`IntoAccumulator`]s driven by one pass.
pub trait Accumulators<T> {
    type Output;

    fn aggregate<I>(self, iter: I) -> Result<Self::Output>
    where
        I: Iterator<Item = T>;
}

/// Folds every element into `seed`.
pub fn fold<S, F, T>(seed: S, f: F) -> Fold<S, F>
where
    F: FnMut(S, &T) -> S,
{
    Fold {
        state: Some(seed),
        f,
    }
}

/// Attaches an accumulator to a fresh [`Subject`] that will observe every
/// element. The subject is completed once the source is exhausted.
pub fn connect<'a, T, C, R>(connector: C) -> Connect<'a, T, C>
where
    C: FnOnce(&mut Subject<'a, T>) -> Connection<R>,
{
    Connect {
        connector,
        subject: PhantomData,
    }
}

#[derive(Clone)]
pub struct Fold<S, F> {
    state: Option<S>,
    f: F,
}

impl<S: fmt::Debug, F> fmt::Debug for Fold<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fold").field("state", &self.state).finish()
    }
}

impl<T, S, F> Accumulator<T> for Fold<S, F>
where
    F: FnMut(S, &T) -> S,
{
    type Output = S;

    fn accumulate(&mut self, item: &T) {
        if let Some(state) = self.state.take() {
            self.state = Some((self.f)(state, item));
        }
    }

    fn finish(self, index: usize) -> Result<S> {
        self.state.ok_or(Error::NoResult { index })
    }
}

impl<T, S, F> IntoAccumulator<T> for Fold<S, F>
where
    F: FnMut(S, &T) -> S,
{
    type Output = S;
    type Accumulator = Self;

    fn into_accumulator(self) -> Self {
        self
    }
}

pub struct Connect<'a, T, C> {
    connector: C,
    subject: PhantomData<fn(&mut Subject<'a, T>)>,
}

impl<T, C> fmt::Debug for Connect<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connect").finish_non_exhaustive()
    }
}

impl<'a, T, C, R> IntoAccumulator<T> for Connect<'a, T, C>
where
    C: FnOnce(&mut Subject<'a, T>) -> Connection<R>,
{
    type Output = R;
    type Accumulator = Connected<'a, T, R>;

    fn into_accumulator(self) -> Self::Accumulator {
        let mut subject = Subject::new();
        let connection = (self.connector)(&mut subject);
        Connected {
            subject,
            connection,
        }
    }
}

/// A [`Subject`] together with the connection its accumulator publishes to.
#[derive(Debug)]
pub struct Connected<'a, T, R> {
    subject: Subject<'a, T>,
    connection: Connection<R>,
}

impl<T, R> Accumulator<T> for Connected<'_, T, R> {
    type Output = R;

    fn accumulate(&mut self, item: &T) {
        self.subject.next(item);
    }

    fn complete(&mut self) {
        self.subject.complete();
    }

    fn finish(mut self, index: usize) -> Result<R> {
        self.complete();
        drop(self.subject);
        self.connection.get(index)
    }
}

macro_rules! tuple_accumulators {
    ($arity:literal; $($name:ident $index:tt),+) => {
        impl<T, $($name),+> Accumulators<T> for ($($name,)+)
        where
            $($name: IntoAccumulator<T>,)+
        {
            type Output = ($(<$name as IntoAccumulator<T>>::Output,)+);

            fn aggregate<I>(self, iter: I) -> Result<Self::Output>
            where
                I: Iterator<Item = T>,
            {
                let mut accumulators = ($(self.$index.into_accumulator(),)+);
                #[cfg(feature = "tracing")]
                let mut elements = 0usize;
                for item in iter {
                    $(accumulators.$index.accumulate(&item);)+
                    #[cfg(feature = "tracing")]
                    {
                        elements += 1;
                    }
                }
                $(accumulators.$index.complete();)+
                #[cfg(feature = "tracing")]
                tracing::debug!(elements, accumulators = $arity, "aggregate complete");
                Ok(($(accumulators.$index.finish($index + 1)?,)+))
            }
        }
    };
}

tuple_accumulators!(2; A1 0, A2 1);
tuple_accumulators!(3; A1 0, A2 1, A3 2);
tuple_accumulators!(4; A1 0, A2 1, A3 2, A4 3);
tuple_accumulators!(5; A1 0, A2 1, A3 2, A4 3, A5 4);
tuple_accumulators!(6; A1 0, A2 1, A3 2, A4 3, A5 4, A6 5);
tuple_accumulators!(7; A1 0, A2 1, A3 2, A4 3, A5 4, A6 5, A7 6);
tuple_accumulators!(8; A1 0, A2 1, A3 2, A4 3, A5 4, A6 5, A7 6, A8 7);
tuple_accumulators!(9; A1 0, A2 1, A3 2, A4 3, A5 4, A6 5, A7 6, A8 7, A9 8);
tuple_accumulators!(10; A1 0, A2 1, A3 2, A4 3, A5 4, A6 5, A7 6, A8 7, A9 8, A10 9);
tuple_accumulators!(11; A1 0, A2 1, A3 2, A4 3, A5 4, A6 5, A7 6, A8 7, A9 8, A10 9, A11 10);
tuple_accumulators!(12; A1 0, A2 1, A3 2, A4 3, A5 4, A6 5, A7 6, A8 7, A9 8, A10 9, A11 10,
    A12 11);
tuple_accumulators!(13; A1 0, A2 1, A3 2, A4 3, A5 4, A6 5, A7 6, A8 7, A9 8, A10 9, A11 10,
    A12 11, A13 12);
tuple_accumulators!(14; A1 0, A2 1, A3 2, A4 3, A5 4, A6 5, A7 6, A8 7, A9 8, A10 9, A11 10,
    A12 11, A13 12, A14 13);
tuple_accumulators!(15; A1 0, A2 1, A3 2, A4 3, A5 4, A6 5, A7 6, A8 7, A9 8, A10 9, A11 10,
    A12 11, A13 12, A14 13, A15 14);
