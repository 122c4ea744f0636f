use alloc::vec::Vec;
use core::cmp::Ordering;
#[cfg(feature = "std")]
use core::hash::Hash;

#[cfg(feature = "std")]
use super::unique::{Unique, UniqueBy};
use super::{
    batch::{Batch, BatchMap},
    pairwise::Pairwise,
    partial::{Direction, Extremity, PartialExtrema},
    skip_erroneous::SkipErroneous,
    unzip::{self, UnzipFirst, UnzipSecond},
    window::Window,
};
use crate::{
    acquire::{self, AcquireAsync, AsyncRelease, Release},
    aggregate::Accumulators,
    error::Result,
    skip::{ErrorFilter, Fallible},
};

/// Extension trait for [`Iterator`].
pub trait IteratorExt: Iterator {
    /// Groups elements into vectors of `size`; the last one may be shorter.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use fusion_more::prelude::*;
    ///
    /// let batches: Vec<_> = (1..=5).batch(2).collect();
    /// assert_eq!(batches, [vec![1, 2], vec![3, 4], vec![5]]);
    /// ```
    fn batch(self, size: usize) -> Batch<Self>
    where
        Self: Sized,
    {
        Batch::new(self, size)
    }

    fn batch_map<R, F>(self, size: usize, f: F) -> BatchMap<Self, F>
    where
        Self: Sized,
        F: FnMut(Vec<Self::Item>) -> R,
    {
        BatchMap {
            batch: Batch::new(self, size),
            f,
        }
    }

    /// Overlapping windows of `size` consecutive elements.
    ///
    /// All windows share one buffer, so a view stays cheap to keep around. A
    /// `size` of zero yields one empty window before the first element and one
    /// after each element.
    ///
    /// # Examples
    ///
    /// ```
    /// use fusion_more::prelude::*;
    ///
    /// let windows: Vec<_> = (1..=4).window(2).collect();
    /// assert_eq!(windows, [[1, 2], [2, 3], [3, 4]]);
    /// ```
    fn window(self, size: usize) -> Window<Self>
    where
        Self: Sized,
    {
        Window::new(self, size)
    }

    /// Applies `f` to every element and its successor.
    fn pairwise<R, F>(self, f: F) -> Pairwise<Self, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item, &Self::Item) -> R,
    {
        Pairwise {
            iter: self,
            previous: None,
            started: false,
            f,
        }
    }

    #[cfg(feature = "std")]
    fn unique(self) -> Unique<Self>
    where
        Self: Sized,
        Self::Item: Eq + Hash + Clone,
    {
        Unique {
            inner: UniqueBy {
                iter: self,
                seen: None,
                key: <Self::Item as Clone>::clone as fn(&Self::Item) -> Self::Item,
            },
        }
    }

    /// Yields elements whose key has not been seen before.
    #[cfg(feature = "std")]
    fn unique_by<K, F>(self, key: F) -> UniqueBy<Self, K, F>
    where
        Self: Sized,
        K: Eq + Hash,
        F: FnMut(&Self::Item) -> K,
    {
        UniqueBy {
            iter: self,
            seen: None,
            key,
        }
    }

    /// Projects every element twice in a single pass and hands both
    /// collections to `result`.
    fn unzip_with<A, B, R, F1, F2, G>(self, mut first: F1, mut second: F2, result: G) -> R
    where
        Self: Sized,
        F1: FnMut(&Self::Item) -> A,
        F2: FnMut(&Self::Item) -> B,
        G: FnOnce(Vec<A>, Vec<B>) -> R,
    {
        let (lower, _) = self.size_hint();
        let mut firsts = Vec::with_capacity(lower);
        let mut seconds = Vec::with_capacity(lower);
        for item in self {
            firsts.push(first(&item));
            seconds.push(second(&item));
        }
        result(firsts, seconds)
    }

    /// Like [`unzip_with`](IteratorExt::unzip_with), but nothing is pulled
    /// until one of the halves is read.
    fn unzip_deferred<'a, A, B, F1, F2>(
        self,
        first: F1,
        second: F2,
    ) -> (UnzipFirst<'a, A, B>, UnzipSecond<'a, A, B>)
    where
        Self: Sized + 'a,
        F1: FnMut(&Self::Item) -> A + 'a,
        F2: FnMut(&Self::Item) -> B + 'a,
    {
        unzip::deferred(self, first, second)
    }

    /// The `limit` elements with the largest keys, in input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use fusion_more::{prelude::*, Extremity};
    ///
    /// let words = ["a", "bb", "ccc", "dd"];
    /// let longest: Vec<_> = words
    ///     .into_iter()
    ///     .partial_max_by_key(Extremity::Last, 2, |w| w.len())
    ///     .collect();
    /// assert_eq!(longest, ["ccc", "dd"]);
    /// ```
    fn partial_max_by_key<K, F>(
        self,
        extremity: Extremity,
        limit: usize,
        key: F,
    ) -> PartialExtrema<Self, F, fn(&K, &K) -> Ordering>
    where
        Self: Sized,
        K: Ord,
        F: FnMut(&Self::Item) -> K,
    {
        self.partial_max_by(extremity, limit, key, K::cmp as fn(&K, &K) -> Ordering)
    }

    fn partial_max_by<K, F, C>(
        self,
        extremity: Extremity,
        limit: usize,
        key: F,
        compare: C,
    ) -> PartialExtrema<Self, F, C>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> K,
        C: FnMut(&K, &K) -> Ordering,
    {
        PartialExtrema {
            source: Some(self),
            selected: None,
            direction: Direction::Max,
            extremity,
            limit,
            key,
            compare,
        }
    }

    fn partial_min_by_key<K, F>(
        self,
        extremity: Extremity,
        limit: usize,
        key: F,
    ) -> PartialExtrema<Self, F, fn(&K, &K) -> Ordering>
    where
        Self: Sized,
        K: Ord,
        F: FnMut(&Self::Item) -> K,
    {
        self.partial_min_by(extremity, limit, key, K::cmp as fn(&K, &K) -> Ordering)
    }

    fn partial_min_by<K, F, C>(
        self,
        extremity: Extremity,
        limit: usize,
        key: F,
        compare: C,
    ) -> PartialExtrema<Self, F, C>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> K,
        C: FnMut(&K, &K) -> Ordering,
    {
        PartialExtrema {
            source: Some(self),
            selected: None,
            direction: Direction::Min,
            extremity,
            limit,
            key,
            compare,
        }
    }

    /// Runs every accumulator of the tuple over a single pass and passes their
    /// results to `result`.
    ///
    /// See [`aggregate`](crate::aggregate) for the accumulators available.
    fn aggregate<A, R, F>(self, accumulators: A, result: F) -> Result<R>
    where
        Self: Sized,
        A: Accumulators<Self::Item>,
        F: FnOnce(A::Output) -> R,
    {
        accumulators.aggregate(self).map(result)
    }

    /// Collects every resource, or releases those already collected, in
    /// order, and returns the first error.
    fn acquire<R, E>(self) -> core::result::Result<Vec<R>, E>
    where
        Self: Iterator<Item = core::result::Result<R, E>> + Sized,
        R: Release,
    {
        acquire::acquire_all(self)
    }

    /// Like [`acquire`](IteratorExt::acquire), awaiting each release in turn
    /// on failure.
    fn acquire_async<R, E>(self) -> AcquireAsync<Self, R, E>
    where
        Self: Iterator<Item = core::result::Result<R, E>> + Sized,
        R: AsyncRelease,
    {
        AcquireAsync {
            iter: self,
            acquired: Vec::new(),
            error: None,
            rollback: None,
        }
    }

    fn skip_erroneous<R>(self, filter: R) -> SkipErroneous<Self, R>
    where
        Self: Sized,
        Self::Item: Fallible,
        R: ErrorFilter<<Self::Item as Fallible>::Error>,
    {
        SkipErroneous {
            iter: self,
            filter,
            skipped: 0,
            failed: false,
        }
    }

    /// Calls `f` with the zero-based index of every element.
    fn for_each_indexed<F>(self, mut f: F)
    where
        Self: Sized,
        F: FnMut(usize, Self::Item),
    {
        self.enumerate().for_each(|(index, item)| f(index, item));
    }

    /// Drains the iterator for its side effects.
    fn consume(self)
    where
        Self: Sized,
    {
        self.for_each(drop);
    }
}

impl<I: Iterator + ?Sized> IteratorExt for I {}
