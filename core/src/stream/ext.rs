use alloc::vec::Vec;
use core::{
    pin::Pin,
    task::{Context, Poll},
};

use super::{
    batch::{Batch, BatchMap},
    pairwise::Pairwise,
    Stream,
};
use crate::{
    acquire::AsyncRelease,
    consumer::{acquire::Acquire, collect::Collect},
    step::Step,
};

/// Extension trait for [`Stream`].
pub trait StreamExt: Stream {
    /// A convenience for calling [`Stream::poll_next()`] on [`Unpin`] types.
    fn poll_next(&mut self, cx: &mut Context<'_>) -> Poll<Step<Self::Item>>
    where
        Self: Unpin,
    {
        Stream::poll_next(Pin::new(self), cx)
    }

    /// Groups items into vectors of `size`; the last one may be shorter.
    ///
    /// An item that does not complete a batch is reported as
    /// [`Step::NotYet`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fusion_more::prelude::*;
    ///
    /// let batches: Vec<Vec<i32>> =
    ///     spin_on::spin_on((1..=5).into_fusion().batch(2).collect().yield_by(8));
    /// assert_eq!(batches, [vec![1, 2], vec![3, 4], vec![5]]);
    /// ```
    fn batch(self, size: usize) -> Batch<Self, Self::Item>
    where
        Self: Sized,
    {
        assert!(size > 0, "`size` must be greater than zero");
        Batch {
            stream: self,
            size,
            bucket: Vec::new(),
            done: false,
        }
    }

    fn batch_map<R, F>(self, size: usize, f: F) -> BatchMap<Self, Self::Item, F>
    where
        Self: Sized,
        F: FnMut(Vec<Self::Item>) -> R,
    {
        BatchMap {
            batch: self.batch(size),
            f,
        }
    }

    fn pairwise<R, F>(self, f: F) -> Pairwise<Self, Self::Item, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item, &Self::Item) -> R,
    {
        Pairwise {
            stream: self,
            previous: None,
            f,
        }
    }

    /// Collects every resource, or awaits the release of those already
    /// collected, in order, and returns the first error.
    fn acquire<R, E>(self) -> Acquire<Self, R, E>
    where
        Self: Stream<Item = Result<R, E>> + Sized,
        R: AsyncRelease,
    {
        Acquire {
            stream: self,
            acquired: Vec::new(),
            error: None,
            rollback: None,
        }
    }

    fn collect<C>(self) -> Collect<Self, C>
    where
        Self: Sized,
        C: Default + Extend<Self::Item>,
    {
        #[allow(unused_mut)]
        let mut collection: C = Default::default();
        #[cfg(feature = "nightly")]
        collection.extend_reserve(self.size_hint().0);
        Collect {
            stream: self,
            collection,
        }
    }
}

impl<S: Stream + ?Sized> StreamExt for S {}
