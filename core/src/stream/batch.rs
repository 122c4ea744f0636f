use alloc::vec::Vec;
use core::{
    mem,
    pin::Pin,
    task::{Context, Poll},
};

use futures_core::ready;
use pin_project_lite::pin_project;

use super::Stream;
use crate::step::Step;

pin_project! {
    #[must_use = "streams do nothing unless polled"]
    pub struct Batch<S, T> {
        #[pin]
        pub(super) stream: S,
        pub(super) size: usize,
        pub(super) bucket: Vec<T>,
        pub(super) done: bool,
    }
}

impl<S: Stream> Stream for Batch<S, S::Item> {
    type Item = Vec<S::Item>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Step<Self::Item>> {
        let mut this = self.project();
        if *this.done {
            return Poll::Ready(Step::Done);
        }

        Poll::Ready(match ready!(this.stream.as_mut().poll_next(cx)) {
            Step::NotYet => Step::NotYet,
            Step::Ready(item) => {
                if this.bucket.capacity() == 0 {
                    let remaining = Stream::size_hint(&*this.stream).0.saturating_add(1);
                    this.bucket.reserve_exact((*this.size).min(remaining));
                }
                this.bucket.push(item);
                if this.bucket.len() == *this.size {
                    Step::Ready(mem::take(this.bucket))
                } else {
                    Step::NotYet
                }
            }
            Step::Done => {
                *this.done = true;
                if this.bucket.is_empty() {
                    Step::Done
                } else {
                    this.bucket.shrink_to_fit();
                    Step::Ready(mem::take(this.bucket))
                }
            }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let (lower, upper) = self.stream.size_hint();
        let buffered = self.bucket.len();
        let batches = |n: usize| {
            let n = n.saturating_add(buffered);
            n / self.size + (n % self.size != 0) as usize
        };
        (batches(lower), upper.map(batches))
    }
}

pin_project! {
    #[must_use = "streams do nothing unless polled"]
    pub struct BatchMap<S, T, F> {
        #[pin]
        pub(super) batch: Batch<S, T>,
        pub(super) f: F,
    }
}

impl<S, F, R> Stream for BatchMap<S, S::Item, F>
where
    S: Stream,
    F: FnMut(Vec<S::Item>) -> R,
{
    type Item = R;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Step<Self::Item>> {
        let this = self.project();
        let step = ready!(this.batch.poll_next(cx));
        Poll::Ready(step.map(this.f))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.batch.size_hint()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use alloc::{sync::Arc, vec, vec::Vec};
    use core::{
        pin::pin,
        task::{Context, Poll, Waker},
    };
    use std::task::Wake;

    use crate::{
        consumer::ConsumerExt,
        step::Step,
        stream::{ext::StreamExt, IntoFusion, Stream},
    };

    struct Idle;

    impl Wake for Idle {
        fn wake(self: Arc<Self>) {}
    }

    #[test]
    fn batches_like_the_iterator() {
        let batches: Vec<Vec<i32>> =
            spin_on::spin_on((1..=5).into_fusion().batch(2).collect().yield_by(4));
        assert_eq!(batches, vec![vec![1, 2], vec![3, 4], vec![5]]);
    }

    #[test]
    fn partial_batches_make_progress_without_output() {
        let waker = Waker::from(Arc::new(Idle));
        let mut cx = Context::from_waker(&waker);
        let mut batch = pin!((0..3).into_fusion().batch(2));

        assert_eq!(batch.as_mut().poll_next(&mut cx), Poll::Ready(Step::NotYet));
        assert_eq!(batch.as_mut().poll_next(&mut cx), Poll::Ready(Step::Ready(vec![0, 1])));
        assert_eq!(batch.as_mut().poll_next(&mut cx), Poll::Ready(Step::NotYet));
        assert_eq!(batch.as_mut().poll_next(&mut cx), Poll::Ready(Step::Ready(vec![2])));
        assert_eq!(batch.as_mut().poll_next(&mut cx), Poll::Ready(Step::Done));
        assert_eq!(batch.as_mut().poll_next(&mut cx), Poll::Ready(Step::Done));
    }

    #[test]
    fn batch_map_and_size_hint() {
        let stream = (0..10).into_fusion().batch_map(4, |b| b.len());
        assert_eq!(stream.size_hint(), (3, Some(3)));
        let lens: Vec<usize> = spin_on::spin_on(stream.collect().yield_by(16));
        assert_eq!(lens, [4, 4, 2]);
    }

    #[test]
    fn huge_size_allocates_by_source_length() {
        let batches: Vec<Vec<i32>> =
            spin_on::spin_on((0..3).into_fusion().batch(usize::MAX).collect().yield_by(4));
        assert_eq!(batches, vec![vec![0, 1, 2]]);
    }

    #[test]
    #[should_panic(expected = "`size` must be greater than zero")]
    fn zero_size_panics() {
        let _ = (0..1).into_fusion().batch(0);
    }
}
