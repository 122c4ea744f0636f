use core::{
    pin::Pin,
    task::{Context, Poll},
};

use futures_core::ready;
use pin_project_lite::pin_project;

use super::Stream;
use crate::step::Step;

pin_project! {
    #[must_use = "streams do nothing unless polled"]
    pub struct Pairwise<S, T, F> {
        #[pin]
        pub(super) stream: S,
        pub(super) previous: Option<T>,
        pub(super) f: F,
    }
}

impl<S, F, R> Stream for Pairwise<S, S::Item, F>
where
    S: Stream,
    F: FnMut(&S::Item, &S::Item) -> R,
{
    type Item = R;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Step<Self::Item>> {
        let this = self.project();
        Poll::Ready(match ready!(this.stream.poll_next(cx)) {
            Step::NotYet => Step::NotYet,
            Step::Ready(item) => {
                let step = match this.previous {
                    Some(previous) => Step::Ready((this.f)(previous, &item)),
                    // The first element only primes the pair.
                    None => Step::NotYet,
                };
                *this.previous = Some(item);
                step
            }
            Step::Done => Step::Done,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.stream.size_hint();
        if self.previous.is_some() {
            (lower, upper)
        } else {
            (lower.saturating_sub(1), upper.map(|u| u.saturating_sub(1)))
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use crate::{
        consumer::ConsumerExt,
        stream::{ext::StreamExt, IntoFusion},
    };

    #[test]
    fn sums_neighbours() {
        let sums = [1, 2, 3].into_iter().into_fusion().pairwise(|a, b| a + b);
        let sums: Vec<i32> = spin_on::spin_on(sums.collect().yield_by(2));
        assert_eq!(sums, [3, 5]);
    }

    #[test]
    fn short_streams_yield_nothing() {
        for n in 0..2 {
            let pairs = (0..n).into_fusion().pairwise(|a, b| a + b);
            let pairs: Vec<u8> = spin_on::spin_on(pairs.collect().yield_by(1));
            assert!(pairs.is_empty());
        }
    }

    #[test]
    fn composes_with_batch() {
        let joined: Vec<String> = spin_on::spin_on(
            "abcdef"
                .chars()
                .into_fusion()
                .batch(2)
                .pairwise(|a, b| a.iter().chain(b).collect())
                .collect()
                .yield_by(8),
        );
        assert_eq!(joined, ["abcd", "cdef"]);
    }
}
