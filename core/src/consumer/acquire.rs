use alloc::vec::Vec;
use core::{
    mem,
    pin::Pin,
    task::{Context, Poll},
};

use futures_core::ready;
use pin_project_lite::pin_project;

use super::Consumer;
use crate::{
    acquire::{AsyncRelease, Rollback},
    step::Step,
    stream::Stream,
};

pin_project! {
    /// Consumer returned by [`StreamExt::acquire`](crate::stream::ext::StreamExt::acquire).
    #[must_use = "consumers do nothing unless you execute them"]
    pub struct Acquire<S, R: AsyncRelease, E> {
        #[pin]
        pub(crate) stream: S,
        pub(crate) acquired: Vec<R>,
        pub(crate) error: Option<E>,
        #[pin]
        pub(crate) rollback: Option<Rollback<R>>,
    }
}

impl<S, R, E> Consumer for Acquire<S, R, E>
where
    S: Stream<Item = Result<R, E>>,
    R: AsyncRelease,
{
    type Output = Result<Vec<R>, E>;

    fn poll_consume(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Output>> {
        let mut this = self.project();

        if let Some(rollback) = this.rollback.as_mut().as_pin_mut() {
            ready!(rollback.poll_release(cx));
            this.rollback.set(None);
            return Poll::Ready(this.error.take().map(Err));
        }

        Poll::Ready(match ready!(this.stream.poll_next(cx)) {
            Step::NotYet => None,
            Step::Ready(Ok(resource)) => {
                this.acquired.push(resource);
                None
            }
            Step::Ready(Err(err)) => {
                // Nothing more is pulled from the stream; the releases run on
                // the following polls.
                *this.error = Some(err);
                let acquired = mem::take(this.acquired);
                this.rollback.set(Some(Rollback::new(acquired)));
                None
            }
            Step::Done => Some(Ok(mem::take(this.acquired))),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stream.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::pin::pin;

    use crate::{
        acquire::tests::{handles, Lagging, Log},
        consumer::ConsumerExt,
        stream::{ext::StreamExt, IntoFusion},
    };

    #[test]
    fn success_hands_over_everything() {
        let log = Log::default();
        let acquired = spin_on::spin_on(
            handles(&log, 0..4)
                .map(Ok::<_, ()>)
                .into_fusion()
                .acquire()
                .yield_by(3),
        )
        .unwrap();
        assert_eq!(acquired.iter().map(|h| h.id).collect::<Vec<_>>(), [0, 1, 2, 3]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn failure_releases_in_order_and_stops_pulling() {
        let log = Log::default();
        let mut pulled = 0;
        let result = spin_on::spin_on(
            handles(&log, 0..6)
                .inspect(|_| pulled += 1)
                .map(|h| if h.id == 2 { Err(h.id) } else { Ok(h) })
                .into_fusion()
                .acquire()
                .yield_by(2),
        );
        assert_eq!(result.unwrap_err(), 2);
        assert_eq!(*log.borrow(), [0, 1]);
        assert_eq!(pulled, 3);
    }

    #[test]
    fn pending_releases_are_awaited() {
        let log = Log::default();
        let consumer = pin!(handles(&log, 0..3)
            .map(|handle| Lagging {
                handle,
                polled: false,
            })
            .map(|r| if r.handle.id == 2 { Err("exhausted") } else { Ok(r) })
            .into_fusion()
            .acquire());
        let result = spin_on::spin_on(consumer.yield_by(4));
        assert!(matches!(result, Err("exhausted")));
        assert_eq!(*log.borrow(), [0, 1]);
    }
}
