//! Eager acquisition of resources that must be given back on failure.

use alloc::{vec, vec::Vec};
use core::{
    future::Future,
    mem,
    pin::Pin,
    task::{Context, Poll},
};

use futures_core::ready;
use pin_project_lite::pin_project;

/// A resource that is handed back synchronously.
pub trait Release {
    fn release(self);
}

/// A resource whose release has to be awaited.
pub trait AsyncRelease {
    type Future: Future<Output = ()>;

    fn release(self) -> Self::Future;
}

pub(crate) fn acquire_all<I, R, E>(iter: I) -> Result<Vec<R>, E>
where
    I: Iterator<Item = Result<R, E>>,
    R: Release,
{
    let mut acquired = Vec::new();
    for item in iter {
        match item {
            Ok(resource) => acquired.push(resource),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(released = acquired.len(), "acquisition failed, rolling back");
                acquired.into_iter().for_each(Release::release);
                return Err(err);
            }
        }
    }
    Ok(acquired)
}

pin_project! {
    /// Awaits the release of every resource, one after another, in the order
    /// they were acquired.
    pub struct Rollback<R: AsyncRelease> {
        pending: vec::IntoIter<R>,
        #[pin]
        current: Option<R::Future>,
    }
}

impl<R: AsyncRelease> Rollback<R> {
    pub(crate) fn new(acquired: Vec<R>) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(released = acquired.len(), "acquisition failed, rolling back");
        Rollback {
            pending: acquired.into_iter(),
            current: None,
        }
    }

    pub(crate) fn poll_release(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut this = self.project();
        loop {
            if let Some(release) = this.current.as_mut().as_pin_mut() {
                ready!(release.poll(cx));
                this.current.set(None);
            }
            match this.pending.next() {
                Some(resource) => this.current.set(Some(resource.release())),
                None => return Poll::Ready(()),
            }
        }
    }
}

pin_project! {
    /// Future returned by
    /// [`acquire_async`](crate::iter::ext::IteratorExt::acquire_async).
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct AcquireAsync<I, R: AsyncRelease, E> {
        pub(crate) iter: I,
        pub(crate) acquired: Vec<R>,
        pub(crate) error: Option<E>,
        #[pin]
        pub(crate) rollback: Option<Rollback<R>>,
    }
}

impl<I, R, E> Future for AcquireAsync<I, R, E>
where
    I: Iterator<Item = Result<R, E>>,
    R: AsyncRelease,
{
    type Output = Result<Vec<R>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        if this.rollback.is_none() {
            for item in this.iter.by_ref() {
                match item {
                    Ok(resource) => this.acquired.push(resource),
                    Err(err) => {
                        *this.error = Some(err);
                        let acquired = mem::take(this.acquired);
                        this.rollback.set(Some(Rollback::new(acquired)));
                        break;
                    }
                }
            }
        }

        match this.rollback.as_mut().as_pin_mut() {
            Some(rollback) => {
                ready!(rollback.poll_release(cx));
                let err = this
                    .error
                    .take()
                    .expect("`AcquireAsync` polled after completion");
                Poll::Ready(Err(err))
            }
            None => Poll::Ready(Ok(mem::take(this.acquired))),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use alloc::{rc::Rc, vec::Vec};
    use core::{
        cell::RefCell,
        future::{self, Future},
        pin::Pin,
        task::{Context, Poll},
    };

    use super::{AsyncRelease, Release};
    use crate::iter::ext::IteratorExt;

    pub(crate) type Log = Rc<RefCell<Vec<u32>>>;

    #[derive(Debug)]
    pub(crate) struct Handle {
        pub(crate) id: u32,
        pub(crate) log: Log,
    }

    impl Release for Handle {
        fn release(self) {
            self.log.borrow_mut().push(self.id);
        }
    }

    impl AsyncRelease for Handle {
        type Future = future::Ready<()>;

        fn release(self) -> Self::Future {
            self.log.borrow_mut().push(self.id);
            future::ready(())
        }
    }

    /// Released on its second poll.
    pub(crate) struct Lagging {
        pub(crate) handle: Handle,
        pub(crate) polled: bool,
    }

    impl AsyncRelease for Lagging {
        type Future = Self;

        fn release(self) -> Self {
            self
        }
    }

    impl Future for Lagging {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if !self.polled {
                self.polled = true;
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
            self.handle.log.borrow_mut().push(self.handle.id);
            Poll::Ready(())
        }
    }

    pub(crate) fn handles(
        log: &Log,
        ids: core::ops::Range<u32>,
    ) -> impl Iterator<Item = Handle> + '_ {
        ids.map(move |id| Handle {
            id,
            log: log.clone(),
        })
    }

    #[test]
    fn success_hands_over_everything() {
        let log = Log::default();
        let acquired = handles(&log, 0..3).map(Ok::<_, &str>).acquire().unwrap();
        assert_eq!(acquired.iter().map(|h| h.id).collect::<Vec<_>>(), [0, 1, 2]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn failure_releases_in_order_and_stops_pulling() {
        let log = Log::default();
        let mut pulled = 0;
        let result = handles(&log, 0..6)
            .inspect(|_| pulled += 1)
            .map(|h| if h.id == 3 { Err(h.id) } else { Ok(h) })
            .acquire();

        assert_eq!(result.unwrap_err(), 3);
        assert_eq!(*log.borrow(), [0, 1, 2]);
        assert_eq!(pulled, 4);
    }

    #[test]
    fn async_release_is_awaited_in_order() {
        let log = Log::default();
        let result = spin_on::spin_on(
            handles(&log, 0..5)
                .map(|h| if h.id == 2 { Err("busy") } else { Ok(h) })
                .acquire_async(),
        );
        assert_eq!(result.unwrap_err(), "busy");
        assert_eq!(*log.borrow(), [0, 1]);
    }

    #[test]
    fn pending_release_holds_back_the_next_one() {
        let log = Log::default();
        let result = spin_on::spin_on(
            handles(&log, 0..4)
                .map(|handle| Lagging { handle, polled: false })
                .map(|r| if r.handle.id == 3 { Err(r.handle.id) } else { Ok(r) })
                .acquire_async(),
        );
        assert!(matches!(result, Err(3)));
        assert_eq!(*log.borrow(), [0, 1, 2]);
    }

    #[test]
    fn async_success_releases_nothing() {
        let log = Log::default();
        let acquired =
            spin_on::spin_on(handles(&log, 0..2).map(Ok::<_, ()>).acquire_async()).unwrap();
        assert_eq!(acquired.len(), 2);
        assert!(log.borrow().is_empty());
    }
}
