pub mod acquire;
pub mod collect;

use core::{
    ops::DerefMut,
    pin::Pin,
    task::{Context, Poll},
};

use crate::execution::yield_by::YieldBy;

/// Drives a stream to a single output.
///
/// `Poll::Ready(None)` means progress was made but the output is not there
/// yet.
#[must_use = "consumers do nothing unless you execute them"]
pub trait Consumer {
    type Output;

    fn poll_consume(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Output>>;

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

impl<P> Consumer for Pin<P>
where
    P: DerefMut + Unpin,
    P::Target: Consumer,
{
    type Output = <P::Target as Consumer>::Output;

    fn poll_consume(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Output>> {
        self.get_mut().as_mut().poll_consume(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }
}

pub trait ConsumerExt: Consumer {
    /// Turns the consumer into a future that hands control back to the
    /// executor every `step` polls.
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    fn yield_by(self, step: usize) -> YieldBy<Self>
    where
        Self: Sized,
    {
        assert!(step > 0, "`step` must be greater than zero");

        YieldBy {
            consumer: self,
            n: 0,
            step,
        }
    }
}

impl<C: Consumer + ?Sized> ConsumerExt for C {}
