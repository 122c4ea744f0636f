use alloc::{boxed::Box, rc::Rc, vec::Vec};
use core::{cell::RefCell, fmt, mem};

type Materialize<'a, A, B> = Box<dyn FnOnce() -> (Vec<A>, Vec<B>) + 'a>;

enum Memo<'a, A, B> {
    Pending(Materialize<'a, A, B>),
    Ready {
        firsts: Option<Vec<A>>,
        seconds: Option<Vec<B>>,
    },
    Poisoned,
}

struct Shared<'a, A, B> {
    memo: RefCell<Memo<'a, A, B>>,
}

impl<'a, A, B> Shared<'a, A, B> {
    fn force(&self) {
        let mut memo = self.memo.borrow_mut();
        let pending = match mem::replace(&mut *memo, Memo::Poisoned) {
            Memo::Pending(pending) => pending,
            ready => {
                *memo = ready;
                return;
            }
        };
        // Selectors run with the memo left poisoned, so a panic in one of them
        // is never mistaken for a completed pass.
        drop(memo);
        let (firsts, seconds) = pending();
        *self.memo.borrow_mut() = Memo::Ready {
            firsts: Some(firsts),
            seconds: Some(seconds),
        };
    }

    fn with_ready<R>(&self, f: impl FnOnce(&mut Option<Vec<A>>, &mut Option<Vec<B>>) -> R) -> R {
        self.force();
        match &mut *self.memo.borrow_mut() {
            Memo::Ready { firsts, seconds } => f(firsts, seconds),
            Memo::Pending(_) | Memo::Poisoned => {
                panic!("unzip source panicked while being materialized")
            }
        }
    }
}

pub(super) fn deferred<'a, I, F1, F2, A, B>(
    iter: I,
    mut first: F1,
    mut second: F2,
) -> (UnzipFirst<'a, A, B>, UnzipSecond<'a, A, B>)
where
    I: Iterator + 'a,
    F1: FnMut(&I::Item) -> A + 'a,
    F2: FnMut(&I::Item) -> B + 'a,
{
    let pending: Materialize<'a, A, B> = Box::new(move || {
        let (lower, _) = iter.size_hint();
        let mut firsts = Vec::with_capacity(lower);
        let mut seconds = Vec::with_capacity(lower);
        for item in iter {
            firsts.push(first(&item));
            seconds.push(second(&item));
        }
        (firsts, seconds)
    });
    let shared = Rc::new(Shared {
        memo: RefCell::new(Memo::Pending(pending)),
    });
    (
        UnzipFirst {
            shared: Rc::clone(&shared),
        },
        UnzipSecond { shared },
    )
}

/// First half of [`unzip_deferred`](super::ext::IteratorExt::unzip_deferred).
///
/// Reading either half walks the source once and memoizes both halves.
#[must_use = "unzipped halves are lazy and do nothing unless read"]
pub struct UnzipFirst<'a, A, B> {
    shared: Rc<Shared<'a, A, B>>,
}

/// Second half of [`unzip_deferred`](super::ext::IteratorExt::unzip_deferred).
#[must_use = "unzipped halves are lazy and do nothing unless read"]
pub struct UnzipSecond<'a, A, B> {
    shared: Rc<Shared<'a, A, B>>,
}

impl<'a, A, B> UnzipFirst<'a, A, B> {
    pub fn len(&self) -> usize {
        self.shared
            .with_ready(|firsts, _| firsts.as_ref().map_or(0, Vec::len))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<A> {
        self.shared
            .with_ready(|firsts, _| firsts.take())
            .unwrap_or_default()
    }
}

impl<'a, A, B> UnzipSecond<'a, A, B> {
    pub fn len(&self) -> usize {
        self.shared
            .with_ready(|_, seconds| seconds.as_ref().map_or(0, Vec::len))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<B> {
        self.shared
            .with_ready(|_, seconds| seconds.take())
            .unwrap_or_default()
    }
}

impl<'a, A, B> IntoIterator for UnzipFirst<'a, A, B> {
    type Item = A;
    type IntoIter = alloc::vec::IntoIter<A>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a, A, B> IntoIterator for UnzipSecond<'a, A, B> {
    type Item = B;
    type IntoIter = alloc::vec::IntoIter<B>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<A, B> fmt::Debug for UnzipFirst<'_, A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnzipFirst").finish_non_exhaustive()
    }
}

impl<A, B> fmt::Debug for UnzipSecond<'_, A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnzipSecond").finish_non_exhaustive()
    }
}
