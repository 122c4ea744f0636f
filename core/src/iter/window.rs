use alloc::{rc::Rc, vec::Vec};
use core::{
    cell::{Ref, RefCell},
    fmt,
    iter::FusedIterator,
};

/// A read-only view of `len` consecutive elements starting at `offset` in a
/// buffer shared by every window of the same [`Window`] iterator.
///
/// The buffer is append-only, so a view keeps describing the same elements
/// after later windows are produced.
pub struct WindowView<T> {
    buffer: Rc<RefCell<Vec<T>>>,
    offset: usize,
    len: usize,
}

impl<T> WindowView<T> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrows the elements of this window.
    ///
    /// # Panics
    ///
    /// The returned guard borrows the shared buffer. Holding it while the
    /// [`Window`] iterator is advanced panics.
    pub fn as_slice(&self) -> Ref<'_, [T]> {
        let range = self.offset..self.offset + self.len;
        Ref::map(self.buffer.borrow(), |buffer| &buffer[range])
    }

    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.as_slice().get(index).cloned()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_
    where
        T: Clone,
    {
        (0..self.len).filter_map(move |i| self.get(i))
    }
}

impl<T> Clone for WindowView<T> {
    fn clone(&self) -> Self {
        WindowView {
            buffer: Rc::clone(&self.buffer),
            offset: self.offset,
            len: self.len,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for WindowView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice().iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for WindowView<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.as_slice() == *other.as_slice()
    }
}

impl<T: PartialEq> PartialEq<[T]> for WindowView<T> {
    fn eq(&self, other: &[T]) -> bool {
        *self.as_slice() == *other
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for WindowView<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self.as_slice() == other[..]
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for WindowView<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        *self.as_slice() == other[..]
    }
}

#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Window<I: Iterator> {
    pub(super) iter: I,
    pub(super) size: usize,
    pub(super) buffer: Rc<RefCell<Vec<I::Item>>>,
    pub(super) offset: usize,
    pub(super) primed: bool,
    pub(super) done: bool,
}

impl<I: Iterator> Window<I> {
    pub(super) fn new(iter: I, size: usize) -> Self {
        Window {
            iter,
            size,
            buffer: Rc::new(RefCell::new(Vec::new())),
            offset: 0,
            primed: false,
            done: false,
        }
    }

    fn view(&self, offset: usize) -> WindowView<I::Item> {
        WindowView {
            buffer: Rc::clone(&self.buffer),
            offset,
            len: self.size,
        }
    }

    // Zero-sized windows are all empty: one before the first element and one
    // after each element. Nothing is buffered.
    fn next_empty(&mut self) -> Option<WindowView<I::Item>> {
        if !self.primed {
            self.primed = true;
            return Some(self.view(0));
        }
        match self.iter.next() {
            Some(_) => Some(self.view(0)),
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl<I: Iterator> Iterator for Window<I> {
    type Item = WindowView<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.size == 0 {
            return self.next_empty();
        }

        if !self.primed {
            self.primed = true;
            let mut buffer = self.buffer.borrow_mut();
            let (lower, _) = self.iter.size_hint();
            buffer.reserve(self.size.min(lower));
            buffer.extend(self.iter.by_ref().take(self.size - 1));
            if buffer.len() < self.size - 1 {
                drop(buffer);
                self.done = true;
                return None;
            }
        }

        match self.iter.next() {
            Some(item) => {
                self.buffer.borrow_mut().push(item);
                let view = self.view(self.offset);
                self.offset += 1;
                Some(view)
            }
            None => {
                self.done = true;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let (lower, upper) = self.iter.size_hint();
        if self.size == 0 {
            let pending = !self.primed as usize;
            return (
                lower.saturating_add(pending),
                upper.and_then(|u| u.checked_add(pending)),
            );
        }
        let missing = if self.primed { 0 } else { self.size - 1 };
        (
            lower.saturating_sub(missing),
            upper.map(|u| u.saturating_sub(missing)),
        )
    }
}

impl<I: Iterator> FusedIterator for Window<I> {}

impl<I> fmt::Debug for Window<I>
where
    I: Iterator + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("iter", &self.iter)
            .field("size", &self.size)
            .field("offset", &self.offset)
            .finish()
    }
}
