use core::{fmt, hash::Hash, iter::FusedIterator};
use std::collections::HashSet;

/// Streaming distinct filter keyed by `F`.
///
/// The set of seen keys is only allocated once the first element arrives.
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct UniqueBy<I, K, F> {
    pub(super) iter: I,
    pub(super) seen: Option<HashSet<K>>,
    pub(super) key: F,
}

impl<I, K, F> Iterator for UniqueBy<I, K, F>
where
    I: Iterator,
    K: Eq + Hash,
    F: FnMut(&I::Item) -> K,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let seen = &mut self.seen;
        let key = &mut self.key;
        self.iter
            .find(|item| seen.get_or_insert_with(HashSet::new).insert(key(item)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        let empty = self.seen.as_ref().map_or(true, HashSet::is_empty);
        ((lower > 0 && empty) as usize, upper)
    }
}

impl<I, K, F> FusedIterator for UniqueBy<I, K, F>
where
    I: FusedIterator,
    K: Eq + Hash,
    F: FnMut(&I::Item) -> K,
{
}

#[derive(Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Unique<I: Iterator> {
    pub(super) inner: UniqueBy<I, I::Item, fn(&I::Item) -> I::Item>,
}

impl<I> Iterator for Unique<I>
where
    I: Iterator,
    I::Item: Eq + Hash + Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I> fmt::Debug for Unique<I>
where
    I: Iterator + fmt::Debug,
    I::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unique")
            .field("iter", &self.inner.iter)
            .field("seen", &self.inner.seen)
            .finish()
    }
}

impl<I> FusedIterator for Unique<I>
where
    I: FusedIterator,
    I::Item: Eq + Hash + Clone,
{
}
