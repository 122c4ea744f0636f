use alloc::vec::Vec;
use core::{fmt, iter::FusedIterator, mem};

#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Batch<I: Iterator> {
    pub(super) iter: I,
    pub(super) size: usize,
    pub(super) bucket: Vec<I::Item>,
    pub(super) done: bool,
}

impl<I: Iterator> Batch<I> {
    pub(super) fn new(iter: I, size: usize) -> Self {
        assert!(size > 0, "`size` must be greater than zero");
        Batch {
            iter,
            size,
            bucket: Vec::new(),
            done: false,
        }
    }
}

impl<I: Iterator> Iterator for Batch<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while let Some(item) = self.iter.next() {
            if self.bucket.capacity() == 0 {
                let remaining = self.iter.size_hint().0.saturating_add(1);
                self.bucket.reserve_exact(self.size.min(remaining));
            }
            self.bucket.push(item);
            if self.bucket.len() == self.size {
                return Some(mem::take(&mut self.bucket));
            }
        }
        self.done = true;
        if self.bucket.is_empty() {
            None
        } else {
            self.bucket.shrink_to_fit();
            Some(mem::take(&mut self.bucket))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let (lower, upper) = self.iter.size_hint();
        let buffered = self.bucket.len();
        let batches = |n: usize| {
            let n = n.saturating_add(buffered);
            n / self.size + (n % self.size != 0) as usize
        };
        (batches(lower), upper.map(batches))
    }
}

impl<I: Iterator> FusedIterator for Batch<I> {}

#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct BatchMap<I: Iterator, F> {
    pub(super) batch: Batch<I>,
    pub(super) f: F,
}

impl<I, F> Clone for BatchMap<I, F>
where
    I: Iterator,
    Batch<I>: Clone,
    F: Clone,
{
    fn clone(&self) -> Self {
        BatchMap {
            batch: self.batch.clone(),
            f: self.f.clone(),
        }
    }
}

impl<I, F> fmt::Debug for BatchMap<I, F>
where
    I: Iterator,
    Batch<I>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchMap")
            .field("batch", &self.batch)
            .finish()
    }
}

impl<I, F, R> Iterator for BatchMap<I, F>
where
    I: Iterator,
    F: FnMut(Vec<I::Item>) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<Self::Item> {
        self.batch.next().map(&mut self.f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.batch.size_hint()
    }
}

impl<I, F, R> FusedIterator for BatchMap<I, F>
where
    I: Iterator,
    F: FnMut(Vec<I::Item>) -> R,
{
}

#[cfg(test)]
mod tests {
    use alloc::{vec, vec::Vec};

    use crate::iter::ext::IteratorExt;

    #[test]
    fn last_batch_is_short() {
        let batches: Vec<_> = (1..=5).batch(2).collect();
        assert_eq!(batches, vec![vec![1, 2], vec![3, 4], vec![5]]);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let batches: Vec<_> = (1..=6).batch(3).collect();
        assert_eq!(batches, vec![vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn empty_source_yields_nothing() {
        assert_eq!(core::iter::empty::<u8>().batch(4).count(), 0);
    }

    #[test]
    fn concatenation_reproduces_source() {
        for size in 1..=9 {
            let source: Vec<u32> = (0..23).collect();
            let batches: Vec<Vec<u32>> = source.iter().copied().batch(size).collect();
            let (last, full) = batches.split_last().unwrap();
            assert!(full.iter().all(|b| b.len() == size));
            assert!(!last.is_empty() && last.len() <= size);
            assert_eq!(batches.concat(), source);
        }
    }

    #[test]
    fn size_hint_counts_batches() {
        assert_eq!((0..10).batch(3).size_hint(), (4, Some(4)));
        assert_eq!((0..9).batch(3).size_hint(), (3, Some(3)));
    }

    #[test]
    fn batch_map_projects_each_bucket() {
        let sums: Vec<i32> = (1..=7).batch_map(3, |b| b.iter().sum()).collect();
        assert_eq!(sums, vec![6, 15, 7]);
    }

    #[test]
    fn huge_size_allocates_by_source_length() {
        let batches: Vec<_> = (0..3).batch(usize::MAX).collect();
        assert_eq!(batches, vec![vec![0, 1, 2]]);

        let lens: Vec<usize> = (0..3).batch_map(usize::MAX, |b| b.len()).collect();
        assert_eq!(lens, vec![3]);
    }

    #[test]
    fn batch_map_debugs_and_clones() {
        let mut batches = (0..5).batch_map(2, |b: Vec<i32>| b.len());
        assert!(alloc::format!("{batches:?}").starts_with("BatchMap { batch: Batch {"));

        assert_eq!(batches.next(), Some(2));
        let copy = batches.clone();
        assert_eq!(copy.collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(batches.collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    #[should_panic(expected = "`size` must be greater than zero")]
    fn zero_size_panics_before_enumeration() {
        let _ = core::iter::repeat(1).batch(0);
    }
}
