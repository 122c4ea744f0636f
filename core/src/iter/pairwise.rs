use core::iter::FusedIterator;

#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Pairwise<I: Iterator, F> {
    pub(super) iter: I,
    pub(super) previous: Option<I::Item>,
    pub(super) started: bool,
    pub(super) f: F,
}

impl<I, F, R> Iterator for Pairwise<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item, &I::Item) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            self.previous = self.iter.next();
        }
        let previous = self.previous.as_mut()?;
        let item = self.iter.next()?;
        let result = (self.f)(previous, &item);
        *previous = item;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        if self.started {
            if self.previous.is_none() {
                return (0, Some(0));
            }
            (lower, upper)
        } else {
            (lower.saturating_sub(1), upper.map(|u| u.saturating_sub(1)))
        }
    }
}

impl<I, F, R> FusedIterator for Pairwise<I, F>
where
    I: FusedIterator,
    F: FnMut(&I::Item, &I::Item) -> R,
{
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec, vec::Vec};

    use crate::iter::ext::IteratorExt;

    #[test]
    fn sums_neighbours() {
        let sums: Vec<i32> = [1, 2, 3].into_iter().pairwise(|a, b| a + b).collect();
        assert_eq!(sums, vec![3, 5]);
    }

    #[test]
    fn joins_strings_in_order() {
        let joined: Vec<String> = ["a", "b", "c", "d"]
            .into_iter()
            .pairwise(|a, b| alloc::format!("{a}{b}"))
            .collect();
        assert_eq!(joined, vec!["ab", "bc", "cd"]);
    }

    #[test]
    fn yields_one_fewer_than_source() {
        for n in 0..6usize {
            let results: Vec<(usize, usize)> = (0..n).pairwise(|a, b| (*a, *b)).collect();
            assert_eq!(results.len(), n.saturating_sub(1));
            assert!(results.iter().all(|(a, b)| a + 1 == *b));
        }
    }

    #[test]
    fn size_hint_tracks_progress() {
        let mut pairs = (0..5).pairwise(|a, b| a * b);
        assert_eq!(pairs.size_hint(), (4, Some(4)));
        pairs.next();
        assert_eq!(pairs.size_hint(), (3, Some(3)));
        assert_eq!((0..1).pairwise(|a, b| a + b).size_hint(), (0, Some(0)));
    }
}
