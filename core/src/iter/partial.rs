use alloc::vec::{self, Vec};
use core::{cmp::Ordering, fmt, iter::FusedIterator};

/// Which of several elements with equal keys wins a place in a partial
/// extrema selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extremity {
    /// Prefer elements encountered earlier.
    First,
    /// Prefer elements encountered later.
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Direction {
    Max,
    Min,
}

/// The `limit` most extreme elements of a sequence, in their original
/// relative order.
///
/// Nothing is pulled from the source until the first call to `next`, which
/// drains it into a buffer of at most `limit` entries. A `limit` of zero never
/// touches the source.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PartialExtrema<I: Iterator, F, C> {
    pub(super) source: Option<I>,
    pub(super) selected: Option<vec::IntoIter<I::Item>>,
    pub(super) direction: Direction,
    pub(super) extremity: Extremity,
    pub(super) limit: usize,
    pub(super) key: F,
    pub(super) compare: C,
}

impl<I, F, C, K> PartialExtrema<I, F, C>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    C: FnMut(&K, &K) -> Ordering,
{
    fn select(&mut self, source: I) -> Vec<I::Item> {
        let limit = self.limit;
        let direction = self.direction;
        let extremity = self.extremity;
        let compare = &mut self.compare;

        let (lower, _) = source.size_hint();
        let mut top: Vec<(K, usize, I::Item)> = Vec::with_capacity(limit.min(lower) + 1);
        let mut scanned = 0usize;

        for (index, item) in source.enumerate() {
            scanned += 1;
            let key = (self.key)(&item);
            // `top` is ordered most extreme first; among equal keys the
            // preferred element comes first.
            let position = top.partition_point(|(kept, _, _)| {
                let ordering = match direction {
                    Direction::Max => compare(kept, &key),
                    Direction::Min => compare(&key, kept),
                };
                match extremity {
                    Extremity::First => ordering != Ordering::Less,
                    Extremity::Last => ordering == Ordering::Greater,
                }
            });
            if position < limit {
                top.insert(position, (key, index, item));
                top.truncate(limit);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(scanned, retained = top.len(), limit, "partial extrema selected");
        #[cfg(not(feature = "tracing"))]
        let _ = scanned;

        top.sort_unstable_by_key(|(_, index, _)| *index);
        top.into_iter().map(|(_, _, item)| item).collect()
    }
}

impl<I, F, C, K> Iterator for PartialExtrema<I, F, C>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    C: FnMut(&K, &K) -> Ordering,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(source) = self.source.take() {
            let selected = if self.limit == 0 {
                Vec::new()
            } else {
                self.select(source)
            };
            self.selected = Some(selected.into_iter());
        }
        self.selected.as_mut()?.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match (&self.selected, &self.source) {
            (Some(selected), _) => selected.size_hint(),
            (None, Some(source)) => {
                let (lower, upper) = source.size_hint();
                let upper = upper.map_or(self.limit, |u| u.min(self.limit));
                (lower.min(self.limit), Some(upper))
            }
            (None, None) => (0, Some(0)),
        }
    }
}

impl<I, F, C, K> FusedIterator for PartialExtrema<I, F, C>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    C: FnMut(&K, &K) -> Ordering,
{
}

impl<I, F, C> fmt::Debug for PartialExtrema<I, F, C>
where
    I: Iterator + fmt::Debug,
    I::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialExtrema")
            .field("source", &self.source)
            .field("selected", &self.selected)
            .field("direction", &self.direction)
            .field("extremity", &self.extremity)
            .field("limit", &self.limit)
            .finish()
    }
}
