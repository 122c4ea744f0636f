use core::iter::FusedIterator;

use crate::skip::{ErrorFilter, Fallible};

/// Runs each computation of the source, dropping failures accepted by the
/// filter.
///
/// The first failure the filter rejects is yielded as `Err`, after which the
/// iterator is exhausted.
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct SkipErroneous<I, R> {
    pub(super) iter: I,
    pub(super) filter: R,
    pub(super) skipped: usize,
    pub(super) failed: bool,
}

impl<I, R> SkipErroneous<I, R> {
    /// Number of failures dropped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<I, R> Iterator for SkipErroneous<I, R>
where
    I: Iterator,
    I::Item: Fallible,
    R: ErrorFilter<<I::Item as Fallible>::Error>,
{
    type Item = Result<<I::Item as Fallible>::Output, <I::Item as Fallible>::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        for computation in self.iter.by_ref() {
            match computation.run() {
                Ok(value) => return Some(Ok(value)),
                Err(error) if self.filter.accepts(&error) => {
                    self.skipped += 1;
                    #[cfg(feature = "tracing")]
                    tracing::trace!(skipped = self.skipped, "dropped failed computation");
                }
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, self.iter.size_hint().1)
        }
    }
}

impl<I, R> FusedIterator for SkipErroneous<I, R>
where
    I: FusedIterator,
    I::Item: Fallible,
    R: ErrorFilter<<I::Item as Fallible>::Error>,
{
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec, vec::Vec};
    use core::{cell::Cell, num::IntErrorKind};

    use crate::{
        iter::ext::IteratorExt,
        skip::{catch, catch_all, defer},
    };

    #[test]
    fn skips_only_matching_kind() {
        let mut parsed = ["1", "x", "2", "", "3"]
            .into_iter()
            .map(str::parse::<u32>)
            .skip_erroneous(catch(IntErrorKind::InvalidDigit));

        assert_eq!(parsed.next(), Some(Ok(1)));
        assert_eq!(parsed.next(), Some(Ok(2)));
        assert_eq!(parsed.skipped(), 1);
        assert_eq!(
            parsed.next().map(|r| r.map_err(|e| e.kind().clone())),
            Some(Err(IntErrorKind::Empty))
        );
        assert_eq!(parsed.next(), None);
    }

    #[test]
    fn predicate_narrows_a_rule() {
        let words = ["10", "x", "abc", "20"];
        let parsed: Vec<_> = words
            .iter()
            .map(|w| (w, w.parse::<u32>()))
            .map(|(w, r)| r.map_err(|e| (String::from(*w), e)))
            .skip_erroneous(catch_all().when(|(w, _): &(String, _)| w.len() == 1))
            .collect();

        assert_eq!(parsed.len(), 2, "stops at the first rejected failure");
        assert_eq!(parsed[0], Ok(10));
        assert!(matches!(&parsed[1], Err((w, _)) if w == "abc"));
    }

    #[test]
    fn rules_fall_through_in_order() {
        let parsed: Result<Vec<u8>, _> = ["1", "300", "", "z", "4"]
            .into_iter()
            .map(str::parse::<u8>)
            .skip_erroneous((
                catch(IntErrorKind::PosOverflow),
                catch(IntErrorKind::Empty),
                catch(IntErrorKind::InvalidDigit),
            ))
            .collect();
        assert_eq!(parsed, Ok(vec![1, 4]));
    }

    #[test]
    fn deferred_computations_run_lazily() {
        let runs = Cell::new(0);
        let computations = (0..6).map(|n| {
            let runs = &runs;
            defer(move || {
                runs.set(runs.get() + 1);
                if n % 2 == 0 { Ok(n) } else { Err(n) }
            })
        });

        let mut even = computations.skip_erroneous(catch_all());
        assert_eq!(runs.get(), 0);
        assert_eq!(even.next(), Some(Ok(0)));
        assert_eq!(runs.get(), 1);
        assert_eq!(even.collect::<Vec<_>>(), [Ok(2), Ok(4)]);
        assert_eq!(runs.get(), 6);
    }
}
