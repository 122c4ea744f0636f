/// Outcome of polling a [`Stream`](crate::stream::Stream) or a
/// [`Consumer`](crate::consumer::Consumer) once.
///
/// `NotYet` means the poll made progress without producing an item, e.g. an
/// input element was absorbed into a batch that is still filling up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<T> {
    NotYet,
    Ready(T),
    Done,
}

impl<T> Step<T> {
    #[inline]
    pub fn map<G, F>(self, f: F) -> Step<G>
    where
        F: FnOnce(T) -> G,
    {
        match self {
            Step::NotYet => Step::NotYet,
            Step::Ready(ready) => Step::Ready(f(ready)),
            Step::Done => Step::Done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Step;

    #[test]
    fn map_keeps_progress_markers() {
        assert_eq!(Step::Ready(2).map(|v| v * 2), Step::Ready(4));
        assert_eq!(Step::<u8>::NotYet.map(|v| v * 2), Step::NotYet);
        assert_eq!(Step::<u8>::Done.map(|v| v * 2), Step::Done);
    }
}
