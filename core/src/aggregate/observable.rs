//! Push-based plumbing used by [`connect`](super::connect) accumulators.
//!
//! A [`Subject`] fans every item out to its observers in subscription order.
//! Helpers such as [`Subject::sum`] subscribe an observer and hand back a
//! [`Connection`] that receives the observer's result when the subject
//! completes.

use alloc::{boxed::Box, rc::Rc, vec::Vec};
use core::{cell::RefCell, fmt, mem, ops::Add};
#[cfg(feature = "std")]
use std::{collections::HashSet, hash::Hash};

use crate::error::{Error, Result};

pub trait Observer<T> {
    fn on_next(&mut self, item: &T);

    fn on_completed(&mut self) {}
}

pub struct Subject<'a, T> {
    observers: Vec<Box<dyn Observer<T> + 'a>>,
    completed: bool,
}

impl<T> fmt::Debug for Subject<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &self.observers.len())
            .field("completed", &self.completed)
            .finish()
    }
}

impl<T> Default for Subject<'_, T> {
    fn default() -> Self {
        Subject::new()
    }
}

impl<'a, T> Subject<'a, T> {
    pub fn new() -> Self {
        Subject {
            observers: Vec::new(),
            completed: false,
        }
    }

    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: Observer<T> + 'a,
    {
        self.observers.push(Box::new(observer));
    }

    /// Subscribes a closure called with every item.
    pub fn for_each<F>(&mut self, f: F)
    where
        F: FnMut(&T) + 'a,
    {
        self.subscribe(ForEach(f));
    }

    /// Ignored once the subject has completed.
    pub fn next(&mut self, item: &T) {
        if self.completed {
            return;
        }
        for observer in &mut self.observers {
            observer.on_next(item);
        }
    }

    /// Notifies completion, at most once.
    pub fn complete(&mut self) {
        if mem::replace(&mut self.completed, true) {
            return;
        }
        for observer in &mut self.observers {
            observer.on_completed();
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Folds every item into `seed` and publishes the final state on
    /// completion.
    pub fn connect<S, F>(&mut self, seed: S, f: F) -> Connection<S>
    where
        S: 'a,
        F: FnMut(S, &T) -> S + 'a,
    {
        self.connect_map(seed, f, |state| state)
    }

    pub fn connect_map<S, F, G, R>(&mut self, seed: S, f: F, result: G) -> Connection<R>
    where
        S: 'a,
        F: FnMut(S, &T) -> S + 'a,
        G: FnOnce(S) -> R + 'a,
        R: 'a,
    {
        self.accumulate(seed, f, move |state| Some(result(state)))
    }

    fn accumulate<S, F, G, R>(&mut self, seed: S, f: F, finish: G) -> Connection<R>
    where
        S: 'a,
        F: FnMut(S, &T) -> S + 'a,
        G: FnOnce(S) -> Option<R> + 'a,
        R: 'a,
    {
        let (publisher, connection) = connection();
        self.subscribe(Accumulate {
            state: Some(seed),
            f,
            finish: Some(finish),
            publisher,
        });
        connection
    }

    pub fn sum(&mut self) -> Connection<T>
    where
        T: Clone + Default + Add<Output = T> + 'a,
    {
        self.connect(T::default(), |sum, item: &T| sum + item.clone())
    }

    pub fn count(&mut self) -> Connection<usize> {
        self.connect(0, |count, _: &T| count + 1)
    }

    /// Reduces the items with `f`, seeding with the first one. Publishes
    /// nothing for an empty sequence.
    pub fn some<F>(&mut self, mut f: F) -> Connection<T>
    where
        T: Clone + 'a,
        F: FnMut(T, &T) -> T + 'a,
    {
        self.accumulate(
            None,
            move |acc: Option<T>, item: &T| {
                Some(match acc {
                    Some(acc) => f(acc, item),
                    None => item.clone(),
                })
            },
            |acc| acc,
        )
    }

    /// Latest of the smallest items.
    pub fn min(&mut self) -> Connection<T>
    where
        T: Ord + Clone + 'a,
    {
        self.some(|min, item: &T| if min < *item { min } else { item.clone() })
    }

    /// Latest of the largest items.
    pub fn max(&mut self) -> Connection<T>
    where
        T: Ord + Clone + 'a,
    {
        self.some(|max, item: &T| if max > *item { max } else { item.clone() })
    }

    pub fn list(&mut self) -> Connection<Vec<T>>
    where
        T: Clone + 'a,
    {
        self.collect(Vec::new())
    }

    #[cfg(feature = "std")]
    pub fn distinct(&mut self) -> Connection<HashSet<T>>
    where
        T: Eq + Hash + Clone + 'a,
    {
        self.collect(HashSet::new())
    }

    pub fn collect<C>(&mut self, collection: C) -> Connection<C>
    where
        T: Clone,
        C: Extend<T> + 'a,
    {
        self.connect(collection, |mut collection, item: &T| {
            collection.extend(Some(item.clone()));
            collection
        })
    }

    /// Projects every item before handing it to the accumulator attached by
    /// `connector`.
    pub fn map<U, F, C, R>(&mut self, f: F, connector: C) -> Connection<R>
    where
        U: 'a,
        F: FnMut(&T) -> U + 'a,
        C: FnOnce(&mut Subject<'a, U>) -> Connection<R>,
    {
        let mut inner = Subject::new();
        let connection = connector(&mut inner);
        self.subscribe(Map { f, inner });
        connection
    }

    /// Only hands items accepted by `predicate` to the accumulator attached by
    /// `connector`.
    pub fn filter<P, C, R>(&mut self, predicate: P, connector: C) -> Connection<R>
    where
        T: 'a,
        P: FnMut(&T) -> bool + 'a,
        C: FnOnce(&mut Subject<'a, T>) -> Connection<R>,
    {
        let mut inner = Subject::new();
        let connection = connector(&mut inner);
        self.subscribe(Filter { predicate, inner });
        connection
    }
}

struct ForEach<F>(F);

impl<T, F> Observer<T> for ForEach<F>
where
    F: FnMut(&T),
{
    fn on_next(&mut self, item: &T) {
        (self.0)(item)
    }
}

struct Accumulate<S, F, G, R> {
    state: Option<S>,
    f: F,
    finish: Option<G>,
    publisher: Publisher<R>,
}

impl<T, S, F, G, R> Observer<T> for Accumulate<S, F, G, R>
where
    F: FnMut(S, &T) -> S,
    G: FnOnce(S) -> Option<R>,
{
    fn on_next(&mut self, item: &T) {
        if let Some(state) = self.state.take() {
            self.state = Some((self.f)(state, item));
        }
    }

    fn on_completed(&mut self) {
        if let (Some(state), Some(finish)) = (self.state.take(), self.finish.take()) {
            if let Some(result) = finish(state) {
                self.publisher.publish(result);
            }
        }
    }
}

struct Map<'a, U, F> {
    f: F,
    inner: Subject<'a, U>,
}

impl<T, U, F> Observer<T> for Map<'_, U, F>
where
    F: FnMut(&T) -> U,
{
    fn on_next(&mut self, item: &T) {
        let mapped = (self.f)(item);
        self.inner.next(&mapped);
    }

    fn on_completed(&mut self) {
        self.inner.complete();
    }
}

struct Filter<'a, T, P> {
    predicate: P,
    inner: Subject<'a, T>,
}

impl<T, P> Observer<T> for Filter<'_, T, P>
where
    P: FnMut(&T) -> bool,
{
    fn on_next(&mut self, item: &T) {
        if (self.predicate)(item) {
            self.inner.next(item);
        }
    }

    fn on_completed(&mut self) {
        self.inner.complete();
    }
}

enum Slot<R> {
    Empty,
    Full(R),
    Overfull,
}

/// Write end of a [`connection`].
pub struct Publisher<R> {
    slot: Rc<RefCell<Slot<R>>>,
}

/// Read end of a [`connection`]; holds at most one published result.
pub struct Connection<R> {
    slot: Rc<RefCell<Slot<R>>>,
}

pub fn connection<R>() -> (Publisher<R>, Connection<R>) {
    let slot = Rc::new(RefCell::new(Slot::Empty));
    (Publisher { slot: slot.clone() }, Connection { slot })
}

impl<R> Publisher<R> {
    pub fn publish(&self, value: R) {
        let mut slot = self.slot.borrow_mut();
        *slot = match *slot {
            Slot::Empty => Slot::Full(value),
            Slot::Full(_) | Slot::Overfull => Slot::Overfull,
        };
    }
}

impl<R> Connection<R> {
    pub fn is_published(&self) -> bool {
        !matches!(*self.slot.borrow(), Slot::Empty)
    }

    /// Takes the published result. `index` is reported in the error when
    /// nothing, or more than one result, was published.
    pub fn get(self, index: usize) -> Result<R> {
        match mem::replace(&mut *self.slot.borrow_mut(), Slot::Empty) {
            Slot::Full(value) => Ok(value),
            Slot::Empty => Err(Error::NoResult { index }),
            Slot::Overfull => Err(Error::MultipleResults { index }),
        }
    }
}

impl<R> fmt::Debug for Publisher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher").finish_non_exhaustive()
    }
}

impl<R> fmt::Debug for Connection<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("published", &self.is_published())
            .finish()
    }
}
