use std::{cmp, marker::PhantomData};

use super::Comparator;

/// Orders keys from greatest to smallest.
#[derive(Debug)]
pub struct ReverseComparator<T> {
    _marker: PhantomData<fn(&T, &T)>,
}

impl<T> Comparator for ReverseComparator<T>
where
    T: Ord,
{
    type Item = T;

    fn compare(&self, a: &Self::Item, b: &Self::Item) -> cmp::Ordering {
        b.cmp(a)
    }
}

impl<T> Default for ReverseComparator<T> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for ReverseComparator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ReverseComparator<T> {}
