use std::{cmp, fmt, marker::PhantomData};

use super::Comparator;

/// Adapts a strict less-than predicate into a [`Comparator`].
///
/// Keys for which neither `less(a, b)` nor `less(b, a)` holds compare equal.
pub struct LessComparator<T, F> {
    less: F,
    _marker: PhantomData<fn(&T, &T)>,
}

impl<T, F> LessComparator<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    pub fn new(less: F) -> Self {
        Self {
            less,
            _marker: PhantomData,
        }
    }
}

impl<T, F> Comparator for LessComparator<T, F>
where
    F: Fn(&T, &T) -> bool + Send + Sync + Clone,
{
    type Item = T;

    fn compare(&self, a: &Self::Item, b: &Self::Item) -> cmp::Ordering {
        if (self.less)(a, b) {
            cmp::Ordering::Less
        } else if (self.less)(b, a) {
            cmp::Ordering::Greater
        } else {
            cmp::Ordering::Equal
        }
    }
}

impl<T, F: Clone> Clone for LessComparator<T, F> {
    fn clone(&self) -> Self {
        Self {
            less: self.less.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, F> fmt::Debug for LessComparator<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessComparator").finish_non_exhaustive()
    }
}
