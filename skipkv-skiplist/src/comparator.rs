use std::cmp;

mod default_comparator;
mod less_comparator;
mod reverse_comparator;

pub mod prelude {
    #![allow(unused)]

    pub use super::{
        Comparator, default_comparator::DefaultComparator, less_comparator::LessComparator,
        reverse_comparator::ReverseComparator,
    };
}

/// Total order over the keys of a list.
///
/// Two keys comparing `Equal` are the same key as far as the list is
/// concerned, whatever their `PartialEq` says.
pub trait Comparator: Send + Sync + Clone {
    type Item;

    fn compare(&self, a: &Self::Item, b: &Self::Item) -> cmp::Ordering;
}
