mod arena;
pub mod comparator;
pub mod skip_list;

pub mod prelude {
    pub use crate::comparator::prelude::*;
    pub use crate::skip_list::{MAX_LEVEL, SkipList, SkipListIter};
}
