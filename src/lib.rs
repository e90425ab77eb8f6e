pub mod error;
pub mod format;
pub mod options;
pub mod persist;
pub mod store;

#[cfg(test)]
mod test_utils;

pub mod prelude {
    pub use skipkv_fs::prelude::*;
    pub use skipkv_skiplist::prelude::*;

    pub use crate::{
        error::{Error, Result},
        options::{DumpMode, StoreOpenOptions, StoreOptions},
        persist::LoadStats,
        store::SkipListStore,
    };
}
