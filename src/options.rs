use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use skipkv_fs::prelude::*;
use skipkv_skiplist::prelude::*;

use crate::{
    error::{Error, Result},
    store::SkipListStore,
};

/// What `dump` does with an existing dump file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DumpMode {
    /// Add records after the current contents. Dumping twice repeats every
    /// record; loading such a file keeps the first value of each key.
    #[default]
    Append,

    /// Replace the current contents.
    Truncate,
}

#[derive(Debug)]
pub struct StoreOptions {
    pub(crate) dump_path: PathBuf,

    pub(crate) dump_mode: DumpMode,

    pub(crate) create_dir: bool,
}

impl StoreOptions {
    pub fn dump_path(&self) -> &Path {
        &self.dump_path
    }

    pub fn dump_mode(&self) -> DumpMode {
        self.dump_mode
    }

    pub fn create_dir(&self) -> bool {
        self.create_dir
    }
}

#[derive(Debug, Clone)]
pub struct StoreOpenOptions {
    dump_path: PathBuf,

    dump_mode: DumpMode,

    create_dir: bool,
}

impl Default for StoreOpenOptions {
    fn default() -> Self {
        Self {
            dump_path: PathBuf::from("./store/dumpFile"),
            dump_mode: DumpMode::Append,
            create_dir: true,
        }
    }
}

impl StoreOpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// File that `dump` writes and `load` reads.
    pub fn dump_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.dump_path = path.into();
        self
    }

    pub fn dump_mode(&mut self, mode: DumpMode) -> &mut Self {
        self.dump_mode = mode;
        self
    }

    /// Create the parent directory of the dump file before dumping.
    pub fn create_dir(&mut self, create: bool) -> &mut Self {
        self.create_dir = create;
        self
    }

    pub fn build(&self) -> Result<Arc<StoreOptions>> {
        if self.dump_path.file_name().is_none() {
            return Err(Error::InvalidOptions(format!(
                "dump path {:?} does not name a file",
                self.dump_path
            )));
        }

        let opts = StoreOptions {
            dump_path: self.dump_path.clone(),
            dump_mode: self.dump_mode,
            create_dir: self.create_dir,
        };
        Ok(Arc::new(opts))
    }

    pub fn open<K, V, C, F>(
        &self,
        list: SkipList<K, V, C>,
        fs: F,
    ) -> Result<SkipListStore<K, V, C, F>>
    where
        C: Comparator<Item = K>,
        F: FileSystem,
    {
        Ok(SkipListStore::new(list, fs, self.build()?))
    }
}
