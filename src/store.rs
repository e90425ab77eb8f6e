use std::{
    fmt::Display,
    io::{BufReader, BufWriter},
    ops::Deref,
    str::FromStr,
    sync::Arc,
};

use skipkv_fs::prelude::*;
use skipkv_skiplist::prelude::*;

use crate::{
    error::Result,
    options::{DumpMode, StoreOptions},
    persist::{LoadStats, dump_to, load_from},
};

/// A skip list bound to a dump file on some file system.
///
/// Derefs to the list, so the map operations are called on the store
/// directly.
pub struct SkipListStore<K, V, C, F> {
    list: SkipList<K, V, C>,
    fs: F,
    options: Arc<StoreOptions>,
}

impl<K, V, C, F> SkipListStore<K, V, C, F>
where
    C: Comparator<Item = K>,
    F: FileSystem,
{
    pub fn new(list: SkipList<K, V, C>, fs: F, options: Arc<StoreOptions>) -> Self {
        Self { list, fs, options }
    }

    pub fn list(&self) -> &SkipList<K, V, C> {
        &self.list
    }

    pub fn into_list(self) -> SkipList<K, V, C> {
        self.list
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Writes the whole list to the dump file and returns the number of
    /// records written.
    ///
    /// The file is locked for the duration; a concurrent dump to the same
    /// file fails with `WouldBlock`.
    pub fn dump(&self) -> Result<usize>
    where
        K: Display,
        V: Display,
    {
        let path = self.options.dump_path();
        if self.options.create_dir() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                self.fs.mkdir_all(parent)?;
            }
        }

        let mut file = match self.options.dump_mode() {
            DumpMode::Append => self.fs.append(path)?,
            DumpMode::Truncate => self.fs.create(path)?,
        };
        file.try_lock()?;

        let written = {
            let mut writer = BufWriter::new(&mut file);
            dump_to(&self.list, &mut writer)
        };
        let written = written.and_then(|written| {
            file.sync()?;
            Ok(written)
        });
        let unlocked = file.unlock();
        let written = written?;
        unlocked?;

        tracing::info!(written, path = ?path, mode = ?self.options.dump_mode(), "dump finished");
        Ok(written)
    }

    /// Inserts the records of the dump file into the list. A missing file
    /// loads nothing.
    pub fn load(&self) -> Result<LoadStats>
    where
        K: FromStr,
        V: FromStr,
    {
        let path = self.options.dump_path();
        if !self.fs.exists(path) {
            tracing::info!(path = ?path, "no dump file, nothing to load");
            return Ok(LoadStats::default());
        }

        let file = self.fs.open(path)?;
        load_from(&self.list, BufReader::new(file))
    }
}

impl<K, V, C, F> Deref for SkipListStore<K, V, C, F> {
    type Target = SkipList<K, V, C>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}
