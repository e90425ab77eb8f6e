use std::{io, path::Path};

use crate::traits::{File, FileSystem};

pub mod prelude {
    pub use super::{NativeFile, NativeFileSystem};
}

pub type NativeFile = std::fs::File;

impl File for NativeFile {
    fn len(&self) -> io::Result<u64> {
        self.metadata().map(|m| m.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        io::Write::flush(self)?;
        self.sync_data()
    }

    fn try_lock(&self) -> io::Result<()> {
        fs2::FileExt::try_lock_exclusive(self)
    }

    fn unlock(&self) -> io::Result<()> {
        fs2::FileExt::unlock(self)
    }
}

#[derive(Debug, Default, Clone)]
pub struct NativeFileSystem;

impl FileSystem for NativeFileSystem {
    type File = NativeFile;

    fn create<P: AsRef<Path>>(&self, path: P) -> io::Result<Self::File> {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
    }

    fn append<P: AsRef<Path>>(&self, path: P) -> io::Result<Self::File> {
        std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
    }

    fn open<P: AsRef<Path>>(&self, path: P) -> io::Result<Self::File> {
        std::fs::OpenOptions::new().read(true).open(path)
    }

    fn remove<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn mkdir_all<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        path.as_ref().exists()
    }
}
