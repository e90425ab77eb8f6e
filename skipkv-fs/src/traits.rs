use std::{
    io::{self, Read, Write},
    path::Path,
};

pub trait File: Read + Write + Send {
    fn len(&self) -> io::Result<u64>;

    fn is_empty(&self) -> io::Result<bool> {
        self.len().map(|len| len == 0)
    }

    /// Flushes buffered writes down to the backing storage.
    fn sync(&mut self) -> io::Result<()>;

    /// Takes an exclusive advisory lock, failing with `WouldBlock` if someone
    /// else holds it.
    fn try_lock(&self) -> io::Result<()>;

    fn unlock(&self) -> io::Result<()>;
}

pub trait FileSystem: Send + Sync {
    type File: File;

    /// Opens `path` for writing, truncating it or creating it.
    fn create<P: AsRef<Path>>(&self, path: P) -> io::Result<Self::File>;

    /// Opens `path` for writing at its end, creating it if missing.
    fn append<P: AsRef<Path>>(&self, path: P) -> io::Result<Self::File>;

    /// Opens an existing file for reading from the start.
    fn open<P: AsRef<Path>>(&self, path: P) -> io::Result<Self::File>;

    fn remove<P: AsRef<Path>>(&self, path: P) -> io::Result<()>;

    fn mkdir_all<P: AsRef<Path>>(&self, path: P) -> io::Result<()>;

    fn exists<P: AsRef<Path>>(&self, path: P) -> bool;
}
