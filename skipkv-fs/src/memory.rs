use std::{
    collections::{HashMap, HashSet},
    io,
    path::{Component, Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::RwLock;

use crate::traits::{File, FileSystem};

pub mod prelude {
    pub use super::{MemFile, MemFileSystem};
}

#[derive(Debug, Default)]
struct Inode {
    data: RwLock<Vec<u8>>,
    locked: AtomicBool,
}

/// A file system living in process memory. Clones share the same files.
#[derive(Debug, Default, Clone)]
pub struct MemFileSystem {
    inner: Arc<MemFileSystemInner>,
}

#[derive(Debug, Default)]
struct MemFileSystemInner {
    files: RwLock<HashMap<PathBuf, Arc<Inode>>>,
    dirs: RwLock<HashSet<PathBuf>>,
}

pub struct MemFile {
    inode: Arc<Inode>,
    pos: usize,
    append: bool,
    holds_lock: AtomicBool,
}

impl MemFile {
    fn new(inode: Arc<Inode>, append: bool) -> Self {
        Self {
            inode,
            pos: 0,
            append,
            holds_lock: AtomicBool::new(false),
        }
    }
}

impl io::Read for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let data = self.inode.data.read();

        // another handle may have truncated the file under us
        let remaining = data.len().saturating_sub(self.pos);
        if remaining == 0 {
            return Ok(0);
        }

        let read_len = buf.len().min(remaining);
        buf[..read_len].copy_from_slice(&data[self.pos..self.pos + read_len]);
        self.pos += read_len;
        Ok(read_len)
    }
}

impl io::Write for MemFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut data = self.inode.data.write();

        if self.append {
            self.pos = data.len();
        }
        let new_len = self.pos + buf.len();
        if data.len() < new_len {
            data.resize(new_len, 0);
        }

        data[self.pos..new_len].copy_from_slice(buf);
        self.pos = new_len;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl File for MemFile {
    fn len(&self) -> io::Result<u64> {
        Ok(self.inode.data.read().len() as u64)
    }

    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn try_lock(&self) -> io::Result<()> {
        if self
            .inode
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            return Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "File already locked",
            ));
        }
        self.holds_lock.store(true, Ordering::Release);
        Ok(())
    }

    fn unlock(&self) -> io::Result<()> {
        if self.holds_lock.swap(false, Ordering::AcqRel) {
            self.inode.locked.store(false, Ordering::Release);
        }
        Ok(())
    }
}

impl Drop for MemFile {
    fn drop(&mut self) {
        // closing a native file releases its lock as well
        let _ = self.unlock();
    }
}

impl FileSystem for MemFileSystem {
    type File = MemFile;

    fn create<P: AsRef<Path>>(&self, path: P) -> io::Result<Self::File> {
        let inode = self.open_or_create(path.as_ref())?;
        inode.data.write().clear();
        Ok(MemFile::new(inode, false))
    }

    fn append<P: AsRef<Path>>(&self, path: P) -> io::Result<Self::File> {
        let inode = self.open_or_create(path.as_ref())?;
        Ok(MemFile::new(inode, true))
    }

    fn open<P: AsRef<Path>>(&self, path: P) -> io::Result<Self::File> {
        let path = normalize(path.as_ref())?;
        match self.inner.files.read().get(&path) {
            Some(inode) => Ok(MemFile::new(inode.clone(), false)),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "File not found")),
        }
    }

    fn remove<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = normalize(path.as_ref())?;
        match self.inner.files.write().remove(&path) {
            Some(_) => Ok(()),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "File not found")),
        }
    }

    fn mkdir_all<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = normalize(path.as_ref())?;
        if self.inner.files.read().contains_key(&path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "Path component is a file",
            ));
        }

        let mut dirs = self.inner.dirs.write();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        let Ok(path) = normalize(path.as_ref()) else {
            return false;
        };
        path.as_os_str().is_empty()
            || self.inner.files.read().contains_key(&path)
            || self.inner.dirs.read().contains(&path)
    }
}

impl MemFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn open_or_create(&self, path: &Path) -> io::Result<Arc<Inode>> {
        let path = normalize(path)?;
        if path.as_os_str().is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "Empty path"));
        }
        if self.inner.dirs.read().contains(&path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "Path is a directory",
            ));
        }

        let parent = path.parent().unwrap_or(Path::new(""));
        if !parent.as_os_str().is_empty() && !self.inner.dirs.read().contains(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "Parent directory not found",
            ));
        }

        let mut files = self.inner.files.write();
        Ok(files.entry(path).or_default().clone())
    }
}

// Root and current-directory components are dropped, so `/a/b`, `./a/b` and
// `a/b` name the same file.
fn normalize(path: &Path) -> io::Result<PathBuf> {
    let mut res = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => res.push(name),
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                if !res.pop() {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "Path escapes the root",
                    ));
                }
            }
        }
    }
    Ok(res)
}
