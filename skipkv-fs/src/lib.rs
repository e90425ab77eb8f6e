mod memory;
mod native;
mod traits;

pub mod prelude {
    pub use crate::memory::prelude::*;
    pub use crate::native::prelude::*;
    pub use crate::traits::{File, FileSystem};
}
