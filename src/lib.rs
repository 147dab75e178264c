//! FeOS VFS: storage engine file system adapter for the FeOS host

// Global type definitions
pub mod types;

pub mod vfs;

// Re-export vfs items for easier access
pub use vfs::VfsError;
pub use vfs::{FeosFile, FeosVfs, Vfs, VfsFile, VfsResult};
