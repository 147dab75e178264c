//! VFS (Virtual File System) module
//!
//! This module implements the engine's pluggable file system contract on top of the host's
//! stream primitives: a file handle adapter for each open file and a filesystem adapter for
//! path-level operations, registered once at startup.

// Re-export error types and result type
pub mod error;
pub use error::{VfsError, VfsResult, status_of};

// Re-export interface traits
pub mod interface;
pub use interface::{DlHandle, DlSymbol, Vfs, VfsDescriptor, VfsFile};

pub mod config;
pub use config::{EntropySource, VfsConfig};

pub mod host;

// Re-export the FeOS adapters
pub mod file;
pub use file::FeosFile;

pub mod fs;
pub use fs::FeosVfs;

pub mod registry;
pub use registry::{find, os_end, os_init, register, registered_names, unregister};
