//! VFS interface definitions

use crate::types::{AccessMode, DeviceCharacteristics, LockLevel, MS_PER_DAY, OpenFlags, SyncFlags};
use crate::vfs::error::VfsResult;
use std::any::Any;

/// Opaque handle to a dynamically loaded library
#[derive(Debug, PartialEq, Eq)]
pub struct DlHandle(pub usize);

/// Entry point resolved from a dynamically loaded library
pub type DlSymbol = unsafe extern "C" fn();

/// Immutable description of a VFS implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsDescriptor {
    /// Version of the operation table
    pub version: i32,
    /// Name the VFS is registered under
    pub name: String,
    /// Maximum length of a path produced by `full_pathname`
    pub max_pathname: usize,
    /// Size of the per-open-file state
    pub file_state_size: usize,
}

/// Open file trait for VFS operations
/// This trait represents one open file owned by the engine; it exists only after a
/// successful open and is consumed by `close`.
pub trait VfsFile: Send {
    /// Read exactly `buf.len()` bytes at `offset`
    fn read(&mut self, buf: &mut [u8], offset: u64) -> VfsResult<()>;

    /// Write all of `buf` at `offset`
    fn write(&mut self, buf: &[u8], offset: u64) -> VfsResult<()>;

    /// Resize the file to `size` bytes
    fn truncate(&mut self, size: u64) -> VfsResult<()>;

    /// Make previous writes durable
    fn sync(&mut self, flags: SyncFlags) -> VfsResult<()>;

    /// Current size of the file in bytes
    fn file_size(&mut self) -> VfsResult<u64>;

    fn lock(&mut self, level: LockLevel) -> VfsResult<()>;

    fn unlock(&mut self, level: LockLevel) -> VfsResult<()>;

    /// Whether any connection holds a reserved lock on the file
    fn check_reserved_lock(&mut self) -> VfsResult<bool>;

    /// Engine-specific control operation
    fn file_control(&mut self, op: i32, arg: Option<&mut dyn Any>) -> VfsResult<()>;

    /// I/O granularity hint in bytes
    fn sector_size(&self) -> u32;

    fn device_characteristics(&self) -> DeviceCharacteristics;

    /// Close the file handle
    fn close(self: Box<Self>) -> VfsResult<()>;
}

/// VFS interface trait
/// This trait defines the filesystem-wide operations the engine requires from a host adapter
pub trait Vfs: Send + Sync {
    /// Capability limits and name of this VFS
    fn descriptor(&self) -> &VfsDescriptor;

    /// Open a file and return a handle to it
    ///
    /// # Arguments
    /// * `path` - The path to open; `None` requests an anonymous temporary file
    /// * `flags` - Access mode and file role requested by the engine
    ///
    /// # Returns
    /// * `Ok(Box<dyn VfsFile>)` if the file was opened successfully
    /// * `Err(VfsError)` if an error occurred
    fn open(&self, path: Option<&str>, flags: OpenFlags) -> VfsResult<Box<dyn VfsFile>>;

    /// Remove a file
    ///
    /// # Arguments
    /// * `path` - The path to the file to remove
    /// * `sync_dir` - Whether the containing directory should be made durable afterwards
    fn delete(&self, path: &str, sync_dir: bool) -> VfsResult<()>;

    /// Check whether `path` is accessible with the requested access level
    fn access(&self, path: &str, mode: AccessMode) -> VfsResult<bool>;

    /// Canonicalize `name` into `out` as a NUL-terminated absolute path
    ///
    /// # Returns
    /// * `Ok(usize)` - The length of the path written, excluding the terminator
    /// * `Err(VfsError)` if an error occurred
    fn full_pathname(&self, name: &str, out: &mut [u8]) -> VfsResult<usize>;

    /// Fill `out` with random bytes, returning how many were produced
    fn randomness(&self, out: &mut [u8]) -> usize;

    /// Sleep for `micros` microseconds, returning the time actually slept
    fn sleep(&self, micros: u32) -> u32;

    /// Current time as milliseconds since the Julian epoch
    fn current_time_i64(&self) -> VfsResult<i64>;

    /// Current time as a fractional Julian day number
    fn current_time(&self) -> VfsResult<f64> {
        Ok(self.current_time_i64()? as f64 / MS_PER_DAY)
    }

    /// Last host error code and message, if the host keeps one
    fn last_error(&self) -> Option<(i32, String)> {
        None
    }

    fn dl_open(&self, path: &str) -> Option<DlHandle>;

    /// Write the last dynamic loading error message into `out`
    fn dl_error(&self, out: &mut [u8]);

    fn dl_sym(&self, handle: &DlHandle, symbol: &str) -> Option<DlSymbol>;

    fn dl_close(&self, handle: DlHandle);
}
