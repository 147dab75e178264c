//! File handle adapter over a host stream

use crate::types::{DeviceCharacteristics, LockLevel, SECTOR_SIZE, SyncFlags};
use crate::vfs::error::{VfsError, VfsResult};
use crate::vfs::host::HostStream;
use crate::vfs::interface::VfsFile;
use std::any::Any;
use std::io;
use tracing::{debug, trace};

/// One open file
///
/// Created only by a successful open, so holding a `FeosFile` means the host stream is valid.
#[derive(Debug)]
pub struct FeosFile {
    stream: HostStream,
    path: String,
}

impl FeosFile {
    /// Wrap an opened host stream
    pub fn new(stream: HostStream, path: &str) -> Self {
        FeosFile {
            stream,
            path: path.to_string(),
        }
    }

    /// Path the file was opened with
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl VfsFile for FeosFile {
    fn read(&mut self, buf: &mut [u8], offset: u64) -> VfsResult<()> {
        trace!(path = %self.path, offset, len = buf.len(), "read");

        self.stream.seek(offset).map_err(VfsError::Read)?;
        let count = self.stream.read(buf).map_err(VfsError::Read)?;

        if count < buf.len() {
            // The host reports an incomplete record as nothing read
            buf.fill(0);
            trace!(path = %self.path, count, "read returns short read");
            return Err(VfsError::ShortRead {
                requested: buf.len(),
                available: count,
            });
        }

        Ok(())
    }

    fn write(&mut self, buf: &[u8], offset: u64) -> VfsResult<()> {
        trace!(path = %self.path, offset, len = buf.len(), "write");

        self.stream.seek(offset).map_err(VfsError::Write)?;
        let count = self.stream.write(buf).map_err(VfsError::Write)?;

        if count != buf.len() {
            return Err(VfsError::Write(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("wrote {} of {} bytes", count, buf.len()),
            )));
        }

        Ok(())
    }

    fn truncate(&mut self, size: u64) -> VfsResult<()> {
        // No truncate primitive on the host; the file keeps its current length
        trace!(path = %self.path, size, "truncate ignored");
        Ok(())
    }

    fn sync(&mut self, flags: SyncFlags) -> VfsResult<()> {
        trace!(path = %self.path, ?flags, "sync");
        self.stream.flush().map_err(VfsError::Fsync)
    }

    fn file_size(&mut self) -> VfsResult<u64> {
        let size = self.stream.seek_end().map_err(VfsError::Fstat)?;
        trace!(path = %self.path, size, "file_size");
        Ok(size)
    }

    fn lock(&mut self, level: LockLevel) -> VfsResult<()> {
        trace!(path = %self.path, ?level, "lock");
        Ok(())
    }

    fn unlock(&mut self, level: LockLevel) -> VfsResult<()> {
        trace!(path = %self.path, ?level, "unlock");
        Ok(())
    }

    fn check_reserved_lock(&mut self) -> VfsResult<bool> {
        Ok(false)
    }

    fn file_control(&mut self, op: i32, _arg: Option<&mut dyn Any>) -> VfsResult<()> {
        trace!(path = %self.path, op, "file_control");
        Ok(())
    }

    fn sector_size(&self) -> u32 {
        SECTOR_SIZE
    }

    fn device_characteristics(&self) -> DeviceCharacteristics {
        DeviceCharacteristics::empty()
    }

    fn close(self: Box<Self>) -> VfsResult<()> {
        let FeosFile { stream, path } = *self;
        debug!(path = %path, "close");
        stream.close().map_err(VfsError::Close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::host::StreamMode;
    use tempfile::TempDir;

    fn create_file(dir: &TempDir, name: &str) -> FeosFile {
        let path = dir.path().join(name);
        let path = path.to_str().unwrap();
        let stream = HostStream::open(path, StreamMode::Create).unwrap();
        FeosFile::new(stream, path)
    }

    #[test]
    fn test_partial_read_zero_fills_whole_buffer() {
        let dir = TempDir::new().unwrap();
        let mut file = create_file(&dir, "partial.db");
        file.write(b"abcdef", 0).unwrap();

        let mut buf = [0xAAu8; 8];
        let err = file.read(&mut buf, 2).unwrap_err();
        assert!(matches!(
            err,
            VfsError::ShortRead {
                requested: 8,
                available: 4
            }
        ));
        assert_eq!(buf, [0u8; 8]);

        Box::new(file).close().unwrap();
    }

    #[test]
    fn test_write_past_end_extends_file() {
        let dir = TempDir::new().unwrap();
        let mut file = create_file(&dir, "sparse.db");

        file.write(b"tail", 100).unwrap();
        assert_eq!(file.file_size().unwrap(), 104);

        let mut buf = [0xAAu8; 4];
        file.read(&mut buf, 50).unwrap();
        assert_eq!(buf, [0u8; 4]);

        Box::new(file).close().unwrap();
    }

    #[test]
    fn test_write_offset_out_of_range() {
        let dir = TempDir::new().unwrap();
        let mut file = create_file(&dir, "range.db");

        let err = file.write(b"x", u64::MAX).unwrap_err();
        assert!(matches!(err, VfsError::Write(_)));

        let mut buf = [0u8; 1];
        let err = file.read(&mut buf, u64::MAX).unwrap_err();
        assert!(matches!(err, VfsError::Read(_)));

        Box::new(file).close().unwrap();
    }

    #[test]
    fn test_path_and_capabilities() {
        let dir = TempDir::new().unwrap();
        let file = create_file(&dir, "caps.db");

        assert!(file.path().ends_with("caps.db"));
        assert_eq!(file.sector_size(), 512);
        assert!(file.device_characteristics().is_empty());
    }
}
