//! Host platform primitives using C stdio streams and libc calls
//!
//! The host offers byte streams (open/read/write/seek/flush/close), file removal, a stat-based
//! existence check, the working directory and a wall clock. Nothing else is assumed to exist.

use crate::types::c_str_len;
use libc::{self, c_char, c_void, off_t, size_t, FILE};
use std::ffi::{CStr, CString};
use std::io;
use std::mem::MaybeUninit;
use std::ptr;
use tracing::warn;

/// fopen mode used for a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// Existing file, read only ("rb")
    Read,
    /// Existing file, read and write ("r+b")
    ReadWrite,
    /// New or emptied file, read and write ("w+b")
    Create,
}

impl StreamMode {
    fn as_c_str(&self) -> &'static CStr {
        match self {
            StreamMode::Read => c"rb",
            StreamMode::ReadWrite => c"r+b",
            StreamMode::Create => c"w+b",
        }
    }
}

fn c_path(path: &str) -> io::Result<CString> {
    CString::new(path).map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
}

fn to_off_t(offset: u64) -> io::Result<off_t> {
    off_t::try_from(offset).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("offset {} out of range", offset),
        )
    })
}

/// Host stream handle
///
/// Owns one `FILE*`. A stream dropped without `close` is closed on drop.
#[derive(Debug)]
pub struct HostStream {
    fp: *mut FILE,
}

// The stream is owned by exactly one handle and never shared
unsafe impl Send for HostStream {}

impl HostStream {
    /// Open `path` with the given mode
    pub fn open(path: &str, mode: StreamMode) -> io::Result<Self> {
        let c_path = c_path(path)?;

        let fp = unsafe { libc::fopen(c_path.as_ptr(), mode.as_c_str().as_ptr()) };

        if fp.is_null() {
            Err(io::Error::last_os_error())
        } else {
            Ok(HostStream { fp })
        }
    }

    /// Position the stream at `offset` from the start
    pub fn seek(&mut self, offset: u64) -> io::Result<()> {
        let offset = to_off_t(offset)?;

        let result = unsafe { libc::fseeko(self.fp, offset, libc::SEEK_SET) };

        if result != 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    /// Position the stream at end of file and return the resulting offset
    pub fn seek_end(&mut self) -> io::Result<u64> {
        let result = unsafe { libc::fseeko(self.fp, 0, libc::SEEK_END) };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }

        let position = unsafe { libc::ftello(self.fp) };
        if position < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(position as u64)
        }
    }

    /// Read up to `buf.len()` bytes at the current position
    ///
    /// A count below `buf.len()` without the stream error indicator set means end of file.
    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = unsafe {
            libc::fread(
                buf.as_mut_ptr() as *mut c_void,
                1,
                buf.len() as size_t,
                self.fp,
            )
        };

        if count < buf.len() && unsafe { libc::ferror(self.fp) } != 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::clearerr(self.fp) };
            Err(err)
        } else {
            Ok(count)
        }
    }

    /// Write up to `buf.len()` bytes at the current position
    pub fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let count = unsafe {
            libc::fwrite(
                buf.as_ptr() as *const c_void,
                1,
                buf.len() as size_t,
                self.fp,
            )
        };

        if count < buf.len() && unsafe { libc::ferror(self.fp) } != 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::clearerr(self.fp) };
            Err(err)
        } else {
            Ok(count)
        }
    }

    /// Push buffered writes down to the host
    pub fn flush(&mut self) -> io::Result<()> {
        let result = unsafe { libc::fflush(self.fp) };

        if result != 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::clearerr(self.fp) };
            Err(err)
        } else {
            Ok(())
        }
    }

    /// Release the stream
    pub fn close(mut self) -> io::Result<()> {
        let fp = std::mem::replace(&mut self.fp, ptr::null_mut());

        let result = unsafe { libc::fclose(fp) };

        if result != 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

impl Drop for HostStream {
    fn drop(&mut self) {
        if !self.fp.is_null() {
            warn!("host stream dropped without close");
            // Close the stream regardless of result
            let _ = unsafe { libc::fclose(self.fp) };
            self.fp = ptr::null_mut();
        }
    }
}

/// Remove a file
pub fn remove(path: &str) -> io::Result<()> {
    let c_path = c_path(path)?;

    let result = unsafe { libc::remove(c_path.as_ptr()) };

    if result != 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

/// Existence check; any stat failure counts as absent
pub fn exists(path: &str) -> bool {
    let Ok(c_path) = c_path(path) else {
        return false;
    };
    let mut statbuf = MaybeUninit::<libc::stat>::uninit();

    let result = unsafe { libc::stat(c_path.as_ptr(), statbuf.as_mut_ptr()) };

    result == 0
}

/// Write the NUL-terminated working directory into `buf`, returning its length
pub fn getcwd(buf: &mut [u8]) -> io::Result<usize> {
    if buf.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "empty working directory buffer",
        ));
    }

    let result = unsafe { libc::getcwd(buf.as_mut_ptr() as *mut c_char, buf.len() as size_t) };

    if result.is_null() {
        Err(io::Error::last_os_error())
    } else {
        Ok(c_str_len(buf))
    }
}

/// Wall clock in whole seconds since the Unix epoch
pub fn time() -> i64 {
    unsafe { libc::time(ptr::null_mut()) as i64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn path_in(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_str().unwrap().to_string()
    }

    #[test]
    fn test_stream_open_missing() {
        let dir = TempDir::new().unwrap();
        let err = HostStream::open(&path_in(&dir, "missing"), StreamMode::ReadWrite).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
    }

    #[test]
    fn test_stream_write_seek_read() {
        let dir = TempDir::new().unwrap();
        let path = path_in(&dir, "stream.dat");

        let mut stream = HostStream::open(&path, StreamMode::Create).unwrap();
        assert_eq!(stream.write(b"0123456789").unwrap(), 10);
        assert_eq!(stream.seek_end().unwrap(), 10);

        stream.seek(4).unwrap();
        let mut buf = [0u8; 3];
        assert_eq!(stream.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"456");

        stream.seek(8).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(stream.read(&mut buf).unwrap(), 2);

        stream.flush().unwrap();
        stream.close().unwrap();
    }

    #[test]
    fn test_failed_flush_clears_error_indicator() {
        if !std::path::Path::new("/dev/full").exists() {
            return;
        }

        let mut stream = HostStream::open("/dev/full", StreamMode::ReadWrite).unwrap();
        assert_eq!(stream.write(&[1u8; 16]).unwrap(), 16);

        let err = stream.flush().unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ENOSPC));
        assert_eq!(unsafe { libc::ferror(stream.fp) }, 0);

        stream.close().unwrap();
    }

    #[test]
    fn test_remove_and_exists() {
        let dir = TempDir::new().unwrap();
        let path = path_in(&dir, "gone.dat");

        assert!(!exists(&path));
        HostStream::open(&path, StreamMode::Create)
            .unwrap()
            .close()
            .unwrap();
        assert!(exists(&path));

        remove(&path).unwrap();
        assert!(!exists(&path));
        assert!(remove(&path).is_err());
    }

    #[test]
    fn test_getcwd() {
        let mut buf = [0u8; 4096];
        let len = getcwd(&mut buf).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(std::str::from_utf8(&buf[..len]).unwrap(), cwd.to_str().unwrap());

        let mut tiny = [0u8; 1];
        assert!(getcwd(&mut tiny).is_err());
    }

    #[test]
    fn test_time_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(time() > 1_577_836_800);
    }
}
