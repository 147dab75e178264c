//! VFS error definitions

use crate::types::{
    CANTOPEN, IOERR, IOERR_CLOSE, IOERR_FSTAT, IOERR_FSYNC, IOERR_READ, IOERR_SHORT_READ,
    IOERR_WRITE, OK,
};
use std::error::Error;
use std::fmt;

/// VFS error types
///
/// Every host failure is translated into exactly one of these at the point where it is
/// detected; each variant corresponds to one engine status code (see [`VfsError::code`]).
#[derive(Debug)]
pub enum VfsError {
    /// The file could not be opened
    CantOpen(String, Option<std::io::Error>),
    /// Seek or read failure while reading
    Read(std::io::Error),
    /// Fewer bytes than requested were available; the buffer has been zero-filled
    ShortRead { requested: usize, available: usize },
    /// Seek or write failure, including a partial write
    Write(std::io::Error),
    /// Releasing the host stream failed
    Close(std::io::Error),
    /// Flushing buffered writes failed
    Fsync(std::io::Error),
    /// The file size could not be determined
    Fstat(std::io::Error),
    /// Generic I/O error
    Io(String),
    /// Invalid argument error
    InvalidArgument(String),
    /// Configuration could not be parsed or is out of range
    Config(String),
}

impl VfsError {
    /// Engine status code for this error
    pub fn code(&self) -> i32 {
        match self {
            VfsError::CantOpen(..) => CANTOPEN,
            VfsError::Read(_) => IOERR_READ,
            VfsError::ShortRead { .. } => IOERR_SHORT_READ,
            VfsError::Write(_) => IOERR_WRITE,
            VfsError::Close(_) => IOERR_CLOSE,
            VfsError::Fsync(_) => IOERR_FSYNC,
            VfsError::Fstat(_) => IOERR_FSTAT,
            VfsError::Io(_) | VfsError::InvalidArgument(_) | VfsError::Config(_) => IOERR,
        }
    }
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::CantOpen(path, Some(err)) => write!(f, "Cannot open {}: {}", path, err),
            VfsError::CantOpen(path, None) => write!(f, "Cannot open {}", path),
            VfsError::Read(err) => write!(f, "Read error: {}", err),
            VfsError::ShortRead {
                requested,
                available,
            } => write!(
                f,
                "Short read: requested {} bytes, {} available",
                requested, available
            ),
            VfsError::Write(err) => write!(f, "Write error: {}", err),
            VfsError::Close(err) => write!(f, "Close error: {}", err),
            VfsError::Fsync(err) => write!(f, "Sync error: {}", err),
            VfsError::Fstat(err) => write!(f, "Stat error: {}", err),
            VfsError::Io(msg) => write!(f, "I/O error: {}", msg),
            VfsError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            VfsError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for VfsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            VfsError::CantOpen(_, Some(err))
            | VfsError::Read(err)
            | VfsError::Write(err)
            | VfsError::Close(err)
            | VfsError::Fsync(err)
            | VfsError::Fstat(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> Self {
        VfsError::Io(err.to_string())
    }
}

impl From<std::ffi::NulError> for VfsError {
    fn from(err: std::ffi::NulError) -> Self {
        VfsError::InvalidArgument(err.to_string())
    }
}

impl From<serde_json::Error> for VfsError {
    fn from(err: serde_json::Error) -> Self {
        VfsError::Config(err.to_string())
    }
}

/// Result type for VFS operations
pub type VfsResult<T> = Result<T, VfsError>;

/// Collapse a result into the status code handed back to the engine
pub fn status_of<T>(result: &VfsResult<T>) -> i32 {
    match result {
        Ok(_) => OK,
        Err(err) => err.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn io_err() -> io::Error {
        io::Error::new(io::ErrorKind::Other, "boom")
    }

    #[test]
    fn test_vfs_error_codes() {
        assert_eq!(VfsError::CantOpen("a.db".to_string(), None).code(), CANTOPEN);
        assert_eq!(VfsError::Read(io_err()).code(), IOERR_READ);
        assert_eq!(
            VfsError::ShortRead {
                requested: 16,
                available: 0
            }
            .code(),
            IOERR_SHORT_READ
        );
        assert_eq!(VfsError::Write(io_err()).code(), IOERR_WRITE);
        assert_eq!(VfsError::Close(io_err()).code(), IOERR_CLOSE);
        assert_eq!(VfsError::Fsync(io_err()).code(), IOERR_FSYNC);
        assert_eq!(VfsError::Fstat(io_err()).code(), IOERR_FSTAT);
        assert_eq!(VfsError::Io("x".to_string()).code(), IOERR);
        assert_eq!(VfsError::Config("x".to_string()).code(), IOERR);
    }

    #[test]
    fn test_status_of() {
        let ok: VfsResult<u64> = Ok(7);
        assert_eq!(status_of(&ok), OK);

        let err: VfsResult<()> = Err(VfsError::Write(io_err()));
        assert_eq!(status_of(&err), IOERR_WRITE);
    }

    #[test]
    fn test_vfs_error_display() {
        let err = VfsError::CantOpen("missing.db".to_string(), None);
        assert_eq!(err.to_string(), "Cannot open missing.db");

        let err = VfsError::ShortRead {
            requested: 16,
            available: 4,
        };
        assert_eq!(err.to_string(), "Short read: requested 16 bytes, 4 available");
    }

    #[test]
    fn test_vfs_error_source() {
        assert!(VfsError::Fsync(io_err()).source().is_some());
        assert!(VfsError::Io("x".to_string()).source().is_none());
    }

    #[test]
    fn test_vfs_error_from_nul() {
        let nul_err = std::ffi::CString::new("a\0b").unwrap_err();
        let err: VfsError = nul_err.into();
        assert!(matches!(err, VfsError::InvalidArgument(_)));
    }
}
