//! Global type definitions
//!
//! Stores constants, flag sets and status codes shared by the file handle adapter,
//! the filesystem adapter and the registry.

// ============================================================================
// Engine status codes
// ============================================================================

/// Operation completed successfully
pub const OK: i32 = 0;

/// Generic I/O error
pub const IOERR: i32 = 10;

/// Unable to open the database file
pub const CANTOPEN: i32 = 14;

pub const IOERR_READ: i32 = IOERR | (1 << 8);
pub const IOERR_SHORT_READ: i32 = IOERR | (2 << 8);
pub const IOERR_WRITE: i32 = IOERR | (3 << 8);
pub const IOERR_FSYNC: i32 = IOERR | (4 << 8);
pub const IOERR_FSTAT: i32 = IOERR | (7 << 8);
pub const IOERR_CLOSE: i32 = IOERR | (16 << 8);

// ============================================================================
// Adapter constants
// ============================================================================

/// Name the adapter registers under
pub const VFS_NAME: &str = "feos";

/// Version of the filesystem operation table
pub const VFS_VERSION: i32 = 2;

/// Maximum path length handed to the engine
pub const MAX_PATHNAME: usize = 1024;

/// Sector size reported for every open file
pub const SECTOR_SIZE: u32 = 512;

/// Julian day number of 1970-01-01T00:00:00Z, in milliseconds
pub const UNIX_EPOCH_JULIAN_MS: i64 = 24405875 * 8640000;

/// Milliseconds per Julian day
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Message reported by the dynamic loading stubs
pub const DL_UNSUPPORTED_MESSAGE: &str = "Loadable extensions are not supported";

/// Absolute path prefixes recognized by the host: the two device roots and the plain separator
pub const ABSOLUTE_PREFIXES: [&str; 3] = ["fat:/", "sd:/", "/"];

/// Path separator on the host
pub const PATH_SEPARATOR: &str = "/";

// ============================================================================
// Flag sets
// ============================================================================

bitflags::bitflags! {
    /// Flags passed by the engine when it opens a file
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        const READONLY       = 0x0000_0001;
        const READWRITE      = 0x0000_0002;
        const CREATE         = 0x0000_0004;
        const DELETEONCLOSE  = 0x0000_0008;
        const EXCLUSIVE      = 0x0000_0010;
        const MAIN_DB        = 0x0000_0100;
        const TEMP_DB        = 0x0000_0200;
        const TRANSIENT_DB   = 0x0000_0400;
        const MAIN_JOURNAL   = 0x0000_0800;
        const TEMP_JOURNAL   = 0x0000_1000;
        const SUBJOURNAL     = 0x0000_2000;
        const SUPER_JOURNAL  = 0x0000_4000;
        const WAL            = 0x0008_0000;
    }
}

bitflags::bitflags! {
    /// Flags passed to sync
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SyncFlags: u32 {
        const NORMAL   = 0x0000_0002;
        const FULL     = 0x0000_0003;
        const DATAONLY = 0x0000_0010;
    }
}

bitflags::bitflags! {
    /// I/O capabilities a file may advertise to the engine
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DeviceCharacteristics: u32 {
        const ATOMIC                = 0x0000_0001;
        const ATOMIC512             = 0x0000_0002;
        const ATOMIC1K              = 0x0000_0004;
        const ATOMIC2K              = 0x0000_0008;
        const ATOMIC4K              = 0x0000_0010;
        const ATOMIC8K              = 0x0000_0020;
        const ATOMIC16K             = 0x0000_0040;
        const ATOMIC32K             = 0x0000_0080;
        const ATOMIC64K             = 0x0000_0100;
        const SAFE_APPEND           = 0x0000_0200;
        const SEQUENTIAL            = 0x0000_0400;
        const UNDELETABLE_WHEN_OPEN = 0x0000_0800;
        const POWERSAFE_OVERWRITE   = 0x0000_1000;
        const IMMUTABLE             = 0x0000_2000;
        const BATCH_ATOMIC          = 0x0000_4000;
    }
}

/// Access level requested by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Exists = 0,
    ReadWrite = 1,
    Read = 2,
}

/// File lock levels, in increasing order of exclusivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LockLevel {
    None = 0,
    Shared = 1,
    Reserved = 2,
    Pending = 3,
    Exclusive = 4,
}

// ============================================================================
// Helpers
// ============================================================================

/// Bounded, NUL-terminated write of `parts` into `out`.
///
/// Writes at most `out.len() - 1` bytes and always terminates the result, the same way
/// the engine's fixed-capacity formatter does. Returns the number of bytes written,
/// excluding the terminator. An empty buffer receives nothing.
pub fn write_c_str(out: &mut [u8], parts: &[&[u8]]) -> usize {
    let Some(limit) = out.len().checked_sub(1) else {
        return 0;
    };

    let mut written = 0;
    for part in parts {
        let n = part.len().min(limit - written);
        out[written..written + n].copy_from_slice(&part[..n]);
        written += n;
        if written == limit {
            break;
        }
    }
    out[written] = 0;
    written
}

/// Length of the NUL-terminated string held in `buf`
pub fn c_str_len(buf: &[u8]) -> usize {
    buf.iter().position(|&b| b == 0).unwrap_or(buf.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(IOERR_READ, 266);
        assert_eq!(IOERR_SHORT_READ, 522);
        assert_eq!(IOERR_WRITE, 778);
        assert_eq!(IOERR_FSYNC, 1034);
        assert_eq!(IOERR_FSTAT, 1802);
        assert_eq!(IOERR_CLOSE, 4106);
    }

    #[test]
    fn test_unix_epoch_offset() {
        // 2440587.5 days in milliseconds
        assert_eq!(UNIX_EPOCH_JULIAN_MS, 210_866_760_000_000);
    }

    #[test]
    fn test_write_c_str_truncates() {
        let mut buf = [0xFFu8; 6];
        let n = write_c_str(&mut buf, &[b"abc", b"defgh"]);
        assert_eq!(n, 5);
        assert_eq!(&buf, b"abcde\0");

        let mut buf = [0xFFu8; 8];
        let n = write_c_str(&mut buf, &[b"ab", b"c"]);
        assert_eq!(n, 3);
        assert_eq!(c_str_len(&buf), 3);
        assert_eq!(&buf[..4], b"abc\0");
    }

    #[test]
    fn test_write_c_str_degenerate_buffers() {
        let mut empty: [u8; 0] = [];
        assert_eq!(write_c_str(&mut empty, &[b"abc"]), 0);

        let mut one = [0xFFu8; 1];
        assert_eq!(write_c_str(&mut one, &[b"abc"]), 0);
        assert_eq!(one[0], 0);
    }

    #[test]
    fn test_flag_values() {
        assert_eq!(OpenFlags::READONLY.bits(), 1);
        assert_eq!(OpenFlags::CREATE.bits(), 4);
        assert_eq!(OpenFlags::WAL.bits(), 0x80000);
        assert!(DeviceCharacteristics::empty().is_empty());
        assert!(LockLevel::Exclusive > LockLevel::Shared);
    }
}
