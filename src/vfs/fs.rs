//! Filesystem adapter: path-level operations and environment stubs

use crate::types::{
    ABSOLUTE_PREFIXES, AccessMode, DL_UNSUPPORTED_MESSAGE, MAX_PATHNAME, OpenFlags,
    PATH_SEPARATOR, UNIX_EPOCH_JULIAN_MS, VFS_VERSION, write_c_str,
};
use crate::vfs::config::{EntropySource, VfsConfig};
use crate::vfs::error::{VfsError, VfsResult};
use crate::vfs::file::FeosFile;
use crate::vfs::host::{self, HostStream, StreamMode};
use crate::vfs::interface::{DlHandle, DlSymbol, Vfs, VfsDescriptor, VfsFile};
use rand::RngCore;
use tracing::{debug, trace};

/// Filesystem adapter for the FeOS host
///
/// Stateless between calls; the only state lives in the files it opens.
#[derive(Debug)]
pub struct FeosVfs {
    config: VfsConfig,
    descriptor: VfsDescriptor,
}

impl FeosVfs {
    /// Create an adapter from a validated configuration
    pub fn new(config: VfsConfig) -> VfsResult<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: VfsConfig) -> Self {
        let descriptor = VfsDescriptor {
            version: VFS_VERSION,
            name: config.name.clone(),
            max_pathname: MAX_PATHNAME,
            file_state_size: std::mem::size_of::<FeosFile>(),
        };
        FeosVfs { config, descriptor }
    }

    pub fn config(&self) -> &VfsConfig {
        &self.config
    }

}

/// Whether `name` starts with one of the recognized absolute prefixes
fn is_absolute(name: &str) -> bool {
    ABSOLUTE_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

impl Default for FeosVfs {
    fn default() -> Self {
        Self::with_config(VfsConfig::default())
    }
}

impl Vfs for FeosVfs {
    fn descriptor(&self) -> &VfsDescriptor {
        &self.descriptor
    }

    fn open(&self, path: Option<&str>, flags: OpenFlags) -> VfsResult<Box<dyn VfsFile>> {
        trace!(?path, ?flags, "open");

        let Some(path) = path else {
            return Err(VfsError::Io(
                "anonymous temporary files are not supported".to_string(),
            ));
        };

        let mode = if flags.contains(OpenFlags::READONLY) {
            StreamMode::Read
        } else {
            StreamMode::ReadWrite
        };

        let stream = match HostStream::open(path, mode) {
            Ok(stream) => stream,
            Err(err)
                if err.raw_os_error() == Some(libc::ENOENT)
                    && flags.contains(OpenFlags::CREATE) =>
            {
                HostStream::open(path, StreamMode::Create)
                    .map_err(|err| VfsError::CantOpen(path.to_string(), Some(err)))?
            }
            Err(err) => return Err(VfsError::CantOpen(path.to_string(), Some(err))),
        };

        debug!(path, ?mode, "opened");
        Ok(Box::new(FeosFile::new(stream, path)))
    }

    fn delete(&self, path: &str, sync_dir: bool) -> VfsResult<()> {
        // Removal errors are not reported and there is no directory sync on the host
        if let Err(err) = host::remove(path) {
            trace!(path, sync_dir, %err, "delete ignored error");
        } else {
            debug!(path, "deleted");
        }
        Ok(())
    }

    fn access(&self, path: &str, mode: AccessMode) -> VfsResult<bool> {
        let exists = host::exists(path);
        trace!(path, ?mode, exists, "access");
        Ok(exists)
    }

    fn full_pathname(&self, name: &str, out: &mut [u8]) -> VfsResult<usize> {
        let Some(terminator) = out.len().checked_sub(1) else {
            return Err(VfsError::InvalidArgument(
                "empty path buffer".to_string(),
            ));
        };
        out[terminator] = 0;

        let capacity = out.len().min(MAX_PATHNAME + 1);
        let out = &mut out[..capacity];
        let last = capacity - 1;
        out[last] = 0;

        if is_absolute(name) {
            let len = write_c_str(out, &[name.as_bytes()]);
            trace!(name, len, "full_pathname absolute");
            return Ok(len);
        }

        let cwd_len = host::getcwd(&mut out[..last])
            .map_err(|err| VfsError::Io(format!("cannot get working directory: {}", err)))?;
        let tail = write_c_str(
            &mut out[cwd_len..],
            &[PATH_SEPARATOR.as_bytes(), name.as_bytes()],
        );

        trace!(name, len = cwd_len + tail, "full_pathname relative");
        Ok(cwd_len + tail)
    }

    fn randomness(&self, out: &mut [u8]) -> usize {
        match self.config.entropy {
            // No entropy on the host: the buffer is returned as the caller provided it
            EntropySource::None => 0,
            EntropySource::ThreadRng => {
                rand::thread_rng().fill_bytes(out);
                out.len()
            }
        }
    }

    fn sleep(&self, micros: u32) -> u32 {
        trace!(micros, "sleep ignored");
        0
    }

    fn current_time_i64(&self) -> VfsResult<i64> {
        Ok(host::time() * 1000 + UNIX_EPOCH_JULIAN_MS)
    }

    fn dl_open(&self, path: &str) -> Option<DlHandle> {
        trace!(path, "dl_open unsupported");
        None
    }

    fn dl_error(&self, out: &mut [u8]) {
        write_c_str(out, &[DL_UNSUPPORTED_MESSAGE.as_bytes()]);
    }

    fn dl_sym(&self, _handle: &DlHandle, _symbol: &str) -> Option<DlSymbol> {
        None
    }

    fn dl_close(&self, _handle: DlHandle) {}
}
