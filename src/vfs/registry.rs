//! Process-wide VFS registry and the startup/shutdown entry points

use crate::types::OK;
use crate::vfs::fs::FeosVfs;
use crate::vfs::interface::Vfs;
use parking_lot::{Mutex, const_mutex};
use std::sync::Arc;
use tracing::debug;

/// Registered VFS implementations; the first entry is the default
static REGISTRY: Mutex<Vec<Arc<dyn Vfs>>> = const_mutex(Vec::new());

/// Register `vfs`, replacing any entry with the same name
///
/// A new entry goes to the front when `make_default` is set and to the back otherwise.
pub fn register(vfs: Arc<dyn Vfs>, make_default: bool) {
    let name = vfs.descriptor().name.clone();
    let mut registry = REGISTRY.lock();

    registry.retain(|existing| existing.descriptor().name != name);
    if make_default || registry.is_empty() {
        registry.insert(0, vfs);
    } else {
        registry.push(vfs);
    }

    debug!(name = %name, make_default, "vfs registered");
}

/// Remove the VFS registered under `name`, returning it if present
pub fn unregister(name: &str) -> Option<Arc<dyn Vfs>> {
    let mut registry = REGISTRY.lock();
    let index = registry
        .iter()
        .position(|vfs| vfs.descriptor().name == name)?;

    debug!(name, "vfs unregistered");
    Some(registry.remove(index))
}

/// Look up a VFS by name; `None` returns the default
pub fn find(name: Option<&str>) -> Option<Arc<dyn Vfs>> {
    let registry = REGISTRY.lock();
    match name {
        Some(name) => registry
            .iter()
            .find(|vfs| vfs.descriptor().name == name)
            .cloned(),
        None => registry.first().cloned(),
    }
}

/// Names of all registered VFS implementations, default first
pub fn registered_names() -> Vec<String> {
    REGISTRY
        .lock()
        .iter()
        .map(|vfs| vfs.descriptor().name.clone())
        .collect()
}

/// Startup entry point: register the FeOS adapter as the default VFS
pub fn os_init() -> i32 {
    register(Arc::new(FeosVfs::default()), true);
    OK
}

/// Shutdown entry point; the adapter holds nothing that needs releasing
pub fn os_end() -> i32 {
    OK
}
