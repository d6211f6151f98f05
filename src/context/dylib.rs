//! Platform dynamic library backend (libloading).

use std::path::{Path, PathBuf};

use hotframe_guest::{
    HOTFRAME_ABI_VERSION, HOTFRAME_ENTRY_SYMBOL, HfBytes, HfGuestEntry, HfGuestModule, Visual,
};
use libloading::{Library, Symbol};

use super::{ContextError, GuestRoot, ModuleBackend, ModuleImage};

#[derive(Debug, Clone, Copy, Default)]
pub struct DylibBackend;

impl ModuleBackend for DylibBackend {
    type Image = DylibImage;

    fn open(&self, path: &Path) -> Result<DylibImage, ContextError> {
        // SAFETY: opening a library runs its initializers; the guest is trusted
        // to the extent the developer built it.
        let library = unsafe { Library::new(path) }.map_err(|e| ContextError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(DylibImage {
            path: path.to_path_buf(),
            library,
        })
    }
}

pub struct DylibImage {
    path: PathBuf,
    library: Library,
}

impl DylibImage {
    fn module(&self) -> Result<HfGuestModule, ContextError> {
        // SAFETY: symbol type matches the entry contract; null and version checked below.
        let entry: Symbol<HfGuestEntry> = unsafe {
            self.library
                .get(HOTFRAME_ENTRY_SYMBOL.as_bytes())
                .map_err(|_| ContextError::EntryMissing {
                    path: self.path.clone(),
                    symbol: HOTFRAME_ENTRY_SYMBOL,
                })?
        };

        // SAFETY: entry point takes no arguments and returns a static table.
        let module_ptr = unsafe { (entry)() };
        if module_ptr.is_null() {
            return Err(ContextError::NullEntry {
                path: self.path.clone(),
            });
        }
        // SAFETY: table is static in the guest and lives while the library is open.
        let module = unsafe { *module_ptr };
        if module.abi_version != HOTFRAME_ABI_VERSION {
            return Err(ContextError::AbiMismatch {
                path: self.path.clone(),
                guest: module.abi_version,
                host: HOTFRAME_ABI_VERSION,
            });
        }
        Ok(module)
    }
}

/// Copy a guest-owned buffer and hand it back to the guest allocator.
fn take_owned(module: &HfGuestModule, bytes: HfBytes) -> Vec<u8> {
    // SAFETY: owned buffers from the guest are valid until `free_bytes`.
    let copied = unsafe { bytes.to_vec() };
    if !bytes.ptr.is_null() {
        (module.free_bytes)(bytes);
    }
    copied
}

fn last_error(module: &HfGuestModule) -> String {
    String::from_utf8_lossy(&take_owned(module, (module.last_error)())).into_owned()
}

impl ModuleImage for DylibImage {
    fn path(&self) -> &Path {
        &self.path
    }

    fn instantiate_root(&self) -> Result<GuestRoot, ContextError> {
        let module = self.module()?;

        let root = (module.create_root)();
        if root.is_null() {
            let reason = last_error(&module);
            let reason = if reason.is_empty() {
                "constructor returned no root".to_string()
            } else {
                reason
            };
            return Err(ContextError::Constructor(reason));
        }

        // SAFETY: title is borrowed from the root, copied before destroy_root.
        let title = unsafe { (module.root_title)(root.cast_const()).to_string_lossy() };
        let detached = (module.detach_content)(root);
        let content_json = take_owned(&module, detached);

        let detach_error = if content_json.is_empty() {
            last_error(&module)
        } else {
            String::new()
        };

        // Content is already copied out; a panicking wrapper drop only loses the wrapper
        if !(module.destroy_root)(root) {
            crate::log!("host"; "guest root teardown failed: {}", last_error(&module));
        }

        if content_json.is_empty() {
            if !detach_error.is_empty() {
                return Err(ContextError::Content(detach_error));
            }
            return Ok(GuestRoot {
                title,
                content: Visual::Empty,
            });
        }

        let content: Visual = serde_json::from_slice(&content_json)
            .map_err(|e| ContextError::Content(e.to_string()))?;
        Ok(GuestRoot { title, content })
    }

    fn close(self) -> Result<(), ContextError> {
        let Self { path, library } = self;
        library
            .close()
            .map_err(|e| ContextError::Close {
                path,
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::install_demo;
    use crate::context::{ContextScope, Generation, IsolatedModuleContext};
    use crate::reload::ReloadError;
    use tempfile::TempDir;

    #[test]
    fn test_demo_guest_through_platform_loader() {
        let dir = TempDir::new().unwrap();
        let artifact = install_demo(dir.path());
        let scope = ContextScope::new(dir.path(), vec![]);
        let mut context = IsolatedModuleContext::new(Generation::new(1), scope, DylibBackend);

        let root = context.load(&artifact).unwrap().instantiate_root().unwrap();
        assert_eq!(root.title, "Demo");
        assert!(matches!(
            &root.content,
            Visual::Panel { title: Some(title), .. } if title == "hello"
        ));
        assert_eq!(root.content.node_count(), 7);

        let receipt = context.unload();
        assert_eq!(receipt.closed(), 1);
        assert!(receipt.is_clean());
    }

    #[test]
    fn test_demo_guest_instantiates_repeatedly() {
        let dir = TempDir::new().unwrap();
        let artifact = install_demo(dir.path());
        let image = DylibBackend.open(&artifact).unwrap();

        // Each root is independent; the title buffer is copied before teardown
        let first = image.instantiate_root().unwrap();
        let second = image.instantiate_root().unwrap();
        assert_eq!(first, second);
        image.close().unwrap();
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn test_library_without_entry_symbol() {
        let image = DylibBackend.open(Path::new("libc.so.6")).unwrap();
        let err = image.instantiate_root().unwrap_err();
        assert!(matches!(err, ContextError::EntryMissing { .. }));
        assert!(err.is_contract_unmet());
        image.close().unwrap();

        let err: ReloadError = err.into();
        assert!(matches!(err, ReloadError::RootTypeNotFound(ref m) if m.contains("hotframe_guest_entry")));
    }

    #[test]
    fn test_open_non_library_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("libfake.so");
        std::fs::write(&path, b"definitely not an object file").unwrap();

        let err = DylibBackend.open(&path).err().unwrap();
        assert!(matches!(err, ContextError::Open { .. }));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = DylibBackend.open(&dir.path().join("libnone.so")).err().unwrap();
        assert!(err.to_string().contains("libnone.so"));
    }
}
