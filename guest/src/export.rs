//! Guest-side runtime behind [`export_guest!`](crate::export_guest).

use core::ffi::c_void;
use core::ptr;

use crate::abi::HfBytes;
use crate::guard::{guard_reported, guard_void, guard_with_default, set_last_error, take_last_error};
use crate::visual::Visual;

/// The guest's root object: a wrapper holding a title and the inner visual
/// content the host extracts.
pub trait GuestWindow: Sized + 'static {
    /// Construct the root. An `Err` is reported to the host as a
    /// constructor failure.
    fn new() -> Result<Self, String>;

    fn title(&self) -> &str;

    /// Move the inner content out of the wrapper. Called at most once per
    /// root; the wrapper is destroyed right after.
    fn take_content(&mut self) -> Option<Visual>;
}

/// Export `$window` as the guest root through the fixed entry symbol.
#[macro_export]
macro_rules! export_guest {
    ($window:ty) => {
        static __HOTFRAME_GUEST_MODULE: $crate::HfGuestModule = $crate::HfGuestModule {
            abi_version: $crate::HOTFRAME_ABI_VERSION,
            create_root: $crate::__rt::create_root::<$window>,
            root_title: $crate::__rt::root_title::<$window>,
            detach_content: $crate::__rt::detach_content::<$window>,
            destroy_root: $crate::__rt::destroy_root::<$window>,
            free_bytes: $crate::__rt::free_bytes,
            last_error: $crate::__rt::last_error,
        };

        #[unsafe(no_mangle)]
        pub extern "C" fn hotframe_guest_entry() -> *const $crate::HfGuestModule {
            &__HOTFRAME_GUEST_MODULE
        }
    };
}

pub extern "C" fn create_root<W: GuestWindow>() -> *mut c_void {
    guard_reported("create_root", ptr::null_mut(), || match W::new() {
        Ok(window) => Box::into_raw(Box::new(window)).cast::<c_void>(),
        Err(message) => {
            set_last_error(message);
            ptr::null_mut()
        }
    })
}

pub extern "C" fn root_title<W: GuestWindow>(root: *const c_void) -> HfBytes {
    if root.is_null() {
        return HfBytes::empty();
    }
    // SAFETY: non-null roots come from `create_root::<W>` and are alive until `destroy_root`.
    let window = unsafe { &*root.cast::<W>() };
    guard_with_default(HfBytes::empty(), || HfBytes::borrowed(window.title().as_bytes()))
}

pub extern "C" fn detach_content<W: GuestWindow>(root: *mut c_void) -> HfBytes {
    if root.is_null() {
        return HfBytes::empty();
    }
    // SAFETY: see `root_title`.
    let window = unsafe { &mut *root.cast::<W>() };
    guard_reported("detach_content", HfBytes::empty(), || {
        let Some(content) = window.take_content() else {
            return HfBytes::empty();
        };
        match serde_json::to_vec(&content) {
            Ok(json) => HfBytes::owned(json),
            Err(e) => {
                set_last_error(format!("content serialization failed: {e}"));
                HfBytes::empty()
            }
        }
    })
}

pub extern "C" fn destroy_root<W: GuestWindow>(root: *mut c_void) -> bool {
    if root.is_null() {
        return true;
    }
    guard_reported("destroy_root", false, || {
        // SAFETY: `root` was produced by `Box::into_raw` in `create_root::<W>`.
        drop(unsafe { Box::from_raw(root.cast::<W>()) });
        true
    })
}

pub extern "C" fn free_bytes(bytes: HfBytes) {
    if bytes.is_empty() {
        return;
    }
    guard_void(|| {
        // SAFETY: owned buffers are created by `HfBytes::owned` from a boxed slice.
        let slice = ptr::slice_from_raw_parts_mut(bytes.ptr.cast_mut(), bytes.len);
        drop(unsafe { Box::from_raw(slice) });
    });
}

pub extern "C" fn last_error() -> HfBytes {
    guard_with_default(HfBytes::empty(), || {
        take_last_error()
            .map(|message| HfBytes::owned(message.into_bytes()))
            .unwrap_or(HfBytes::empty())
    })
}
