use core::ffi::c_void;

/// ABI version shared by host and guest. Bumped on any layout change.
pub const HOTFRAME_ABI_VERSION: u32 = 2;

/// The single symbol a guest library must export.
pub const HOTFRAME_ENTRY_SYMBOL: &str = "hotframe_guest_entry";

/// Signature of [`HOTFRAME_ENTRY_SYMBOL`].
pub type HfGuestEntry = unsafe extern "C" fn() -> *const HfGuestModule;

/// UTF-8 bytes crossing the boundary. Not NUL-terminated.
///
/// Buffers returned by `detach_content` and `last_error` are guest-owned and
/// must be released through `free_bytes`. Buffers returned by `root_title`
/// are borrowed from the root and only valid until `destroy_root`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HfBytes {
    pub ptr: *const u8,
    pub len: usize,
}

impl HfBytes {
    pub const fn empty() -> Self {
        Self {
            ptr: core::ptr::null(),
            len: 0,
        }
    }

    /// View into bytes owned by someone else.
    pub fn borrowed(bytes: &[u8]) -> Self {
        Self {
            ptr: bytes.as_ptr(),
            len: bytes.len(),
        }
    }

    /// Hand ownership of `bytes` across the boundary.
    pub fn owned(bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            return Self::empty();
        }
        let boxed = bytes.into_boxed_slice();
        let len = boxed.len();
        let ptr = Box::into_raw(boxed).cast::<u8>().cast_const();
        Self { ptr, len }
    }

    pub fn is_empty(&self) -> bool {
        self.ptr.is_null() || self.len == 0
    }

    /// Copy the bytes out.
    ///
    /// # Safety
    /// `ptr` must be null or valid for reads of `len` bytes.
    pub unsafe fn to_vec(self) -> Vec<u8> {
        if self.is_empty() {
            return Vec::new();
        }
        unsafe { core::slice::from_raw_parts(self.ptr, self.len) }.to_vec()
    }

    /// Copy the bytes out as a string, replacing invalid UTF-8.
    ///
    /// # Safety
    /// Same contract as [`HfBytes::to_vec`].
    pub unsafe fn to_string_lossy(self) -> String {
        let bytes = unsafe { self.to_vec() };
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

// Immutable byte view; lifetime validity is the caller's responsibility.
unsafe impl Send for HfBytes {}
unsafe impl Sync for HfBytes {}

/// Function table returned by the guest entry point.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct HfGuestModule {
    pub abi_version: u32,
    /// Construct the root wrapper. Null means the constructor failed;
    /// the reason is available from `last_error`.
    pub create_root: extern "C" fn() -> *mut c_void,
    pub root_title: extern "C" fn(root: *const c_void) -> HfBytes,
    /// Move the inner visual tree out of the wrapper as JSON.
    pub detach_content: extern "C" fn(root: *mut c_void) -> HfBytes,
    /// Drop the wrapper. `false` means its drop panicked; the reason is
    /// available from `last_error`.
    pub destroy_root: extern "C" fn(root: *mut c_void) -> bool,
    pub free_bytes: extern "C" fn(bytes: HfBytes),
    pub last_error: extern "C" fn() -> HfBytes,
}
