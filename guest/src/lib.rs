//! Guest-side contract for hotframe.
//!
//! A guest is a `cdylib` that exports one well-known entry symbol. The host
//! never looks anything up by type name; it resolves
//! [`HOTFRAME_ENTRY_SYMBOL`], checks [`HOTFRAME_ABI_VERSION`] and drives the
//! returned [`HfGuestModule`] table.
//!
//! ```text
//! host                          guest (cdylib)
//! ----                          --------------
//! dlopen(snapshot) ───────────▶ hotframe_guest_entry() -> &HfGuestModule
//! create_root()    ───────────▶ Box<W: GuestWindow>
//! root_title()     ◀─────────── borrowed UTF-8 (copied by host)
//! detach_content() ◀─────────── owned JSON buffer (Visual tree)
//! free_bytes()     ───────────▶ buffer released
//! destroy_root()   ───────────▶ wrapper dropped
//! ```
//!
//! Every exported shim catches guest panics, so a misbehaving guest shows
//! up as an error in the host instead of aborting it.
//!
//! Only serialized data crosses the boundary, so nothing the host keeps
//! points into guest memory once the library is closed.
//!
//! # Writing a guest
//!
//! ```ignore
//! use hotframe_guest::{GuestWindow, Visual, export_guest};
//!
//! struct MainWindow { content: Option<Visual> }
//!
//! impl GuestWindow for MainWindow {
//!     fn new() -> Result<Self, String> {
//!         Ok(Self { content: Some(Visual::text("hello")) })
//!     }
//!     fn title(&self) -> &str { "Demo" }
//!     fn take_content(&mut self) -> Option<Visual> { self.content.take() }
//! }
//!
//! export_guest!(MainWindow);
//! ```

mod abi;
mod export;
mod guard;
mod visual;

pub use abi::{HOTFRAME_ABI_VERSION, HOTFRAME_ENTRY_SYMBOL, HfBytes, HfGuestEntry, HfGuestModule};
pub use export::GuestWindow;
pub use visual::Visual;

#[doc(hidden)]
pub mod __rt {
    pub use crate::export::{
        create_root, destroy_root, detach_content, free_bytes, last_error, root_title,
    };
}
