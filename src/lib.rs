// Library API shared by the CLI and the WASM build
pub mod codec;
pub mod entry_list;
pub mod errors;
pub mod grid;
pub mod log;
pub mod packer;
pub mod placement;
pub mod puzzle;
pub mod session;

// Compile the wasm glue only when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;
