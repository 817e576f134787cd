//! Cross-cutting utilities: atomic file writes and path expansion.

pub mod fs;
pub mod path;

pub use fs::{atomic_write, ensure_dir};
pub use path::{get_home_dir, resolve_path};
