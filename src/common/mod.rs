//! Shared filesystem utilities.

pub mod files;
pub mod retry;
pub mod temp;

pub use files::{append_file, create_dir_all, read_file_or_empty, write_file_with_dirs};
pub use retry::{retry_io, RetryPolicy};
pub use temp::{cleanup_work_dir, prepare_work_dir};
