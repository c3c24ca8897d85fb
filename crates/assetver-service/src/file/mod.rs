//! Pure helpers over a version's file list: filtering, paging, formatting.

pub mod filter;
pub mod format;
pub mod paginate;

pub use filter::filter_files;
pub use format::{format_date, format_file_size};
pub use paginate::paginate;
