pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::resolve_page_size;
pub use paths::{format_path_with_tilde, validate_file_size};
