pub mod apply;
pub mod dates;
pub mod parser;
pub mod state;

pub use apply::apply_filters;
pub use parser::{parse_filter, parse_query, split_query, validate_date_prefix};
pub use state::FilterState;
