mod reducer;

pub use reducer::{reduce_html, truncate_chars, MAX_TEXT_LENGTH};
