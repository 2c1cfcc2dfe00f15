//! Output rendering for extraction results.

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::{section_header, to_text};
