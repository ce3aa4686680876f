pub mod json;
pub mod text;

pub use json::{JsonConfig, convert_to_json, extracted_to_json};
pub use text::{TextConfig, TextFormatter, convert_to_text};
