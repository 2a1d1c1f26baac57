//! Markdown primitives: checkbox lines and `## ` sections.
//!
//! Deliberately narrow. Only single-level checkbox bullets and level-2
//! headers carry meaning; everything else in a file is opaque prose that
//! mutations must leave untouched.

pub mod sections;
pub mod task_line;

pub use sections::{end_of_file, find_insertion_point, find_sections, section_name, Section};
pub use task_line::{is_task_line, parse_line, replace_text, serialize_line, toggle_mark};
