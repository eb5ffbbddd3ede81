//! Knowledge loading for the persona.
//!
//! The profile and summary are read once at startup and never change while
//! the process runs.

pub mod loader;

pub use loader::{extract_text, load_knowledge};
