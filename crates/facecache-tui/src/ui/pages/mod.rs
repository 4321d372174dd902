//! Page-specific content rendering.

pub mod person;
pub mod persons;
