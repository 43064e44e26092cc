//! Utility functions and helpers.

pub mod object_id;
pub mod tags;
pub mod text;

pub use object_id::parse_object_id;
pub use tags::normalize_tags;
pub use text::not_blank;
