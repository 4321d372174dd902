//! Utility functions for display formatting and presigned URL inspection.

pub mod format;
pub mod presign;

pub use format::{format_age_millis, truncate_string};
pub use presign::{is_presigned_url_expired, presigned_url_expiry};
