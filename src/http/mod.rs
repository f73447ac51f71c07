//! Adapter between the HTTP transport and [`crate::ApiError`].

mod response;

pub use response::error_for_status;
