//! HTTP client for the inventory service.

mod client;

pub use client::{ApiClient, ApiError, RegistrationStatus};
