//! # habitual-backend
//!
//! HTTP implementation of the habit service repository.

pub mod http;

pub use http::HttpBackend;
