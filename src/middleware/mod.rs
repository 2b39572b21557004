//! HTTP-generic middleware, independent of the auth chain.

pub mod logging;

pub use logging::request_logging;
