//! HTTP middleware module.
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::create_cors_layer;
//!
//! let app = Router::new()
//!     .layer(create_cors_layer(origin));
//! ```

pub mod cors;

// Re-export commonly used functions
pub use cors::create_cors_layer;
