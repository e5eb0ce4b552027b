//! RTC Token Service Library
//!
//! A small stateless HTTP service that issues short-lived RTC access
//! tokens. A client posts `{channelName, uid}` and receives a signed
//! publisher token valid for one hour.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/token_issuer.rs -> services/token_signer.rs
//! ```
//!
//! The signer is the only component that sees the app certificate. It is
//! held behind the `TokenSigner` trait so handlers can be tested against
//! `MockTokenSigner`.
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Request, response and grant types
//! - `observability` - Metrics and log correlation helpers
//! - `routes` - Axum router setup
//! - `services` - Request validation and token signing

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
