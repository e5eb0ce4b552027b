//! # Token Service Test Utilities
//!
//! Shared test utilities for the RTC token service.
//!
//! This crate provides:
//! - Server test harness (`TestTokenServer` for E2E tests)
//! - Fixed test credentials (`TEST_APP_ID`, `TEST_APP_CERTIFICATE`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use token_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestTokenServer::spawn().await?;
//!     let client = reqwest::Client::new();
//!
//!     let response = client
//!         .post(format!("{}/api/v1/rtc/token", server.url()))
//!         .json(&serde_json::json!({"channelName": "room42", "uid": 7}))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

// Re-export commonly used items
pub use server_harness::*;
