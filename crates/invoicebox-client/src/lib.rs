//! Invoicebox Client SDK.
//!
//! This crate provides an authenticated JSON client for the Invoicebox API v3.
//! Requests carry the shop token as a bearer credential and every non-200
//! response is turned into a typed [`ApiError`].
//!
//! # Example
//!
//! ```no_run
//! use invoicebox_client::{AccessConfig, InvoiceboxApi};
//!
//! # async fn example() -> Result<(), invoicebox_client::ApiError> {
//! let mut api = InvoiceboxApi::new();
//! api.configure(AccessConfig::new("shop-id", "api-token"), true, true)?;
//!
//! let order = api
//!     .post("/v3/billing/api/order/order", &serde_json::json!({
//!         "description": "Order #42",
//!         "amount": 1500,
//!     }))
//!     .await?;
//!
//! println!("Created: {order}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod config;
mod error;

pub use client::InvoiceboxApi;
pub use config::{
    AccessConfig, ApiConfig, Environment, DEFAULT_USER_AGENT, PRODUCTION_URL, STAGING_URL,
};
pub use error::{check_status, extract_detail, ApiError};
