//! # zenwatch-api
//!
//! Async client for the `ZenWatch` backend HTTP API.
//!
//! The backend owns all data: scraped articles and videos, user state,
//! comments, personalization keywords and scraping jobs. This crate only
//! consumes its JSON contract.
//!
//! ## Features
//!
//! - **Configuration**: base URL and timeout from the environment or a builder
//! - **Bearer auth**: the current token from a shared [`TokenStore`] on every request
//! - **Refresh on 401**: exactly one cookie-credentialed refresh and retry per request;
//!   a failed refresh expires the session
//! - **Typed endpoints**: one `impl ApiClient` block per endpoint group
//!
//! ## Example
//!
//! ```ignore
//! use zenwatch_api::{ApiClient, ClientConfig, types::ArticleFilters};
//!
//! let client = ApiClient::new(ClientConfig::from_env()?)?;
//! client.login(&LoginRequest::new("me@example.com", "hunter22")).await?;
//!
//! let page = client.list_articles(&ArticleFilters::default()).await?;
//! for article in &page.items {
//!     println!("{:>5.1}  {}", article.score, article.title);
//! }
//! ```
//!
//! [`TokenStore`]: zenwatch_auth::TokenStore

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod endpoints;
mod error;
pub mod types;

pub use client::ApiClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use endpoints::scraping::TaskStatusSource;
pub use error::{Error, Result};
pub use zenwatch_auth::{AccessToken, SessionEvent, TokenStore};
