//! # zenwatch-auth
//!
//! Session handling for the `ZenWatch` client.
//!
//! ## Features
//!
//! - **Access tokens**: bearer token model with expiry read from the JWT `exp` claim
//! - **Token store**: a cloneable, shared slot for the current token with session events
//! - **OAuth callbacks**: `state` generation, redirect parsing and CSRF verification
//!
//! ## Quick Start
//!
//! ```ignore
//! use zenwatch_auth::{AccessToken, OAuthFlow, OAuthProvider, TokenStore};
//!
//! let store = TokenStore::new();
//! store.set(AccessToken::bearer("eyJ..."));
//!
//! // Start an OAuth login and remember the flow until the redirect comes back
//! let flow = OAuthFlow::new(OAuthProvider::Github);
//! let url = flow.authorization_url(&api_base, "zenwatch://callback")?;
//!
//! // Later, with the URL the browser was redirected to
//! let params = flow.accept_callback(&redirect_url)?;
//! println!("code = {}", params.code);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod callback;
mod error;
pub mod store;
pub mod token;

pub use callback::{CallbackParams, OAuthFlow, OAuthProvider};
pub use error::{Error, Result};
pub use store::{SessionEvent, TokenStore};
pub use token::{AccessToken, TokenResponse};
