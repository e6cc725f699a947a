//! Endpoint groups, one `impl ApiClient` block each.

mod admin;
mod articles;
mod auth;
mod comments;
mod engagement;
mod keywords;
mod library;
pub mod scraping;
mod triage;
mod videos;
