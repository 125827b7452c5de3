//! Client code for absmeta.
//!
//! This crate provides the HTTP fetch pipeline, HTML extraction helpers and
//! the concrete metadata providers that sit behind the core `Provider` trait.

pub mod dlsite;
pub mod extract;
pub mod fetch;

pub use dlsite::{DLSITE_PROVIDER_ID, DlsiteProvider, RjCode, Work};
pub use fetch::{FetchClient, FetchConfig, FetchResponse};
