//! Core types and shared functionality for absmeta.
//!
//! This crate provides:
//! - The metadata record and response model
//! - The [`Provider`] contract plus the aggregate and fallback providers
//! - An in-memory TTL cache and the caching [`MetadataService`]
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;

pub use cache::MemoryCache;
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use model::{BookMetadata, MetadataResponse};
pub use provider::{AllProvider, Provider, Registry, VoidProvider};
pub use service::MetadataService;
