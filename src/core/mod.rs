//! Shared plumbing for the data-source adapter.
//!
//! This module contains the foundational pieces the Yahoo adapter builds on:
//! - The HTTP client ([`QuoteClient`]) and its builder.
//! - The primary error type ([`Error`]).
//! - Internal response handling.

/// The HTTP client (`QuoteClient`), builder, and endpoint configuration.
pub mod client;
/// The primary error type (`Error`) for the crate.
pub mod error;
pub(crate) mod net;

pub use client::{QuoteClient, QuoteClientBuilder};
pub use error::Error;
