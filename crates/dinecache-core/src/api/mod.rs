//! HTTP boundary for the DineOnCampus API.
//!
//! This module provides the `Fetch` trait and its reqwest implementation,
//! the endpoint URL builders, and the `ApiError` type every failure is
//! classified into before it reaches the resolver.

pub mod client;
pub mod error;

pub use client::{Endpoints, Fetch, HttpFetcher, DEFAULT_API_ROOT, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
