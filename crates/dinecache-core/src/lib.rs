//! Client-side resolver and cache for the DineOnCampus menu API.
//!
//! Given a school slug and a dining location name, `MenuFetcher` discovers
//! the API's opaque school, location and period ids, fetches period menus,
//! and remembers the ids for the rest of the session.
//!
//! - `api`: the single HTTP GET boundary (`Fetch`) and endpoint URLs
//! - `resolver`: identifier memoization and menu fetching
//! - `models`: sites, locations, periods, categories, items
//! - `config`: API root, school and location selection

pub mod api;
pub mod config;
pub mod models;
pub mod resolver;

pub use api::{ApiError, Fetch, HttpFetcher};
pub use config::Config;
pub use models::{Category, Item, MenuResult, Nutrient, Period};
pub use resolver::{IdentifierResolver, MenuFetcher, ResolverState};
