//! Data models for DineOnCampus entities.
//!
//! - `Site`, `Location`: identifier listings used by the resolver
//! - `Period`, `Category`, `Item`, `Nutrient`: menu contents
//! - `MenuResult`: what `MenuFetcher::get_menu` returns

pub mod menu;
pub mod site;

pub use menu::{Category, Item, Menu, MenuResponse, MenuResult, Nutrient, Period, PeriodMenu};
pub use site::{Location, LocationsResponse, Site, SitesResponse};
