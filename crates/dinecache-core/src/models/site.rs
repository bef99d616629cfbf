//! Site and location listings used to resolve opaque identifiers.

use serde::{Deserialize, Serialize};

/// A school (campus) as listed by the public sites endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub slug: String,
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SitesResponse {
    pub sites: Vec<Site>,
}

impl SitesResponse {
    pub fn find_by_slug(&self, slug: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.slug == slug)
    }
}

/// A dining location within a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub id: String,
}

// Buildings are also returned but only standalone locations carry menus
#[derive(Debug, Clone, Deserialize)]
pub struct LocationsResponse {
    pub standalone_locations: Vec<Location>,
}

impl LocationsResponse {
    pub fn find_by_name(&self, name: &str) -> Option<&Location> {
        self.standalone_locations.iter().find(|l| l.name == name)
    }
}
