use std::ops::Range;

use crate::error::{GraphError, Result};

/// Dense location identifier: ids are assigned sequentially from 0 at load time.
pub type LocationId = usize;

/// Immutable attributes of a named place.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub region: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// A validated `(name, region, longitude, latitude)` tuple handed over by an
/// ingestion collaborator. Ids are assigned by the store, not the record.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub name: String,
    pub region: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl LocationRecord {
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        longitude: f64,
        latitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            longitude,
            latitude,
        }
    }

    /// Build a record from a `"Name, Region"` label.
    ///
    /// A bare name with no `", "` separator uses a copy of the name as its region.
    pub fn from_label(label: &str, longitude: f64, latitude: f64) -> Self {
        match label.split_once(", ") {
            Some((name, region)) => Self::new(name, region, longitude, latitude),
            None => Self::new(label, label, longitude, latitude),
        }
    }
}

/// Lookup table for all loaded locations, indexed by `LocationId`.
///
/// Loading is additive: each call appends with fresh sequential ids until
/// `reset()` empties the store.
#[derive(Debug, Default)]
pub struct LocationStore {
    locations: Vec<Location>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records, returning the range of ids assigned to them.
    ///
    /// The batch is validated up front: if any coordinate is not finite,
    /// nothing is appended.
    pub fn load<I>(&mut self, records: I) -> Result<Range<LocationId>>
    where
        I: IntoIterator<Item = LocationRecord>,
    {
        let records: Vec<LocationRecord> = records.into_iter().collect();
        if let Some(bad) = records
            .iter()
            .find(|r| !r.longitude.is_finite() || !r.latitude.is_finite())
        {
            return Err(GraphError::InvalidArgument(format!(
                "malformed coordinates for '{}': ({}, {})",
                bad.name, bad.longitude, bad.latitude
            )));
        }

        let first = self.locations.len();
        self.locations.reserve(records.len());
        for (offset, record) in records.into_iter().enumerate() {
            self.locations.push(Location {
                id: first + offset,
                name: record.name,
                region: record.region,
                longitude: record.longitude,
                latitude: record.latitude,
            });
        }

        log::info!(
            "loaded {} locations (ids {}..{})",
            self.locations.len() - first,
            first,
            self.locations.len()
        );
        Ok(first..self.locations.len())
    }

    pub fn get(&self, id: LocationId) -> Result<&Location> {
        self.locations.get(id).ok_or(GraphError::NotFound {
            id,
            count: self.locations.len(),
        })
    }

    pub fn count(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn reset(&mut self) {
        self.locations.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// All locations, indexable by id.
    pub fn as_slice(&self) -> &[Location] {
        &self.locations
    }

    /// All locations whose region matches, ignoring case, in id order.
    pub fn search_region(&self, region: &str) -> Vec<&Location> {
        let needle = region.to_lowercase();
        self.locations
            .iter()
            .filter(|l| l.region.to_lowercase() == needle)
            .collect()
    }

    /// First location whose name matches, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&Location> {
        let needle = name.to_lowercase();
        self.locations
            .iter()
            .find(|l| l.name.to_lowercase() == needle)
    }
}
