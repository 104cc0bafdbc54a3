//! Zone registry — the immutable set of zones offered for cleaning.
//!
//! Lookup is case-insensitive: configured names and user input are both
//! trimmed and upper-cased before comparison. Menus and replies always use
//! the configured display name.

use std::collections::HashMap;

use crate::error::ValidationError;
use crate::zone::{CleaningRegion, Zone};

/// Read-only mapping from zone name to its cleaning regions.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
    index: HashMap<String, usize>,
}

impl ZoneRegistry {
    /// Create a builder for constructing a [`ZoneRegistry`].
    #[must_use]
    pub fn builder() -> ZoneRegistryBuilder {
        ZoneRegistryBuilder::default()
    }

    /// Find a zone by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Zone> {
        self.index.get(&normalize(name)).map(|&i| &self.zones[i])
    }

    /// Regions of the named zone, in configured order.
    #[must_use]
    pub fn regions(&self, name: &str) -> Option<&[CleaningRegion]> {
        self.get(name).map(Zone::regions)
    }

    /// Display names in configured order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(Zone::name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Step-by-step builder for [`ZoneRegistry`].
#[derive(Debug, Default)]
pub struct ZoneRegistryBuilder {
    zones: Vec<Zone>,
}

impl ZoneRegistryBuilder {
    #[must_use]
    pub fn zone(mut self, zone: Zone) -> Self {
        self.zones.push(zone);
        self
    }

    /// Consume the builder and index the zones.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateZone`] when two zones share a
    /// name (case-insensitively).
    pub fn build(self) -> Result<ZoneRegistry, ValidationError> {
        let mut index = HashMap::with_capacity(self.zones.len());
        for (i, zone) in self.zones.iter().enumerate() {
            if index.insert(normalize(zone.name()), i).is_some() {
                return Err(ValidationError::DuplicateZone(zone.name().to_string()));
            }
        }
        Ok(ZoneRegistry {
            zones: self.zones,
            index,
        })
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}
