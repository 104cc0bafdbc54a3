//! Zone — a named cleaning region composed of one or more rectangles.

use std::fmt;

use serde::Serialize;

use crate::error::ValidationError;
use crate::geometry::Rectangle;

/// What a cleaning region represents on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Room,
    Door,
    Area,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Room => f.write_str("room"),
            Self::Door => f.write_str("door"),
            Self::Area => f.write_str("area"),
        }
    }
}

/// One rectangle of a zone together with how many passes the device makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CleaningRegion {
    pub rectangle: Rectangle,
    pub iterations: u8,
    pub kind: RegionKind,
}

impl CleaningRegion {
    /// A room cleaned `iterations` times.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroIterations`] when `iterations` is 0.
    pub fn room(rectangle: Rectangle, iterations: u8) -> Result<Self, ValidationError> {
        Self::with_iterations(rectangle, iterations, RegionKind::Room)
    }

    /// A free-form area cleaned `iterations` times.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroIterations`] when `iterations` is 0.
    pub fn area(rectangle: Rectangle, iterations: u8) -> Result<Self, ValidationError> {
        Self::with_iterations(rectangle, iterations, RegionKind::Area)
    }

    /// A door passage. Doors are always crossed exactly once.
    #[must_use]
    pub fn door(rectangle: Rectangle) -> Self {
        Self {
            rectangle,
            iterations: 1,
            kind: RegionKind::Door,
        }
    }

    fn with_iterations(
        rectangle: Rectangle,
        iterations: u8,
        kind: RegionKind,
    ) -> Result<Self, ValidationError> {
        if iterations == 0 {
            return Err(ValidationError::ZeroIterations);
        }
        Ok(Self {
            rectangle,
            iterations,
            kind,
        })
    }

    /// Device encoding: `[x1, y1, x2, y2, iterations]`.
    #[must_use]
    pub fn to_params(&self) -> [i32; 5] {
        let bl = self.rectangle.bottom_left();
        let tr = self.rectangle.top_right();
        [bl.x, bl.y, tr.x, tr.y, i32::from(self.iterations)]
    }
}

impl fmt::Display for CleaningRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {} x {}}}", self.kind, self.rectangle, self.iterations)
    }
}

/// A named cleaning target offered in the zone menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zone {
    name: String,
    regions: Vec<CleaningRegion>,
}

impl Zone {
    /// Create a zone from its display name and ordered regions.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when `name` is blank and
    /// [`ValidationError::EmptyZone`] when `regions` is empty.
    pub fn new(
        name: impl Into<String>,
        regions: Vec<CleaningRegion>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if regions.is_empty() {
            return Err(ValidationError::EmptyZone(name));
        }
        Ok(Self { name, regions })
    }

    /// Display name, exactly as configured.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn regions(&self) -> &[CleaningRegion] {
        &self.regions
    }
}
