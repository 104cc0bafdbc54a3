//! Planar geometry in device-native map units.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A point on the device map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate this point by `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CoordinateOverflow`] when either coordinate
    /// leaves the `i32` range.
    pub fn offset_by(self, offset: Point) -> Result<Self, ValidationError> {
        match (self.x.checked_add(offset.x), self.y.checked_add(offset.y)) {
            (Some(x), Some(y)) => Ok(Self::new(x, y)),
            _ => Err(ValidationError::CoordinateOverflow {
                point: self,
                offset,
            }),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle, always stored as (bottom-left, top-right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rectangle {
    bottom_left: Point,
    top_right: Point,
}

impl Rectangle {
    /// Build a rectangle from any two opposite corners.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DegenerateRectangle`] when both corners
    /// share an x or a y coordinate.
    pub fn new(first: Point, second: Point) -> Result<Self, ValidationError> {
        if first.x == second.x {
            return Err(ValidationError::DegenerateRectangle {
                axis: 'x',
                value: first.x,
            });
        }
        if first.y == second.y {
            return Err(ValidationError::DegenerateRectangle {
                axis: 'y',
                value: first.y,
            });
        }
        Ok(Self {
            bottom_left: Point::new(first.x.min(second.x), first.y.min(second.y)),
            top_right: Point::new(first.x.max(second.x), first.y.max(second.y)),
        })
    }

    #[must_use]
    pub fn bottom_left(&self) -> Point {
        self.bottom_left
    }

    #[must_use]
    pub fn top_right(&self) -> Point {
        self.top_right
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.bottom_left, self.top_right)
    }
}
