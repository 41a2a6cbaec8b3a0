use thiserror::Error;

use crate::{constants::MAP_HALF_SIZE, MapId};

/// Errors produced when a coordinate falls outside the legal map space
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PositionError {
    /// One of the components is NaN or infinite
    #[error("Coordinate {axis} is not finite")]
    NotFinite { axis: &'static str },

    /// The component lies outside the map bounds
    #[error("Coordinate {axis} = {value} is outside the map bounds (+/-{limit})")]
    OutOfBounds {
        axis: &'static str,
        value: f32,
        limit: f32,
    },
}

/// A point in a map plus a facing angle (radians)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub o: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32, o: f32) -> Self {
        Self { x, y, z, o }
    }

    /// Checks that every component is finite and that x, y and z lie inside
    /// the map bounds.
    pub fn validate(&self) -> Result<(), PositionError> {
        check_coord("x", self.x)?;
        check_coord("y", self.y)?;
        check_coord("z", self.z)?;
        if !self.o.is_finite() {
            return Err(PositionError::NotFinite { axis: "o" });
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn relocate(&mut self, other: &Position) {
        *self = *other;
    }

    /// Component-wise sum, used to turn a transport-relative offset into an
    /// absolute position
    pub fn offset_by(&self, offset: &Position) -> Position {
        Position::new(
            self.x + offset.x,
            self.y + offset.y,
            self.z + offset.z,
            self.o + offset.o,
        )
    }

    pub fn distance_2d(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance_3d(&self, other: &Position) -> f32 {
        let dz = self.z - other.z;
        let d2 = self.distance_2d(other);
        (d2 * d2 + dz * dz).sqrt()
    }
}

fn check_coord(axis: &'static str, value: f32) -> Result<(), PositionError> {
    if !value.is_finite() {
        return Err(PositionError::NotFinite { axis });
    }
    let limit = MAP_HALF_SIZE - 0.5;
    if value.abs() > limit {
        return Err(PositionError::OutOfBounds { axis, value, limit });
    }
    Ok(())
}

/// A position together with the map it belongs to
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldLocation {
    pub map: MapId,
    pub position: Position,
}

impl WorldLocation {
    pub const fn new(map: MapId, position: Position) -> Self {
        Self { map, position }
    }
}
