//! Per-side values with named fields.

use std::fmt;

/// One value for each side of a rectangular domain.
///
/// Field names replace the `[south, east, north, west]` index convention.
///
/// # Example
///
/// ```
/// use overland_rs::mesh::NodeStatus;
/// use overland_rs::types::SideBoundaries;
///
/// // Outlet on the east edge, everything else sealed.
/// let sides = SideBoundaries::new(
///     NodeStatus::Closed,     // south
///     NodeStatus::FixedValue, // east
///     NodeStatus::Closed,     // north
///     NodeStatus::Closed,     // west
/// );
///
/// assert_eq!(sides.east, NodeStatus::FixedValue);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideBoundaries<T> {
    /// South side (row 0)
    pub south: T,
    /// East side (last column)
    pub east: T,
    /// North side (last row)
    pub north: T,
    /// West side (column 0)
    pub west: T,
}

impl<T> SideBoundaries<T> {
    /// Create from explicit values, counterclockwise from the south side.
    pub fn new(south: T, east: T, north: T, west: T) -> Self {
        Self {
            south,
            east,
            north,
            west,
        }
    }

    /// Same value on every side.
    pub fn uniform(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            south: value.clone(),
            east: value.clone(),
            north: value.clone(),
            west: value,
        }
    }

    /// Replace the value on the south side.
    pub fn with_south(mut self, value: T) -> Self {
        self.south = value;
        self
    }

    /// Replace the value on the east side.
    pub fn with_east(mut self, value: T) -> Self {
        self.east = value;
        self
    }

    /// Replace the value on the north side.
    pub fn with_north(mut self, value: T) -> Self {
        self.north = value;
        self
    }

    /// Replace the value on the west side.
    pub fn with_west(mut self, value: T) -> Self {
        self.west = value;
        self
    }
}

impl<T: fmt::Display> fmt::Display for SideBoundaries<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S:{} E:{} N:{} W:{}",
            self.south, self.east, self.north, self.west
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_then_override() {
        let sides = SideBoundaries::uniform('c').with_east('o');
        assert_eq!(sides.south, 'c');
        assert_eq!(sides.east, 'o');
        assert_eq!(sides.north, 'c');
        assert_eq!(sides.west, 'c');
    }

    #[test]
    fn test_display() {
        let sides = SideBoundaries::new(1, 2, 3, 4);
        assert_eq!(sides.to_string(), "S:1 E:2 N:3 W:4");
    }
}
