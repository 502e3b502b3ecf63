//! Named scalar fields at nodes and links.
//!
//! Each [`FieldGroup`] holds `f64` arrays of one fixed length (the node or
//! link count), addressed by name. Indexing is aligned with the mesh's node
//! and link indices.

use std::fmt;

use thiserror::Error;

/// Ground surface elevation (m), at nodes.
pub const TOPOGRAPHIC_ELEVATION: &str = "topographic__elevation";

/// Surface water depth (m), at nodes.
pub const SURFACE_WATER_DEPTH: &str = "surface_water__depth";

/// Signed specific discharge (m²/s), at links. Positive means tail to head.
pub const WATER_SPECIFIC_DISCHARGE: &str = "water__specific_discharge";

/// Signed depth-averaged velocity (m/s), at links.
pub const WATER_VELOCITY: &str = "water__velocity";

/// Mesh element a field is defined on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldLocation {
    /// One value per node
    Node,
    /// One value per link
    Link,
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldLocation::Node => f.write_str("node"),
            FieldLocation::Link => f.write_str("link"),
        }
    }
}

/// Error type for field access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// No field with this name.
    #[error("no field '{name}' at {location}")]
    Missing {
        name: String,
        location: FieldLocation,
    },

    /// A field with this name already exists.
    #[error("field '{name}' already exists at {location}")]
    Duplicate {
        name: String,
        location: FieldLocation,
    },

    /// Values do not match the number of nodes/links.
    #[error("field '{name}' at {location} needs {expected} values, got {actual}")]
    LengthMismatch {
        name: String,
        location: FieldLocation,
        expected: usize,
        actual: usize,
    },

    /// The same field was requested twice for disjoint mutable access.
    #[error("field '{name}' at {location} requested twice")]
    Aliased {
        name: String,
        location: FieldLocation,
    },
}

/// Named arrays of equal length at one [`FieldLocation`].
#[derive(Clone, Debug)]
pub struct FieldGroup {
    location: FieldLocation,
    len: usize,
    names: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl FieldGroup {
    /// Create an empty group whose fields hold `len` values.
    pub fn new(location: FieldLocation, len: usize) -> Self {
        Self {
            location,
            len,
            names: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Location of this group's fields.
    pub fn location(&self) -> FieldLocation {
        self.location
    }

    /// Number of values in every field.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if fields in this group hold no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Check if a field exists.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn index_of(&self, name: &str) -> Result<usize, FieldError> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| FieldError::Missing {
                name: name.to_string(),
                location: self.location,
            })
    }

    /// Add a field from existing values.
    pub fn add_field(&mut self, name: &str, values: Vec<f64>) -> Result<&mut [f64], FieldError> {
        if self.contains(name) {
            return Err(FieldError::Duplicate {
                name: name.to_string(),
                location: self.location,
            });
        }
        if values.len() != self.len {
            return Err(FieldError::LengthMismatch {
                name: name.to_string(),
                location: self.location,
                expected: self.len,
                actual: values.len(),
            });
        }
        self.names.push(name.to_string());
        self.values.push(values);
        let last = self.values.len() - 1;
        Ok(self.values[last].as_mut_slice())
    }

    /// Add a zero-filled field.
    pub fn add_zeros(&mut self, name: &str) -> Result<&mut [f64], FieldError> {
        self.add_field(name, vec![0.0; self.len])
    }

    /// Add a zero-filled field unless one with this name already exists.
    ///
    /// Returns `true` if the field was created.
    pub fn ensure_zeros(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        self.values.push(vec![0.0; self.len]);
        true
    }

    /// Remove a field and return its values.
    pub fn remove(&mut self, name: &str) -> Result<Vec<f64>, FieldError> {
        let index = self.index_of(name)?;
        self.names.remove(index);
        Ok(self.values.remove(index))
    }

    /// Read a field.
    pub fn get(&self, name: &str) -> Result<&[f64], FieldError> {
        let index = self.index_of(name)?;
        Ok(self.values[index].as_slice())
    }

    /// Mutate a field.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut [f64], FieldError> {
        let index = self.index_of(name)?;
        Ok(self.values[index].as_mut_slice())
    }

    /// Borrow two distinct fields mutably at once.
    pub fn get_pair_mut(
        &mut self,
        first: &str,
        second: &str,
    ) -> Result<(&mut [f64], &mut [f64]), FieldError> {
        let i = self.index_of(first)?;
        let j = self.index_of(second)?;
        if i == j {
            return Err(FieldError::Aliased {
                name: first.to_string(),
                location: self.location,
            });
        }

        if i < j {
            let (lo, hi) = self.values.split_at_mut(j);
            Ok((lo[i].as_mut_slice(), hi[0].as_mut_slice()))
        } else {
            let (lo, hi) = self.values.split_at_mut(i);
            Ok((hi[0].as_mut_slice(), lo[j].as_mut_slice()))
        }
    }
}

/// Node and link field groups for one mesh.
#[derive(Clone, Debug)]
pub struct FieldStore {
    /// Fields with one value per node
    pub at_node: FieldGroup,
    /// Fields with one value per link
    pub at_link: FieldGroup,
}

impl FieldStore {
    /// Create an empty store sized for a mesh.
    pub fn new(n_nodes: usize, n_links: usize) -> Self {
        Self {
            at_node: FieldGroup::new(FieldLocation::Node, n_nodes),
            at_link: FieldGroup::new(FieldLocation::Link, n_links),
        }
    }

    /// Group for a location.
    pub fn group(&self, location: FieldLocation) -> &FieldGroup {
        match location {
            FieldLocation::Node => &self.at_node,
            FieldLocation::Link => &self.at_link,
        }
    }

    /// Mutable group for a location.
    pub fn group_mut(&mut self, location: FieldLocation) -> &mut FieldGroup {
        match location {
            FieldLocation::Node => &mut self.at_node,
            FieldLocation::Link => &mut self.at_link,
        }
    }
}
