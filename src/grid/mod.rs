//! Model grid: a mesh plus the named fields defined on it.
//!
//! # Example
//!
//! ```
//! use overland_rs::grid::{ModelGrid, TOPOGRAPHIC_ELEVATION};
//! use overland_rs::mesh::RasterMeshBuilder;
//!
//! let mesh = RasterMeshBuilder::new(3, 4).build().unwrap();
//! let mut grid = ModelGrid::new(mesh);
//!
//! let z = grid.add_zeros_at_node(TOPOGRAPHIC_ELEVATION).unwrap();
//! z[5] = 1.5;
//!
//! assert_eq!(grid.at_node(TOPOGRAPHIC_ELEVATION).unwrap()[5], 1.5);
//! ```

mod fields;

pub use fields::{
    FieldError, FieldGroup, FieldLocation, FieldStore, SURFACE_WATER_DEPTH,
    TOPOGRAPHIC_ELEVATION, WATER_SPECIFIC_DISCHARGE, WATER_VELOCITY,
};

use crate::mesh::Mesh;

/// A mesh and its node/link fields.
#[derive(Clone, Debug)]
pub struct ModelGrid {
    mesh: Mesh,
    fields: FieldStore,
}

impl ModelGrid {
    /// Wrap a mesh with an empty field store.
    pub fn new(mesh: Mesh) -> Self {
        let fields = FieldStore::new(mesh.n_nodes(), mesh.n_links());
        Self { mesh, fields }
    }

    /// The mesh.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Mutable mesh, for changing node status.
    ///
    /// Node and link counts cannot change, so fields stay aligned.
    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    /// The field store.
    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    /// Mutable field store.
    pub fn fields_mut(&mut self) -> &mut FieldStore {
        &mut self.fields
    }

    /// Borrow the mesh and the fields separately.
    pub fn split_mut(&mut self) -> (&Mesh, &mut FieldStore) {
        (&self.mesh, &mut self.fields)
    }

    /// Read a node field.
    pub fn at_node(&self, name: &str) -> Result<&[f64], FieldError> {
        self.fields.at_node.get(name)
    }

    /// Mutate a node field.
    pub fn at_node_mut(&mut self, name: &str) -> Result<&mut [f64], FieldError> {
        self.fields.at_node.get_mut(name)
    }

    /// Read a link field.
    pub fn at_link(&self, name: &str) -> Result<&[f64], FieldError> {
        self.fields.at_link.get(name)
    }

    /// Mutate a link field.
    pub fn at_link_mut(&mut self, name: &str) -> Result<&mut [f64], FieldError> {
        self.fields.at_link.get_mut(name)
    }

    /// Add a node field from values.
    pub fn add_field_at_node(
        &mut self,
        name: &str,
        values: Vec<f64>,
    ) -> Result<&mut [f64], FieldError> {
        self.fields.at_node.add_field(name, values)
    }

    /// Add a zero-filled node field.
    pub fn add_zeros_at_node(&mut self, name: &str) -> Result<&mut [f64], FieldError> {
        self.fields.at_node.add_zeros(name)
    }

    /// Add a zero-filled link field.
    pub fn add_zeros_at_link(&mut self, name: &str) -> Result<&mut [f64], FieldError> {
        self.fields.at_link.add_zeros(name)
    }

    /// Add a node field whose values are a function of node position.
    pub fn add_field_at_node_from<F>(&mut self, name: &str, f: F) -> Result<&mut [f64], FieldError>
    where
        F: Fn(f64, f64) -> f64,
    {
        let values = (0..self.mesh.n_nodes())
            .map(|i| {
                let (x, y) = self.mesh.node_position(i);
                f(x, y)
            })
            .collect();
        self.fields.at_node.add_field(name, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::RasterMeshBuilder;

    #[test]
    fn test_fields_sized_to_mesh() {
        let mesh = RasterMeshBuilder::new(3, 3).build().unwrap();
        let mut grid = ModelGrid::new(mesh);

        assert_eq!(grid.add_zeros_at_node(SURFACE_WATER_DEPTH).unwrap().len(), 9);
        assert_eq!(grid.add_zeros_at_link(WATER_SPECIFIC_DISCHARGE).unwrap().len(), 12);
        assert!(matches!(
            grid.add_field_at_node(TOPOGRAPHIC_ELEVATION, vec![0.0; 4]),
            Err(FieldError::LengthMismatch { expected: 9, .. })
        ));
    }

    #[test]
    fn test_field_from_position() {
        let mesh = RasterMeshBuilder::new(3, 3)
            .with_spacing(2.0, 1.0)
            .build()
            .unwrap();
        let mut grid = ModelGrid::new(mesh);
        grid.add_field_at_node_from(TOPOGRAPHIC_ELEVATION, |x, y| x + 10.0 * y)
            .unwrap();

        let z = grid.at_node(TOPOGRAPHIC_ELEVATION).unwrap();
        assert_eq!(z[2], 4.0);
        assert_eq!(z[4], 12.0);
    }

    #[test]
    fn test_split_mut() {
        let mesh = RasterMeshBuilder::new(3, 3).build().unwrap();
        let mut grid = ModelGrid::new(mesh);
        grid.add_zeros_at_node(SURFACE_WATER_DEPTH).unwrap();

        let (mesh, fields) = grid.split_mut();
        let depth = fields.at_node.get_mut(SURFACE_WATER_DEPTH).unwrap();
        for node in mesh.core_nodes() {
            depth[node] = 1.0;
        }

        assert_eq!(grid.at_node(SURFACE_WATER_DEPTH).unwrap()[4], 1.0);
        assert_eq!(grid.at_node(SURFACE_WATER_DEPTH).unwrap()[0], 0.0);
    }
}
