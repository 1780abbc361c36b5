//! Read-only triangle access for Bevy meshes.

use bevy::mesh::{PrimitiveTopology, VertexAttributeValues};
use bevy::prelude::*;

/// Vertex positions of a mesh, if stored in the common `Float32x3` layout.
pub fn mesh_positions(mesh: &Mesh) -> Option<&[[f32; 3]]> {
    match mesh.attribute(Mesh::ATTRIBUTE_POSITION)? {
        VertexAttributeValues::Float32x3(positions) => Some(positions),
        _ => None,
    }
}

/// Triangle vertex indices of a triangle-list mesh.
///
/// Non-indexed meshes yield consecutive triples. Other topologies yield nothing.
pub fn triangle_indices(mesh: &Mesh) -> impl Iterator<Item = [usize; 3]> + '_ {
    let mut flat: Box<dyn Iterator<Item = usize> + '_> =
        if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
            Box::new(std::iter::empty())
        } else {
            match mesh.indices() {
                Some(indices) => Box::new(indices.iter()),
                None => Box::new(0..mesh.count_vertices()),
            }
        };

    std::iter::from_fn(move || Some([flat.next()?, flat.next()?, flat.next()?]))
}

/// Triangles of a mesh in its own local space.
///
/// Triangles referencing missing vertices are skipped.
pub fn local_triangles(mesh: &Mesh) -> impl Iterator<Item = [Vec3; 3]> + '_ {
    let positions = mesh_positions(mesh).unwrap_or_default();

    triangle_indices(mesh).filter_map(move |[a, b, c]| {
        Some([
            Vec3::from(*positions.get(a)?),
            Vec3::from(*positions.get(b)?),
            Vec3::from(*positions.get(c)?),
        ])
    })
}
