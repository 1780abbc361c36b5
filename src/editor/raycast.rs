//! Surface raycaster: casts the interaction ray into the model every frame
//! while a placement mode is active and publishes the nearest hit.

use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::prelude::*;

use crate::config::AppConfig;
use crate::scene::{ModelBounds, ModelMesh, ModelMeshes, local_triangles};

use super::params::CameraParams;

/// Nearest intersection of the interaction ray with the model surface.
///
/// A miss is the normal state, not an error: `intersects` is false and the
/// remaining fields are meaningless.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceHit {
    pub intersects: bool,
    /// Exact point on the surface
    pub point: Vec3,
    /// World-space unit normal of the hit face
    pub normal: Vec3,
    /// Surface point lifted along the normal, where billboards are anchored
    pub anchor: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
}

impl SurfaceHit {
    pub fn miss() -> Self {
        Self::default()
    }

    /// Build a hit from a triangle intersection, lifting the anchor by `offset`
    pub fn from_triangle(hit: TriangleHit, offset: f32) -> Self {
        Self {
            intersects: true,
            point: hit.point,
            normal: hit.normal,
            anchor: hit.point + hit.normal * offset,
            distance: hit.distance,
        }
    }

    /// The raw surface point, if there is one
    pub fn point(&self) -> Option<Vec3> {
        self.intersects.then_some(self.point)
    }
}

/// Intersection of a ray with a single triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Moller-Trumbore ray-triangle intersection.
///
/// Returns the distance along the ray if the ray hits the triangle.
pub fn ray_triangle_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);

    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t > EPSILON { Some(t) } else { None }
}

/// Which triangle faces a ray may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceCulling {
    /// Skip faces pointing away from the ray origin
    Back,
    /// Skip faces pointing toward the ray origin (mirrored transforms)
    Front,
    /// Hit both sides
    None,
}

impl FaceCulling {
    fn skips(self, face_normal: Vec3, ray_dir: Vec3) -> bool {
        let facing = face_normal.dot(ray_dir);
        match self {
            FaceCulling::Back => facing >= 0.0,
            FaceCulling::Front => facing <= 0.0,
            FaceCulling::None => false,
        }
    }
}

/// Nearest triangle hit by the ray, honouring `culling`.
///
/// With back-face culling, rays that start inside a closed mesh do not hit
/// its far wall.
pub fn raycast_triangles(
    ray_origin: Vec3,
    ray_dir: Vec3,
    triangles: impl IntoIterator<Item = [Vec3; 3]>,
    culling: FaceCulling,
) -> Option<TriangleHit> {
    let mut closest: Option<TriangleHit> = None;

    for [v0, v1, v2] in triangles {
        let face_normal = (v1 - v0).cross(v2 - v0);
        if culling.skips(face_normal, ray_dir) {
            continue;
        }

        let Some(t) = ray_triangle_intersection(ray_origin, ray_dir, v0, v1, v2) else {
            continue;
        };

        if closest.is_none_or(|c| t < c.distance) {
            closest = Some(TriangleHit {
                distance: t,
                point: ray_origin + ray_dir * t,
                normal: face_normal.normalize(),
            });
        }
    }

    closest
}

/// Nearest hit of a world-space ray on one model mesh.
///
/// The ray is moved into mesh space so vertices are never transformed, and
/// meshes whose bounds the ray misses are rejected before any triangle test.
/// The returned hit is in world space with the normal facing the ray.
pub fn raycast_mesh(ray_origin: Vec3, ray_dir: Vec3, target: &ModelMesh) -> Option<TriangleHit> {
    let world_from_local = target.transform.affine();
    let determinant = world_from_local.matrix3.determinant();
    if determinant == 0.0 || !determinant.is_finite() {
        return None;
    }
    let local_from_world = world_from_local.inverse();

    let local_origin = local_from_world.transform_point3(ray_origin);
    let local_dir = local_from_world.transform_vector3(ray_dir);

    if let Some(aabb) = target.aabb {
        let direction = Dir3::new(local_dir).ok()?;
        let bounds = Aabb3d::new(aabb.center, aabb.half_extents);
        RayCast3d::new(local_origin, direction, f32::MAX).aabb_intersection_at(&bounds)?;
    }

    let culling = match (target.double_sided, determinant < 0.0) {
        (true, _) => FaceCulling::None,
        (false, false) => FaceCulling::Back,
        (false, true) => FaceCulling::Front,
    };
    let local = raycast_triangles(local_origin, local_dir, local_triangles(target.mesh), culling)?;

    let point = world_from_local.transform_point3(local.point);
    let normal = (local_from_world.matrix3.transpose() * local.normal).normalize();
    let normal = if normal.dot(ray_dir) > 0.0 { -normal } else { normal };

    Some(TriangleHit {
        distance: ray_origin.distance(point),
        point,
        normal,
    })
}

/// Clear the hit while no placement mode is active
pub fn clear_surface_hit(mut surface_hit: ResMut<SurfaceHit>) {
    surface_hit.set_if_neq(SurfaceHit::miss());
}

/// Cast the interaction ray against the model. Runs only while a placement mode is active.
pub fn update_surface_hit(
    config: Res<AppConfig>,
    camera: CameraParams,
    model: ModelMeshes,
    bounds: Res<ModelBounds>,
    mut surface_hit: ResMut<SurfaceHit>,
) {
    let Some(ray) = camera.interaction_ray(config.interaction().raycast_origin) else {
        surface_hit.set_if_neq(SurfaceHit::miss());
        return;
    };

    let origin = ray.origin;
    let direction = *ray.direction;

    let nearest = model
        .collect()
        .iter()
        .filter_map(|part| raycast_mesh(origin, direction, part))
        .min_by(|a, b| a.distance.total_cmp(&b.distance));

    let offset = bounds.surface_offset(config.interaction().surface_offset_factor);
    surface_hit.set_if_neq(match nearest {
        Some(hit) => SurfaceHit::from_triangle(hit, offset),
        None => SurfaceHit::miss(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::RenderAssetUsages;
    use bevy::camera::primitives::Aabb;
    use bevy::mesh::{Indices, PrimitiveTopology};

    /// Unit quad in the local z = 0 plane facing +Z
    fn quad_mesh() -> Mesh {
        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(
                Mesh::ATTRIBUTE_POSITION,
                vec![
                    [-0.5, -0.5, 0.0],
                    [0.5, -0.5, 0.0],
                    [0.5, 0.5, 0.0],
                    [-0.5, 0.5, 0.0],
                ],
            )
            .with_inserted_indices(Indices::U32(vec![0, 1, 2, 0, 2, 3]))
    }

    fn model_mesh<'a>(
        mesh: &'a Mesh,
        transform: &'a GlobalTransform,
        aabb: Option<&'a Aabb>,
        double_sided: bool,
    ) -> ModelMesh<'a> {
        ModelMesh {
            mesh,
            transform,
            aabb,
            double_sided,
        }
    }

    /// Square in the z = 0 plane facing +Z
    fn wall(z: f32) -> Vec<[Vec3; 3]> {
        vec![
            [
                Vec3::new(-1.0, -1.0, z),
                Vec3::new(1.0, -1.0, z),
                Vec3::new(1.0, 1.0, z),
            ],
            [
                Vec3::new(-1.0, -1.0, z),
                Vec3::new(1.0, 1.0, z),
                Vec3::new(-1.0, 1.0, z),
            ],
        ]
    }

    #[test]
    fn test_ray_hits_triangle() {
        let t = ray_triangle_intersection(
            Vec3::new(0.2, 0.2, 5.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
        );
        assert_eq!(t, Some(5.0));
    }

    #[test]
    fn test_ray_misses_outside_triangle() {
        let t = ray_triangle_intersection(
            Vec3::new(0.8, 0.8, 5.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
        );
        assert!(t.is_none());
    }

    #[test]
    fn test_ray_behind_origin_misses() {
        let t = ray_triangle_intersection(
            Vec3::new(0.2, 0.2, -5.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
        );
        assert!(t.is_none());
    }

    #[test]
    fn test_nearest_triangle_wins() {
        let mut tris = wall(-3.0);
        tris.extend(wall(0.0));
        let hit =
            raycast_triangles(Vec3::new(0.1, 0.1, 10.0), Vec3::NEG_Z, tris, FaceCulling::Back)
                .unwrap();
        assert!((hit.distance - 10.0).abs() < 1e-5);
        assert!(hit.point.abs_diff_eq(Vec3::new(0.1, 0.1, 0.0), 1e-5));
        assert!(hit.normal.abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn test_back_faces_are_skipped() {
        let tris = wall(0.0);
        let hit = raycast_triangles(Vec3::new(0.1, 0.1, -10.0), Vec3::Z, tris.clone(), FaceCulling::Back);
        assert!(hit.is_none());

        let hit = raycast_triangles(Vec3::new(0.1, 0.1, -10.0), Vec3::Z, tris, FaceCulling::None);
        assert!(hit.is_some());
    }

    #[test]
    fn test_no_geometry_is_a_miss() {
        let tris: Vec<[Vec3; 3]> = Vec::new();
        assert!(raycast_triangles(Vec3::ZERO, Vec3::NEG_Z, tris, FaceCulling::Back).is_none());
    }

    #[test]
    fn test_anchor_is_lifted_along_normal() {
        let hit = SurfaceHit::from_triangle(
            TriangleHit {
                distance: 4.0,
                point: Vec3::new(1.0, 2.0, 0.0),
                normal: Vec3::Z,
            },
            0.5,
        );
        assert!(hit.intersects);
        assert_eq!(hit.anchor, Vec3::new(1.0, 2.0, 0.5));
        assert_eq!(hit.point(), Some(Vec3::new(1.0, 2.0, 0.0)));
        assert_eq!(SurfaceHit::miss().point(), None);
    }

    #[test]
    fn test_mesh_hit_is_reported_in_world_space() {
        let mesh = quad_mesh();
        let transform = GlobalTransform::from(
            Transform::from_xyz(0.0, 0.0, -2.0).with_scale(Vec3::splat(4.0)),
        );
        let target = model_mesh(&mesh, &transform, None, false);

        let hit = raycast_mesh(Vec3::new(1.0, 1.0, 8.0), Vec3::NEG_Z, &target).unwrap();
        assert!(hit.point.abs_diff_eq(Vec3::new(1.0, 1.0, -2.0), 1e-4));
        assert!((hit.distance - 10.0).abs() < 1e-4);
        assert!(hit.normal.abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn test_mesh_outside_ray_bounds_is_skipped() {
        let mesh = quad_mesh();
        let transform = GlobalTransform::IDENTITY;
        // Bounds far from the geometry: the triangles are never tested
        let aabb = Aabb::from_min_max(Vec3::new(10.0, 10.0, -1.0), Vec3::new(11.0, 11.0, 1.0));

        let ray = (Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(raycast_mesh(ray.0, ray.1, &model_mesh(&mesh, &transform, None, false)).is_some());
        assert!(raycast_mesh(ray.0, ray.1, &model_mesh(&mesh, &transform, Some(&aabb), false)).is_none());

        let fitted = Aabb::from_min_max(Vec3::new(-0.5, -0.5, -0.1), Vec3::new(0.5, 0.5, 0.1));
        assert!(raycast_mesh(ray.0, ray.1, &model_mesh(&mesh, &transform, Some(&fitted), false)).is_some());
    }

    #[test]
    fn test_double_sided_mesh_is_hit_from_behind() {
        let mesh = quad_mesh();
        let transform = GlobalTransform::IDENTITY;
        let from_behind = (Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        let single = model_mesh(&mesh, &transform, None, false);
        assert!(raycast_mesh(from_behind.0, from_behind.1, &single).is_none());

        let double = model_mesh(&mesh, &transform, None, true);
        let hit = raycast_mesh(from_behind.0, from_behind.1, &double).unwrap();
        // Normal faces the viewer so anchors lift toward the camera
        assert!(hit.normal.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn test_mirrored_mesh_keeps_front_faces() {
        let mesh = quad_mesh();
        let transform =
            GlobalTransform::from(Transform::from_scale(Vec3::new(1.0, 1.0, -1.0)));
        let target = model_mesh(&mesh, &transform, None, false);

        // Mirroring flips winding, so the world-space front still faces +Z
        let hit = raycast_mesh(Vec3::new(0.1, 0.1, 5.0), Vec3::NEG_Z, &target).unwrap();
        assert!(hit.normal.abs_diff_eq(Vec3::Z, 1e-5));
        assert!(raycast_mesh(Vec3::new(0.1, 0.1, -5.0), Vec3::Z, &target).is_none());
    }

    #[test]
    fn test_hit_cleared_outside_placement_modes() {
        use crate::editor::conditions::placement_mode_active;
        use crate::editor::mode::{InteractionMode, ModeController};

        let held = SurfaceHit {
            intersects: true,
            ..default()
        };
        let mut app = App::new();
        app.init_resource::<ModeController>()
            .insert_resource(held)
            .add_systems(Update, clear_surface_hit.run_if(not(placement_mode_active)));

        app.world_mut()
            .resource_mut::<ModeController>()
            .set_mode(InteractionMode::Annotating)
            .unwrap();
        app.update();
        assert!(app.world().resource::<SurfaceHit>().intersects);

        app.world_mut()
            .resource_mut::<ModeController>()
            .set_mode(InteractionMode::None)
            .unwrap();
        app.update();
        assert!(!app.world().resource::<SurfaceHit>().intersects);
    }
}
