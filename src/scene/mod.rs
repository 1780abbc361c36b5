//! The model being annotated: its root entity, world-space bounds and the
//! mesh traversal used by the surface raycaster.
//!
//! Everything under a [`ModelRoot`] (recursively) counts as model surface.
//! Sizes of annotation icons, text panels and measurement markers are derived
//! from [`ModelBounds`] so they scale with the model.

pub mod geometry;

use bevy::camera::primitives::Aabb;
use bevy::ecs::system::SystemParam;
use bevy::gltf::GltfAssetLabel;
use std::path::Path;

use bevy::prelude::*;
use bevy::transform::TransformSystems;
use bevy::window::FileDragAndDrop;

use crate::config::{AppConfig, ConfigLoaded, SetModelPathRequest};
use crate::constants::{ICON_SCALE_DIVISOR, MEASURE_MARKER_DIVISOR, TEXT_PANEL_DROP_DIVISOR};

pub use geometry::{local_triangles, mesh_positions};

/// Marker for the root of the loaded model hierarchy
#[derive(Component)]
pub struct ModelRoot;

/// World-space axis-aligned bounds of every mesh under the model root.
///
/// Empty until at least one mesh has loaded.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ModelBounds {
    extent: Option<(Vec3, Vec3)>,
}

impl ModelBounds {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let extent = points.into_iter().fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((min, max)) => Some((min.min(p), max.max(p))),
        });
        Self { extent }
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    pub fn size(&self) -> Vec3 {
        self.extent.map(|(min, max)| max - min).unwrap_or(Vec3::ZERO)
    }

    pub fn center(&self) -> Vec3 {
        self.extent
            .map(|(min, max)| (min + max) * 0.5)
            .unwrap_or(Vec3::ZERO)
    }

    /// Mean of the three bounding-box dimensions
    pub fn average_dimension(&self) -> f32 {
        let size = self.size();
        (size.x + size.y + size.z) / 3.0
    }

    /// Distance annotations are lifted off the surface along its normal
    pub fn surface_offset(&self, factor: f32) -> f32 {
        factor * self.average_dimension()
    }

    /// Uniform scale of an annotation icon
    pub fn icon_scale(&self) -> f32 {
        self.average_dimension() / ICON_SCALE_DIVISOR
    }

    /// How far below its icon an annotation text panel is anchored
    pub fn text_panel_drop(&self) -> f32 {
        self.average_dimension() / TEXT_PANEL_DROP_DIVISOR
    }

    /// Size of the box markers drawn at measurement endpoints
    pub fn marker_size(&self) -> Vec3 {
        self.size() / MEASURE_MARKER_DIVISOR
    }
}

/// A loaded mesh of the model
#[derive(Clone, Copy)]
pub struct ModelMesh<'a> {
    pub mesh: &'a Mesh,
    pub transform: &'a GlobalTransform,
    /// Local-space bounds, once Bevy has computed them
    pub aabb: Option<&'a Aabb>,
    /// Back faces are hittable (glTF `doubleSided`)
    pub double_sided: bool,
}

type ModelMeshItem = (
    &'static Mesh3d,
    &'static GlobalTransform,
    Option<&'static Aabb>,
    Option<&'static MeshMaterial3d<StandardMaterial>>,
);

/// Bundled access to every mesh under the model root
#[derive(SystemParam)]
pub struct ModelMeshes<'w, 's> {
    roots: Query<'w, 's, Entity, With<ModelRoot>>,
    children: Query<'w, 's, &'static Children>,
    parents: Query<'w, 's, &'static ChildOf>,
    meshes: Query<'w, 's, ModelMeshItem>,
    assets: Res<'w, Assets<Mesh>>,
    materials: Res<'w, Assets<StandardMaterial>>,
}

impl ModelMeshes<'_, '_> {
    /// Loaded meshes of the model
    pub fn collect(&self) -> Vec<ModelMesh<'_>> {
        let mut found = Vec::new();
        for root in self.roots.iter() {
            for entity in std::iter::once(root).chain(self.children.iter_descendants(root)) {
                if let Ok((handle, transform, aabb, material)) = self.meshes.get(entity)
                    && let Some(mesh) = self.assets.get(&handle.0)
                {
                    let double_sided = material
                        .and_then(|material| self.materials.get(&material.0))
                        .is_some_and(|material| material.double_sided || material.cull_mode.is_none());
                    found.push(ModelMesh {
                        mesh,
                        transform,
                        aabb,
                        double_sided,
                    });
                }
            }
        }
        found
    }

    /// Whether `entity` is a model root or one of its descendants
    pub fn contains(&self, entity: Entity) -> bool {
        self.roots.contains(entity)
            || self
                .parents
                .iter_ancestors(entity)
                .any(|ancestor| self.roots.contains(ancestor))
    }
}

/// Spawn the model root, either from the configured glTF file or from demo geometry
fn spawn_model(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<AppConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    match &config.data.model_path {
        Some(path) => spawn_gltf_model(&mut commands, &asset_server, path),
        None => {
            info!("No model configured, using demo geometry");
            let root = spawn_model_root(&mut commands);
            spawn_demo_geometry(&mut commands, root, &mut meshes, &mut materials);
        }
    }

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 2_000.0,
            ..default()
        },
        Transform::from_xyz(-6.0, 2.0, -4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spawn_model_root(commands: &mut Commands) -> Entity {
    commands
        .spawn((
            Name::new("Model"),
            ModelRoot,
            Transform::default(),
            Visibility::default(),
        ))
        .id()
}

fn spawn_gltf_model(commands: &mut Commands, asset_server: &AssetServer, path: &Path) {
    info!("Loading model from {:?}", path);
    let root = spawn_model_root(commands);
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.to_path_buf()));
    commands.entity(root).insert(SceneRoot(scene));
}

/// glTF files are the only model format accepted
pub fn is_model_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gltf") || ext.eq_ignore_ascii_case("glb"))
}

/// Accept glTF files dropped onto the window as the new model
fn handle_dropped_model(
    mut drops: MessageReader<FileDragAndDrop>,
    mut requests: MessageWriter<SetModelPathRequest>,
) {
    for event in drops.read() {
        let FileDragAndDrop::DroppedFile { path_buf, .. } = event else {
            continue;
        };
        if is_model_file(path_buf) {
            requests.write(SetModelPathRequest {
                path: path_buf.clone(),
            });
        } else {
            warn!("Ignoring dropped file {:?}: not a glTF model", path_buf);
        }
    }
}

/// Replace the model when a new path is chosen
fn reload_model(
    mut requests: MessageReader<SetModelPathRequest>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    roots: Query<Entity, With<ModelRoot>>,
    mut bounds: ResMut<ModelBounds>,
) {
    let Some(request) = requests.read().last() else {
        return;
    };

    for root in roots.iter() {
        commands.entity(root).despawn();
    }
    *bounds = ModelBounds::default();
    spawn_gltf_model(&mut commands, &asset_server, &request.path);
}

fn spawn_demo_geometry(
    commands: &mut Commands,
    root: Entity,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let stone = materials.add(StandardMaterial {
        base_color: Color::srgb(0.62, 0.6, 0.56),
        perceptual_roughness: 0.8,
        ..default()
    });
    let brass = materials.add(StandardMaterial {
        base_color: Color::srgb(0.78, 0.6, 0.28),
        metallic: 0.8,
        perceptual_roughness: 0.35,
        ..default()
    });

    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Name::new("Pedestal"),
            Mesh3d(meshes.add(Cylinder::new(1.4, 0.4))),
            MeshMaterial3d(stone.clone()),
            Transform::from_xyz(0.0, -1.2, 0.0),
        ));
        parent.spawn((
            Name::new("Ring"),
            Mesh3d(meshes.add(Torus::new(0.55, 1.0))),
            MeshMaterial3d(brass.clone()),
            Transform::from_xyz(0.0, 0.0, 0.0)
                .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
        ));
        parent.spawn((
            Name::new("Orb"),
            Mesh3d(meshes.add(Sphere::new(0.45))),
            MeshMaterial3d(brass),
            Transform::from_xyz(0.0, 0.0, 0.0),
        ));
    });
}

/// Recompute model bounds whenever model meshes move or change.
///
/// Meshes outside the model (annotation icons) never trigger a recompute.
#[allow(clippy::type_complexity)]
fn update_model_bounds(
    model: ModelMeshes,
    changed: Query<Entity, (With<Mesh3d>, Or<(Changed<GlobalTransform>, Changed<Mesh3d>)>)>,
    mut bounds: ResMut<ModelBounds>,
) {
    let model_changed = changed.iter().any(|entity| model.contains(entity));
    if !model_changed && !bounds.is_empty() {
        return;
    }

    let computed = ModelBounds::from_points(model.collect().into_iter().flat_map(|part| {
        mesh_positions(part.mesh)
            .unwrap_or_default()
            .iter()
            .map(move |p| part.transform.transform_point(Vec3::from(*p)))
    }));

    if bounds.set_if_neq(computed) {
        debug!(
            "Model bounds updated: size {:?}, center {:?}",
            computed.size(),
            computed.center()
        );
    }
}

pub struct SceneModelPlugin;

impl Plugin for SceneModelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelBounds>()
            .add_systems(Startup, spawn_model.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    handle_dropped_model,
                    reload_model.run_if(on_message::<SetModelPathRequest>),
                )
                    .chain(),
            )
            .add_systems(PostUpdate, update_model_bounds.after(TransformSystems::Propagate));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube_bounds() -> ModelBounds {
        ModelBounds::from_points([Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0)])
    }

    #[test]
    fn test_empty_bounds() {
        let bounds = ModelBounds::default();
        assert!(bounds.is_empty());
        assert_eq!(bounds.size(), Vec3::ZERO);
        assert_eq!(bounds.average_dimension(), 0.0);
    }

    #[test]
    fn test_bounds_from_points() {
        let bounds = unit_cube_bounds();
        assert!(!bounds.is_empty());
        assert_eq!(bounds.size(), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(bounds.center(), Vec3::ZERO);
        assert_eq!(bounds.average_dimension(), 4.0);
    }

    #[test]
    fn test_model_file_extensions() {
        assert!(is_model_file(Path::new("statue.glb")));
        assert!(is_model_file(Path::new("/tmp/Scene.GLTF")));
        assert!(!is_model_file(Path::new("texture.png")));
        assert!(!is_model_file(Path::new("README")));
    }

    #[test]
    fn test_model_meshes_contains_only_model_hierarchy() {
        use bevy::ecs::system::SystemState;

        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<StandardMaterial>>();
        let root = world.spawn(ModelRoot).id();
        let part = world.spawn(ChildOf(root)).id();
        let nested = world.spawn(ChildOf(part)).id();
        let icon = world.spawn(Transform::default()).id();

        let mut state = SystemState::<ModelMeshes>::new(&mut world);
        let model = state.get(&world);
        assert!(model.contains(root));
        assert!(model.contains(part));
        assert!(model.contains(nested));
        assert!(!model.contains(icon));
    }

    #[test]
    fn test_derived_sizes() {
        let bounds = unit_cube_bounds();
        assert!((bounds.surface_offset(0.04) - 0.16).abs() < 1e-6);
        assert!((bounds.icon_scale() - 4.0 / 30.0).abs() < 1e-6);
        assert!((bounds.text_panel_drop() - 0.2).abs() < 1e-6);
        assert_eq!(bounds.marker_size(), Vec3::new(2.0, 4.0, 6.0) / 90.0);
    }
}
