//! Icon entities that mirror the annotation store and face the camera.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::config::AppConfig;
use crate::editor::mode::ModeController;
use crate::editor::params::CameraParams;
use crate::scene::ModelBounds;

use super::components::{AnnotationIcon, AnnotationIconAssets};
use super::store::AnnotationStore;

/// Rotation that turns the icon's +Z axis toward the camera
pub fn billboard_rotation(icon: Vec3, camera: Vec3) -> Quat {
    let away = icon - camera;
    if away.length_squared() <= f32::EPSILON {
        return Quat::IDENTITY;
    }
    Transform::IDENTITY.looking_to(away, Vec3::Y).rotation
}

/// Icon scale for the current hover state
pub fn icon_scale(base: f32, hovered: bool, hover_scale: f32) -> f32 {
    if hovered { base * hover_scale } else { base }
}

/// Spawn, move and despawn icons so there is exactly one per annotation
#[allow(clippy::type_complexity)]
pub fn sync_annotation_icons(
    mut commands: Commands,
    store: Res<AnnotationStore>,
    assets: Res<AnnotationIconAssets>,
    mut icons: Query<(
        Entity,
        &AnnotationIcon,
        &mut Transform,
        &mut MeshMaterial3d<StandardMaterial>,
    )>,
) {
    if !store.is_changed() {
        return;
    }

    let mut present = HashSet::new();
    for (entity, icon, mut transform, mut material) in icons.iter_mut() {
        let Some(annotation) = store.get(icon.index) else {
            commands.entity(entity).despawn();
            continue;
        };
        present.insert(icon.index);
        transform.translation = annotation.position;

        let wanted = assets.material_for(store.selected() == Some(icon.index));
        if material.0 != wanted {
            material.0 = wanted;
        }
    }

    for (index, annotation) in store.iter().enumerate() {
        if present.contains(&index) {
            continue;
        }
        commands.spawn((
            Name::new(format!("Annotation {}", index + 1)),
            AnnotationIcon { index },
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(assets.material_for(store.selected() == Some(index))),
            Transform::from_translation(annotation.position),
            Visibility::Hidden,
        ));
    }
}

/// Face every icon toward the camera. Icons are only shown while annotating.
pub fn orient_annotation_icons(
    camera: CameraParams,
    bounds: Res<ModelBounds>,
    config: Res<AppConfig>,
    controller: Res<ModeController>,
    store: Res<AnnotationStore>,
    mut icons: Query<(&AnnotationIcon, &mut Transform, &mut Visibility)>,
) {
    let Some(camera_position) = camera.camera_position() else {
        return;
    };

    let annotating = controller.is_annotating();
    let hover_scale = config.interaction().hover_scale;
    let base = bounds.icon_scale();

    for (icon, mut transform, mut visibility) in icons.iter_mut() {
        let hovered = annotating && store.hovered() == Some(icon.index);
        let oriented = Transform {
            rotation: billboard_rotation(transform.translation, camera_position),
            scale: Vec3::splat(icon_scale(base, hovered, hover_scale)),
            ..*transform
        };
        transform.set_if_neq(oriented);

        visibility.set_if_neq(if annotating {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
    }
}
