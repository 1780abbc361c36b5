//! Component types for annotation icon entities.

use bevy::prelude::*;

/// Billboard icon of the annotation at `index` in the store
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationIcon {
    pub index: usize,
}

/// Shared mesh and materials for annotation icons
#[derive(Resource)]
pub struct AnnotationIconAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
    pub selected_material: Handle<StandardMaterial>,
}

impl AnnotationIconAssets {
    pub fn material_for(&self, selected: bool) -> Handle<StandardMaterial> {
        if selected {
            self.selected_material.clone()
        } else {
            self.material.clone()
        }
    }
}

pub fn setup_icon_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Unit disc in the XY plane facing +Z; billboarding turns +Z to the camera
    let mesh = meshes.add(Circle::new(1.0));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.95, 0.95, 0.95),
        unlit: true,
        ..default()
    });
    let selected_material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.78, 0.2),
        unlit: true,
        ..default()
    });

    commands.insert_resource(AnnotationIconAssets {
        mesh,
        material,
        selected_material,
    });
}
