//! Annotations pinned to the model surface.
//!
//! An annotation is a point on the model (lifted slightly off the surface)
//! with a title and free-form info text. At most a configured number exist at
//! once; each one is drawn as a camera-facing icon while annotation mode is
//! active.
//!
//! ## Module Structure
//!
//! - [`store`] - Ordered collection, selection and hover state
//! - [`components`] - Icon component and shared icon assets
//! - [`billboard`] - Icon entity sync and camera-facing orientation
//! - [`hit_testing`] - Screen-space icon hover and click selection
//! - [`placement`] - Double-click placement and mode side effects
//! - [`panels`] - In-viewport text panel and index badges

mod billboard;
mod components;
mod hit_testing;
mod panels;
mod placement;
mod store;

#[cfg(test)]
mod tests;

// Re-exports - State
pub use store::{Annotation, AnnotationStore, PlaceOutcome};

// Re-exports - Components
pub use components::{setup_icon_assets, AnnotationIcon, AnnotationIconAssets};

// Re-exports - Systems
pub use billboard::{billboard_rotation, orient_annotation_icons, sync_annotation_icons};
pub use hit_testing::{icon_under_cursor, select_clicked_icon, update_icon_hover, ScreenIcon};
pub use panels::{annotation_badges_ui, annotation_text_panel_ui};
pub use placement::{
    apply_mode_transition, handle_annotation_mode_changes, handle_annotation_placement,
    place_or_warn, placement_requested, sync_annotation_capacity,
};
