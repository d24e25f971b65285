//! Scene host abstraction
//!
//! The editor never draws anything itself. A `SceneHost` turns pointer
//! positions into ground-plane points, picks objects and displays the
//! sketch preview.

use glam::{Vec2, Vec3};
use shaper_cad::{CadKernel, Point2D, SketchPreview};
use shaper_core::SceneObject;
use uuid::Uuid;

/// Capabilities the editor needs from whatever displays the scene
pub trait SceneHost {
    /// Intersect the pointer ray with the `y = 0` plane
    fn project_pointer_to_ground_plane(&self, screen: Vec2) -> Option<Point2D>;

    /// Nearest selectable object under the pointer
    fn pick_selectable_at(
        &self,
        screen: Vec2,
        objects: &[SceneObject],
        kernel: &dyn CadKernel,
    ) -> Option<Uuid>;

    /// Show (or replace) the sketch preview
    fn render_preview(&mut self, preview: &SketchPreview);

    /// Remove the sketch preview
    fn clear_preview(&mut self);
}

/// A host without a display: a top-down orthographic view of the ground
/// plane
///
/// Screen `x` maps to world `x` and screen `y` to world `z`, with the world
/// origin at the center of the viewport.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    viewport_size: Vec2,
    pixels_per_unit: f32,
    preview: Option<SketchPreview>,
    preview_updates: usize,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(Vec2::new(800.0, 600.0), 20.0)
    }
}

impl HeadlessHost {
    pub fn new(viewport_size: Vec2, pixels_per_unit: f32) -> Self {
        Self {
            viewport_size,
            pixels_per_unit: if pixels_per_unit > 0.0 {
                pixels_per_unit
            } else {
                1.0
            },
            preview: None,
            preview_updates: 0,
        }
    }

    /// Screen position of a ground-plane point
    pub fn screen_point(&self, point: Point2D) -> Vec2 {
        point.to_vec2() * self.pixels_per_unit + self.viewport_size / 2.0
    }

    /// Preview currently shown
    pub fn preview(&self) -> Option<&SketchPreview> {
        self.preview.as_ref()
    }

    /// Number of times a preview was rendered
    pub fn preview_updates(&self) -> usize {
        self.preview_updates
    }
}

impl SceneHost for HeadlessHost {
    fn project_pointer_to_ground_plane(&self, screen: Vec2) -> Option<Point2D> {
        if !screen.is_finite() {
            return None;
        }
        let world = (screen - self.viewport_size / 2.0) / self.pixels_per_unit;
        Some(Point2D::from(world))
    }

    fn pick_selectable_at(
        &self,
        screen: Vec2,
        objects: &[SceneObject],
        kernel: &dyn CadKernel,
    ) -> Option<Uuid> {
        let point = self.project_pointer_to_ground_plane(screen)?;

        // Looking straight down, the hit is the object with the highest top
        objects
            .iter()
            .filter(|o| o.selectable)
            .filter_map(|o| {
                let (min, max) = world_bounds(o, kernel)?;
                let inside = point.x >= min.x && point.x <= max.x && point.z >= min.z && point.z <= max.z;
                inside.then_some((o.id, max.y))
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn render_preview(&mut self, preview: &SketchPreview) {
        self.preview = Some(preview.clone());
        self.preview_updates += 1;
    }

    fn clear_preview(&mut self) {
        self.preview = None;
    }
}

/// World-space bounds of an object's display mesh
fn world_bounds(object: &SceneObject, kernel: &dyn CadKernel) -> Option<(Vec3, Vec3)> {
    let mesh = object.mesh(kernel).ok()?;
    let matrix = object.transform.matrix();
    let mut points = mesh
        .vertices
        .iter()
        .map(|v| matrix.transform_point3(Vec3::from(*v)));
    let first = points.next()?;
    Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
}
