use std::collections::HashMap;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Translation3, UnitQuaternion, Vector3};

use super::camera::OrbitCamera;
use super::controller::Controller;
use super::renderer::OverlayRenderer;
use crate::model::{BodyID, Pivot, System, Trajectory};

// Real radii are invisible at solar-system scale
const RADIUS_EXAGGERATION: f64 = 200.0;
const MAX_DISPLAY_RADIUS: f64 = 0.05;

const PALETTE: [[f32; 3]; 6] = [
    [1.0, 0.85, 0.4],
    [0.6, 0.6, 0.6],
    [0.9, 0.7, 0.4],
    [0.3, 0.5, 1.0],
    [0.9, 0.35, 0.2],
    [0.8, 0.6, 0.9],
];

fn display_radius(radius: f64) -> f32 {
    (radius * RADIUS_EXAGGERATION).min(MAX_DISPLAY_RADIUS) as f32
}

fn to_scene(v: Vector3<f64>) -> Point3<f32> {
    Point3::from(nalgebra::convert::<_, Vector3<f32>>(v))
}

/// Cycles through the barycenter and then every body, in tick order.
pub struct CameraFocus {
    focus_points: Vec<Pivot>,
    focus_idx: usize,
}

impl CameraFocus {
    pub fn new(system: &System) -> Self {
        let mut focus_points = vec![Pivot::Barycenter];
        focus_points.extend(system.ids().map(Pivot::Body));
        CameraFocus {
            focus_points,
            focus_idx: 0,
        }
    }

    pub fn next(&mut self) {
        let num_points = self.focus_points.len();
        self.focus_idx = (self.focus_idx + 1) % num_points;
    }

    pub fn prev(&mut self) {
        let num_points = self.focus_points.len();
        self.focus_idx = (self.focus_idx + num_points - 1) % num_points;
    }

    pub fn point(&self) -> Pivot {
        self.focus_points[self.focus_idx]
    }
}

struct BodyObject {
    sphere: SceneNode,
    color: Point3<f32>,
    trajectory: Trajectory,
}

pub struct View {
    system: System,
    bodies: HashMap<BodyID, BodyObject>,
    // Camera
    camera: OrbitCamera,
    camera_focus: CameraFocus,
    // Overlays
    show_trails: bool,
    show_grid: bool,
    show_axes: bool,
    renderer: OverlayRenderer,
}

impl View {
    pub fn new(
        system: System,
        colors: &HashMap<BodyID, Point3<f32>>,
        window: &mut Window,
    ) -> Self {
        let camera_focus = CameraFocus::new(&system);

        let mut bodies = HashMap::new();
        for (i, (id, body)) in system.bodies().enumerate() {
            let color = colors
                .get(&id)
                .copied()
                .unwrap_or_else(|| Point3::from(PALETTE[i % PALETTE.len()]));

            let mut sphere = window.add_sphere(display_radius(body.radius()));
            sphere.set_color(color.x, color.y, color.z);

            let object = BodyObject {
                sphere,
                color,
                trajectory: Trajectory::new(camera_focus.point()),
            };
            bodies.insert(id, object);
        }

        // Start far enough out to see everything
        let extent = system
            .try_barycenter()
            .map(|center| {
                system
                    .bodies()
                    .map(|(_, body)| (body.position() - center).norm())
                    .fold(0.0, f64::max)
            })
            .unwrap_or(1.0);
        let camera = OrbitCamera::new((2.5 * extent).max(1e-3) as f32);

        let mut view = View {
            system,
            bodies,
            camera,
            camera_focus,
            show_trails: true,
            show_grid: true,
            show_axes: false,
            renderer: OverlayRenderer::new(),
        };
        view.fix_camera_zoom();
        view.update_scene_objects();

        view
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    /// Runs one frame's worth of ticks, logging trajectories after each.
    pub fn update_state(&mut self, controller: &Controller) {
        let speed = controller.speed();
        for _ in 0..speed.repeats() {
            self.system.tick(speed.step_size(), controller.integrator());
            for (id, object) in self.bodies.iter_mut() {
                object.trajectory.record_from(&self.system, *id);
            }
        }
        self.update_scene_objects();
    }

    pub fn focus_next(&mut self) {
        self.camera_focus.next();
        self.refocus();
    }

    pub fn focus_prev(&mut self) {
        self.camera_focus.prev();
        self.refocus();
    }

    pub fn toggle_trails(&mut self) {
        self.show_trails = !self.show_trails;
    }

    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    pub fn toggle_axes(&mut self) {
        self.show_axes = !self.show_axes;
    }

    fn refocus(&mut self) {
        let pivot = self.camera_focus.point();
        for object in self.bodies.values_mut() {
            object.trajectory.set_pivot(pivot);
        }
        log::debug!("Focused on {}", self.focused_name());
        self.fix_camera_zoom();
        self.update_scene_objects();
    }

    fn fix_camera_zoom(&mut self) {
        let min_distance = match self.camera_focus.point() {
            Pivot::Barycenter => 1e-6,
            Pivot::Body(id) => self
                .system
                .body(id)
                .map_or(1e-6, |body| 2.0 * display_radius(body.radius())),
        };
        self.camera.set_min_distance(min_distance);
    }

    fn focus_position(&self) -> Vector3<f64> {
        self.camera_focus
            .point()
            .position(&self.system)
            .unwrap_or_else(Vector3::zeros)
    }

    fn update_scene_objects(&mut self) {
        let origin = self.focus_position();
        for (id, object) in self.bodies.iter_mut() {
            let body = match self.system.body(*id) {
                Some(body) => body,
                None => continue,
            };
            let position = to_scene(body.position() - origin);
            let orientation: UnitQuaternion<f32> = nalgebra::convert(body.orientation());
            object
                .sphere
                .set_local_translation(Translation3::from(position.coords));
            object.sphere.set_local_rotation(orientation);
        }
    }

    pub fn prerender_scene(&mut self, window: &mut Window, controller: &Controller) {
        if self.show_grid {
            self.renderer
                .draw_grid(Point3::origin(), self.camera.distance());
        }
        if self.show_axes {
            self.renderer
                .draw_axes(Point3::origin(), 0.5 * self.camera.distance());
        }
        if self.show_trails {
            for object in self.bodies.values() {
                let points = object.trajectory.points().map(|p| to_scene(*p));
                self.renderer.draw_trail(points, object.color);
            }
        }

        // Draw text
        let default_font = kiss3d::text::Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);
        window.draw_text(
            &self.left_hand_text(),
            &Point2::origin(),
            60.0,
            &default_font,
            &text_color,
        );
        window.draw_text(
            &self.time_summary_text(controller),
            // draw_text works in physical pixels
            &Point2::new(window.width() as f32 * 2.0 - 700.0, 0.0),
            60.0,
            &default_font,
            &text_color,
        );
    }

    fn focused_name(&self) -> String {
        match self.camera_focus.point() {
            Pivot::Barycenter => String::from("Barycenter"),
            Pivot::Body(id) => self
                .system
                .body(id)
                .map_or_else(|| format!("{:?}", id), |body| body.name().to_owned()),
        }
    }

    fn left_hand_text(&self) -> String {
        let origin = self.focus_position();
        let barycenter = self.system.try_barycenter().unwrap_or_else(|_| Vector3::zeros());
        let momentum = self.system.total_momentum();
        format!(
            "Focused on: {}
Distance to barycenter: {:.4} AU
Bodies: {}
Total momentum: {:.3e}",
            self.focused_name(),
            (origin - barycenter).norm(),
            self.system.len(),
            momentum.norm(),
        )
    }

    fn time_summary_text(&self, controller: &Controller) -> String {
        format!(
            "Time: {}
Speed: {}{}
Integrator: {}
FPS: {:.0}",
            format_years(self.system.time()),
            controller.speed(),
            if controller.is_paused() { " (paused)" } else { "" },
            controller.integrator(),
            controller.fps(),
        )
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}

/// Formats a time in years as whole years and fractional days.
fn format_years(years: f64) -> String {
    let whole_years = years.trunc();
    let days = (years - whole_years) * 365.0;
    format!("{}y, {:.2}d", whole_years as i64, days)
}
