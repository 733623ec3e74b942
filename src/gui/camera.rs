use std::f32::consts::PI;

use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector2, Vector3};

const KEY_ORBIT_UP: Key = Key::W;
const KEY_ORBIT_DOWN: Key = Key::S;
const KEY_ORBIT_LEFT: Key = Key::A;
const KEY_ORBIT_RIGHT: Key = Key::D;
const KEY_ZOOM_IN: Key = Key::Equals;
const KEY_ZOOM_OUT: Key = Key::Minus;

const KEY_ANGLE_STEP: f32 = 0.1;
const KEY_ZOOM_RATIO: f32 = 1.2;
const SCROLL_ZOOM_RATIO: f32 = 1.5;
const DRAG_ANGLE_PER_PIXEL: f32 = 0.005;

// Keeps the camera off the poles, where look_at degenerates
const ELEVATION_MARGIN: f32 = 0.001;

/// Orbiting camera for scenes that span many orders of magnitude.
///
/// The camera always looks at the origin with +z up; the view translates the
/// scene so that the focused object sits there. Unlike kiss3d's ArcBall, the
/// near and far clip planes follow the zoom level, so a moon a few radii away
/// and the whole solar system both render without z-fighting.
pub struct OrbitCamera {
    azimuth: f32,
    elevation: f32,
    distance: f32,
    min_distance: f32,
    max_distance: f32,
    aspect: f32,
    fovy: f32,
    last_cursor: Vector2<f32>,
}

impl OrbitCamera {
    pub fn new(distance: f32) -> Self {
        OrbitCamera {
            azimuth: -PI / 2.0,
            elevation: PI / 6.0,
            distance,
            min_distance: 1e-6,
            max_distance: 1e3,
            aspect: 4.0 / 3.0,
            fovy: PI / 4.0,
            last_cursor: Vector2::zeros(),
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Sets how close the camera may get, e.g. to stay outside the focused
    /// body. Pulls the camera back if it is already closer.
    pub fn set_min_distance(&mut self, min_distance: f32) {
        self.min_distance = min_distance.min(self.max_distance);
        self.zoom(1.0);
    }

    pub fn orbit(&mut self, d_azimuth: f32, d_elevation: f32) {
        let limit = PI / 2.0 - ELEVATION_MARGIN;
        self.azimuth = (self.azimuth + d_azimuth) % (2.0 * PI);
        self.elevation = nalgebra::clamp(self.elevation + d_elevation, -limit, limit);
    }

    pub fn zoom(&mut self, ratio: f32) {
        self.distance = nalgebra::clamp(
            self.distance * ratio,
            self.min_distance,
            self.max_distance,
        );
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(
            self.aspect,
            self.fovy,
            self.distance * 1e-3,
            self.distance * 1e4,
        )
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }
}

impl Camera for OrbitCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let cursor = Vector2::new(x as f32, y as f32);
                if canvas.get_mouse_button(MouseButton::Button1) == Action::Press {
                    // Dragging right swings the camera left
                    let delta = (cursor - self.last_cursor) * DRAG_ANGLE_PER_PIXEL;
                    self.orbit(-delta.x, delta.y);
                }
                self.last_cursor = cursor;
            }
            WindowEvent::Scroll(_, offset, _) => {
                if offset > 0.0 {
                    self.zoom(SCROLL_ZOOM_RATIO.recip());
                } else if offset < 0.0 {
                    self.zoom(SCROLL_ZOOM_RATIO);
                }
            }
            WindowEvent::FramebufferSize(w, h) if h > 0 => {
                self.aspect = w as f32 / h as f32;
            }
            WindowEvent::Key(KEY_ORBIT_UP, Action::Press, _) => self.orbit(0.0, KEY_ANGLE_STEP),
            WindowEvent::Key(KEY_ORBIT_DOWN, Action::Press, _) => self.orbit(0.0, -KEY_ANGLE_STEP),
            WindowEvent::Key(KEY_ORBIT_LEFT, Action::Press, _) => self.orbit(-KEY_ANGLE_STEP, 0.0),
            WindowEvent::Key(KEY_ORBIT_RIGHT, Action::Press, _) => self.orbit(KEY_ANGLE_STEP, 0.0),
            WindowEvent::Key(KEY_ZOOM_IN, Action::Press, _) => self.zoom(KEY_ZOOM_RATIO.recip()),
            WindowEvent::Key(KEY_ZOOM_OUT, Action::Press, _) => self.zoom(KEY_ZOOM_RATIO),
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        Point3::from(Vector3::new(cos_el * cos_az, cos_el * sin_az, sin_el) * self.distance)
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::z())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection().into_inner() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        let projection = self.projection();
        (projection.znear(), projection.zfar())
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _pass: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection().into_inner());
        view.upload(&self.view_matrix());
    }
}
