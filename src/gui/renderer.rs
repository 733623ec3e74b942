use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::{Point3, Vector3};

const GRID_HALF_WIDTH: i32 = 20;
const GRID_COLOR: [f32; 3] = [0.35, 0.35, 0.35];

/// Line overlays drawn on top of the body spheres: the ecliptic grid, the
/// coordinate axes and the trajectory trails. Everything is queued per
/// frame and flushed by [Renderer::render].
pub struct OverlayRenderer {
    lines: LineRenderer,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        OverlayRenderer {
            lines: LineRenderer::new(),
        }
    }

    /// Draws a grid in the z = 0 plane. The spacing is the largest power of
    /// ten below the camera distance, so roughly the same number of lines is
    /// visible at every zoom level; lines fade as the camera backs away from
    /// that spacing.
    pub fn draw_grid(&mut self, origin: Point3<f32>, camera_distance: f32) {
        let log_distance = camera_distance.max(f32::MIN_POSITIVE).log10();
        let exponent = log_distance.floor();
        let spacing = 10f32.powf(exponent) / 2.0;
        let brightness = 1.0 - 0.7 * (log_distance - exponent);

        let color = Point3::from(Vector3::from(GRID_COLOR) * brightness);
        let extent = spacing * GRID_HALF_WIDTH as f32;
        for i in -GRID_HALF_WIDTH..=GRID_HALF_WIDTH {
            let offset = spacing * i as f32;
            self.lines.draw_line(
                origin + Vector3::new(-extent, offset, 0.0),
                origin + Vector3::new(extent, offset, 0.0),
                color,
            );
            self.lines.draw_line(
                origin + Vector3::new(offset, -extent, 0.0),
                origin + Vector3::new(offset, extent, 0.0),
                color,
            );
        }
    }

    /// Draws the x, y and z axes in red, green and blue.
    pub fn draw_axes(&mut self, origin: Point3<f32>, length: f32) {
        let axes = [
            (Vector3::x(), Point3::new(1.0, 0.0, 0.0)),
            (Vector3::y(), Point3::new(0.0, 1.0, 0.0)),
            (Vector3::z(), Point3::new(0.0, 0.0, 1.0)),
        ];
        for (direction, color) in axes.iter() {
            self.lines
                .draw_line(origin, origin + direction * length, *color);
        }
    }

    /// Draws a polyline through the points, oldest first, fading the older
    /// segments toward black.
    pub fn draw_trail<I>(&mut self, points: I, color: Point3<f32>)
    where
        I: ExactSizeIterator<Item = Point3<f32>>,
    {
        let num_points = points.len();
        let mut previous = None;
        for (i, point) in points.enumerate() {
            if let Some(previous) = previous {
                let fade = (i as f32 / num_points as f32).max(0.2);
                self.lines.draw_line(previous, point, color * fade);
            }
            previous = Some(point);
        }
    }
}

impl Renderer for OverlayRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        self.lines.render(pass, camera);
    }
}
