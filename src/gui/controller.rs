use std::time::Instant;

use kiss3d::event::{Action, Event, Key, WindowEvent};

use super::view::View;
use crate::config::SpeedPreset;
use crate::math::integrator::Integrator;

// Key config, all in one place
const KEY_PREV_FOCUS: Key = Key::Q;
const KEY_NEXT_FOCUS: Key = Key::E;
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_TOGGLE_PAUSE: Key = Key::Space;
const KEY_TOGGLE_INTEGRATOR: Key = Key::I;
const KEY_TOGGLE_TRAILS: Key = Key::T;
const KEY_TOGGLE_GRID: Key = Key::G;
const KEY_TOGGLE_AXES: Key = Key::X;

/// User-facing simulation knobs: how fast, with which integrator, and
/// whether to run at all.
pub struct Controller {
    speed: SpeedPreset,
    integrator: Integrator,
    paused: bool,
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: u128,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: u128) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            window_size_millis,
            previous_fps: 0.0,
        }
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    pub fn increment(&mut self) {
        self.counter += 1;

        let elapsed = self.instant.elapsed().as_millis();
        if elapsed > self.window_size_millis {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed as f64;
            self.instant = Instant::now();
            self.counter = 0;
        }
    }
}

impl Controller {
    pub fn new(speed: SpeedPreset, integrator: Integrator) -> Self {
        Controller {
            speed,
            integrator,
            paused: false,
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn process_event(&mut self, event: Event, view: &mut View) {
        match event.value {
            WindowEvent::Key(KEY_NEXT_FOCUS, Action::Press, _) => view.focus_next(),
            WindowEvent::Key(KEY_PREV_FOCUS, Action::Press, _) => view.focus_prev(),
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _) => {
                self.speed = self.speed.faster();
                log::info!("Speed is {}", self.speed);
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _) => {
                self.speed = self.speed.slower();
                log::info!("Speed is {}", self.speed);
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.paused = !self.paused;
            }
            WindowEvent::Key(KEY_TOGGLE_INTEGRATOR, Action::Press, _) => {
                self.integrator = self.integrator.toggled();
                log::info!("Integrating with {}", self.integrator);
            }
            WindowEvent::Key(KEY_TOGGLE_TRAILS, Action::Press, _) => view.toggle_trails(),
            WindowEvent::Key(KEY_TOGGLE_GRID, Action::Press, _) => view.toggle_grid(),
            WindowEvent::Key(KEY_TOGGLE_AXES, Action::Press, _) => view.toggle_axes(),
            _ => {}
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn speed(&self) -> SpeedPreset {
        self.speed
    }

    pub fn integrator(&self) -> Integrator {
        self.integrator
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.increment()
    }
}
