use std::collections::HashMap;

use anyhow::Result;
use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::controller::Controller;
use self::view::View;
use crate::config::ScenarioConfig;

mod camera;
mod controller;
mod renderer;
mod view;

/// Frame rate of the viewer. Each frame advances the system by one speed
/// preset's worth of ticks.
pub const FRAMES_PER_SECOND: u64 = 30;

pub struct Simulation {
    view: View,
    controller: Controller,
}

impl Simulation {
    pub fn new(config: &ScenarioConfig, window: &mut Window) -> Result<Self> {
        let (system, ids) = config.build_system()?;

        let mut colors = HashMap::new();
        for (id, body) in ids.into_iter().zip(&config.bodies) {
            if let Some(color) = body.color()? {
                colors.insert(id, color);
            }
        }

        Ok(Self {
            view: View::new(system, &colors, window),
            controller: Controller::new(config.simulation.speed, config.simulation.integrator),
        })
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        // Process events
        for event in events.iter() {
            self.controller.process_event(event, &mut self.view);
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());
        if !self.controller.is_paused() {
            self.view.update_state(&self.controller);
        }
        self.view.prerender_scene(window, &self.controller);
        self.controller.increment_frame_counter();
    }
}
