//! # Shared World
//!
//! The [`World`] owns every simulated model. Agents never hold copies of
//! model state: they keep a [`ModelId`] and go through the world's mutation
//! entry points ([`World::apply_action`], [`World::step`]) so every observer
//! sees the same state.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::catalog::ModelSpec;
use crate::error::WorldError;
use crate::integrator::{integrate_base, integrate_joints};
use crate::types::{Pose, Vec3};

/// Handle to a model inside a [`World`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelId(pub(crate) usize);

/// Simulator settings fixed at world creation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Seconds advanced by a single sub-step.
    pub time_precision: f32,
    /// Maximum sub-steps per wall-clock second; `0` runs unthrottled.
    pub real_time_update_rate: u32,
    /// Identifies this simulator instance when several run side by side.
    pub port: Option<u16>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            time_precision: 0.001,
            real_time_update_rate: 0,
            port: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Model {
    pub name: String,
    pub spec: ModelSpec,
    pub pose: Pose,
    pub(crate) initial_pose: Pose,
    /// World-frame base velocity.
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub joint_positions: Vec<f32>,
    pub joint_velocities: Vec<f32>,
    pub(crate) commands: Vec<f32>,
}

impl Model {
    pub(crate) fn new(name: String, spec: ModelSpec, pose: Pose) -> Self {
        let n = spec.joints.len();
        Self {
            name,
            spec,
            pose,
            initial_pose: pose,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            joint_positions: vec![0.0; n],
            joint_velocities: vec![0.0; n],
            commands: vec![0.0; n],
        }
    }

    /// Velocity targets currently applied to the joints.
    #[must_use]
    pub fn commands(&self) -> &[f32] {
        &self.commands
    }

    fn reset(&mut self) {
        self.pose = self.initial_pose;
        self.linear_velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.joint_positions.iter_mut().for_each(|p| *p = 0.0);
        self.joint_velocities.iter_mut().for_each(|v| *v = 0.0);
        self.commands.iter_mut().for_each(|c| *c = 0.0);
    }
}

pub struct World {
    pub(crate) config: WorldConfig,
    pub(crate) models: Vec<Model>,
    pub(crate) names: HashMap<String, ModelId>,
    sim_time: f64,
    iterations: u64,
}

impl World {
    /// Create an empty world.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidTimePrecision`] when the sub-step length is
    /// not a positive finite number.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        if !(config.time_precision.is_finite() && config.time_precision > 0.0) {
            return Err(WorldError::InvalidTimePrecision(config.time_precision));
        }
        tracing::info!(
            port = ?config.port,
            time_precision = config.time_precision,
            real_time_update_rate = config.real_time_update_rate,
            "world created"
        );
        Ok(Self {
            config,
            models: Vec::new(),
            names: HashMap::new(),
            sim_time: 0.0,
            iterations: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[must_use]
    pub fn time_precision(&self) -> f32 {
        self.config.time_precision
    }

    #[must_use]
    pub fn real_time_update_rate(&self) -> u32 {
        self.config.real_time_update_rate
    }

    pub fn set_real_time_update_rate(&mut self, rate: u32) {
        self.config.real_time_update_rate = rate;
    }

    /// Simulated seconds since the last reset.
    #[must_use]
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Sub-steps executed since the last reset.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Resolve a model name to its handle.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownModel`] when no model has that name.
    pub fn model_id(&self, name: &str) -> Result<ModelId, WorldError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| WorldError::UnknownModel(name.to_owned()))
    }

    #[must_use]
    pub fn model(&self, id: ModelId) -> &Model {
        &self.models[id.0]
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }

    /// Teleport a model. The pose it returns to on [`World::reset`] is unchanged.
    pub fn set_model_pose(&mut self, id: ModelId, pose: Pose) {
        let model = &mut self.models[id.0];
        model.pose = pose;
        model.linear_velocity = Vec3::ZERO;
        model.angular_velocity = Vec3::ZERO;
    }

    /// Set the velocity targets of every joint of a model, in joint order.
    /// Targets stay in effect until replaced.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ControlLength`] when `commands` does not have one
    /// entry per joint.
    pub fn apply_action(&mut self, id: ModelId, commands: &[f32]) -> Result<(), WorldError> {
        let model = &mut self.models[id.0];
        if commands.len() != model.commands.len() {
            return Err(WorldError::ControlLength {
                model: model.name.clone(),
                expected: model.commands.len(),
                actual: commands.len(),
            });
        }
        model.commands.copy_from_slice(commands);
        Ok(())
    }

    /// Advance the simulation by `substeps` ticks of `time_precision` each.
    ///
    /// With a non-zero real-time update rate the call blocks until the wall
    /// clock has caught up with the requested number of ticks.
    pub fn step(&mut self, substeps: usize) {
        let started = Instant::now();
        let dt = self.config.time_precision;
        for _ in 0..substeps {
            for model in &mut self.models {
                integrate_joints(model, dt);
                integrate_base(model, dt);
            }
            self.sim_time += f64::from(dt);
            self.iterations += 1;
        }

        let rate = self.config.real_time_update_rate;
        if rate > 0 {
            let budget = Duration::from_secs_f64(substeps as f64 / f64::from(rate));
            let elapsed = started.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }
    }

    /// Put every model back at its inserted pose and clear all motion.
    pub fn reset(&mut self) {
        for model in &mut self.models {
            model.reset();
        }
        self.sim_time = 0.0;
        self.iterations = 0;
    }
}
