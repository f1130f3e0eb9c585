//! # Environment Contract
//!
//! The `reset`/`step` interface shared by every environment in this crate.

use std::collections::BTreeMap;

use crate::error::EnvError;
use crate::spaces::Space;

/// Auxiliary step information. The playground environments always return it
/// empty.
pub type Info = BTreeMap<String, serde_json::Value>;

/// `(observation, reward, done, info)`
pub type StepResult<O> = (O, f32, bool, Info);

/// Reinforcement learning environment trait.
///
/// Modelled on the gym contract: [`reset`] starts an episode and returns its
/// first observation, [`step`] applies one action and returns the next
/// observation, the scalar reward, whether the episode ended, and an info
/// mapping. Callers reset again once `done` is reported.
///
/// [`reset`]: Env::reset
/// [`step`]: Env::step
pub trait Env {
    type Obs;
    type Act;

    /// Reset to the start of a new episode and return the first observation.
    fn reset(&mut self) -> Result<Self::Obs, EnvError>;

    /// Advance the environment by one action.
    fn step(&mut self, action: Self::Act) -> Result<StepResult<Self::Obs>, EnvError>;

    fn action_space(&self) -> &Space;

    fn observation_space(&self) -> &Space;
}
