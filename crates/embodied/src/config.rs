//! # Configuration
//!
//! Environment settings are plain serde structs so they can be loaded from a
//! JSON file and overridden field by field. Every field has a default, and
//! the defaults describe a youbot chasing a goal without language.
//!
//! Per-robot control settings live in an embedded `agent_cfg.json` keyed by
//! agent type, mirroring the model names of the physics catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EnvError;

const AGENT_CFG_JSON: &str = include_str!("agent_cfg.json");

fn default_camera_fov() -> f32 {
    1.047
}

/// Control and sensing configuration of one robot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Joints driven by the action vector, in action order.
    pub control_joints: Vec<String>,
    /// Symmetric bound on every joint velocity command.
    pub control_limit: f32,
    /// Default simulator sub-step for this robot, in seconds.
    pub max_step_size: f32,
    /// Native camera `[width, height]` before resizing.
    pub camera_resolution: [u32; 2],
    /// Horizontal field of view, radians.
    #[serde(default = "default_camera_fov")]
    pub camera_fov: f32,
}

impl AgentConfig {
    /// All configurations shipped with the crate.
    ///
    /// # Errors
    ///
    /// Fails only if the embedded JSON is malformed.
    pub fn catalog() -> Result<BTreeMap<String, AgentConfig>, EnvError> {
        Ok(serde_json::from_str(AGENT_CFG_JSON)?)
    }

    /// # Errors
    ///
    /// Returns [`EnvError::UnknownAgentType`] if no configuration exists.
    pub fn for_agent_type(agent_type: &str) -> Result<Self, EnvError> {
        Self::catalog()?
            .remove(agent_type)
            .ok_or_else(|| EnvError::UnknownAgentType(agent_type.to_owned()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalTaskConfig {
    pub goal_name: String,
    pub success_distance_thresh: f32,
    /// Fail once the agent is this much farther than its starting distance.
    pub fail_distance_thresh: f32,
    /// Goals are placed within this distance of the origin on each axis.
    pub random_range: f32,
    pub max_steps: usize,
}

impl Default for GoalTaskConfig {
    fn default() -> Self {
        Self {
            goal_name: "goal".to_owned(),
            success_distance_thresh: 0.5,
            fail_distance_thresh: 3.0,
            random_range: 10.0,
            max_steps: 500,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskConfig {
    Goal(GoalTaskConfig),
}

/// Settings of the single-agent [`crate::PlayGround`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayGroundConfig {
    /// Must name a model in both the physics catalog and `agent_cfg.json`.
    pub agent_type: String,
    pub tasks: Vec<TaskConfig>,
    /// Adds a sentence to actions and observations.
    pub with_language: bool,
    pub use_image_observation: bool,
    /// With image observations, also report joint states.
    pub image_with_internal_states: bool,
    /// Overrides the agent's `max_step_size` when set.
    pub world_time_precision: Option<f32>,
    /// Simulated seconds per environment step.
    pub step_time: f32,
    /// Sub-steps per wall-clock second, `0` for no limit.
    pub real_time_update_rate: u32,
    pub port: Option<u16>,
    /// Weight of the mean squared control penalty.
    pub action_cost: f32,
    /// `(width, height)`; `None` keeps the camera resolution.
    pub resized_image_size: Option<(u32, u32)>,
    pub vocab_sequence_length: usize,
    pub seed: Option<u64>,
}

impl Default for PlayGroundConfig {
    fn default() -> Self {
        Self {
            agent_type: "youbot_noplugin".to_owned(),
            tasks: vec![TaskConfig::Goal(GoalTaskConfig::default())],
            with_language: false,
            use_image_observation: false,
            image_with_internal_states: false,
            world_time_precision: None,
            step_time: 0.1,
            real_time_update_rate: 0,
            port: None,
            action_cost: 0.0,
            resized_image_size: Some((64, 64)),
            vocab_sequence_length: 20,
            seed: None,
        }
    }
}

/// Settings of [`crate::EmbodiedTeacher`]: the playground plus the teacher.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbodiedTeacherConfig {
    #[serde(flatten)]
    pub playground: PlayGroundConfig,
    pub teacher_use_image_observation: bool,
    pub teacher_image_with_internal_states: bool,
    /// Teacher control settings; the learner's are used when absent.
    pub teacher_config: Option<AgentConfig>,
    /// `"x y z roll pitch yaw"`
    pub initial_teacher_pose: String,
    /// Drive the teacher from the keyboard instead of a policy.
    pub demo_by_human: bool,
}

impl Default for EmbodiedTeacherConfig {
    fn default() -> Self {
        Self {
            playground: PlayGroundConfig::default(),
            teacher_use_image_observation: false,
            teacher_image_with_internal_states: false,
            teacher_config: None,
            initial_teacher_pose: "0 -2 0 0 0 0".to_owned(),
            demo_by_human: false,
        }
    }
}

impl EmbodiedTeacherConfig {
    /// # Errors
    ///
    /// Returns [`EnvError::Config`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, EnvError> {
        Ok(serde_json::from_str(json)?)
    }
}
