//! # Tasks
//!
//! A task watches the shared world each step and decides the reward, whether
//! the episode is over, and what the teacher says. Tasks are bound to the
//! learner's model; the model passed to
//! [`Task::task_specific_observation`] may be any agent so the teacher's own
//! proxy can observe the task from its point of view.

use physics::{ModelId, Pose, Vec3, World};

use crate::config::GoalTaskConfig;
use crate::error::EnvError;

/// Per-step output of the teacher.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TeacherFeedback {
    pub reward: f32,
    pub done: bool,
    /// What the teacher says back, possibly empty.
    pub sentence: String,
    pub success: bool,
}

pub trait Task {
    fn name(&self) -> &str;

    /// Every sentence this task can produce, used to build the vocabulary.
    fn vocab(&self) -> Vec<String>;

    /// Prepare a new episode. Called after the world itself was reset.
    fn reset(&mut self, world: &mut World, agent: ModelId, rng: &mut fastrand::Rng);

    /// Judge the current world state given what the learner said.
    fn run(&mut self, world: &World, agent: ModelId, sentence: &str) -> TeacherFeedback;

    fn task_specific_observation(&self, world: &World, agent: ModelId) -> Vec<f32>;
}

/// Reach a goal object placed at random on the ground.
pub struct GoalTask {
    config: GoalTaskConfig,
    goal: ModelId,
    steps: usize,
    initial_distance: f32,
}

/// Placement attempts before falling back to a fixed offset from the agent.
const MAX_PLACEMENT_TRIES: usize = 100;

impl GoalTask {
    /// Binds to the model named `config.goal_name`, inserting a goal model if
    /// the world has none.
    ///
    /// # Errors
    ///
    /// Propagates world errors from inserting the goal.
    pub fn new(config: GoalTaskConfig, world: &mut World) -> Result<Self, EnvError> {
        let goal = match world.model_id(&config.goal_name) {
            Ok(id) => id,
            Err(_) => world.insert_model("goal", &config.goal_name, Pose::at(5.0, 0.0, 0.0))?,
        };
        Ok(Self {
            config,
            goal,
            steps: 0,
            initial_distance: 0.0,
        })
    }

    #[must_use]
    pub fn goal(&self) -> ModelId {
        self.goal
    }

    fn instruction(&self) -> String {
        format!("go to {}", self.config.goal_name)
    }

    fn distance(&self, world: &World, agent: ModelId) -> f32 {
        world
            .model(agent)
            .pose
            .position
            .planar_distance(world.model(self.goal).pose.position)
    }
}

impl Task for GoalTask {
    fn name(&self) -> &str {
        "goal"
    }

    fn vocab(&self) -> Vec<String> {
        vec![
            self.instruction(),
            "well done".to_owned(),
            "failed".to_owned(),
        ]
    }

    fn reset(&mut self, world: &mut World, agent: ModelId, rng: &mut fastrand::Rng) {
        let agent_pos = world.model(agent).pose.position;
        let range = self.config.random_range;
        let min_distance = self.config.success_distance_thresh;

        let placement = (0..MAX_PLACEMENT_TRIES)
            .map(|_| {
                let x = (rng.f32() * 2.0 - 1.0) * range;
                let y = (rng.f32() * 2.0 - 1.0) * range;
                Vec3::new(x, y, 0.0)
            })
            .find(|p| p.planar_distance(agent_pos) > min_distance)
            .unwrap_or_else(|| Vec3::new(agent_pos.x + 2.0 * min_distance.max(0.5), agent_pos.y, 0.0));

        world.set_model_pose(self.goal, Pose::new(placement, Vec3::ZERO));
        self.steps = 0;
        self.initial_distance = self.distance(world, agent);
        tracing::debug!(
            goal = %world.model(self.goal).pose,
            distance = self.initial_distance,
            "placed goal"
        );
    }

    fn run(&mut self, world: &World, agent: ModelId, _sentence: &str) -> TeacherFeedback {
        self.steps += 1;
        let dist = self.distance(world, agent);
        if dist < self.config.success_distance_thresh {
            TeacherFeedback {
                reward: 1.0,
                done: true,
                sentence: "well done".to_owned(),
                success: true,
            }
        } else if dist > self.initial_distance + self.config.fail_distance_thresh
            || self.steps >= self.config.max_steps
        {
            TeacherFeedback {
                reward: -1.0,
                done: true,
                sentence: "failed".to_owned(),
                success: false,
            }
        } else {
            TeacherFeedback {
                sentence: self.instruction(),
                ..TeacherFeedback::default()
            }
        }
    }

    /// Goal position, agent pose and agent base velocity.
    fn task_specific_observation(&self, world: &World, agent: ModelId) -> Vec<f32> {
        let goal = world.model(self.goal).pose.position.to_array();
        let model = world.model(agent);
        goal.into_iter()
            .chain(model.pose.to_array())
            .chain(model.linear_velocity.to_array())
            .collect()
    }
}
