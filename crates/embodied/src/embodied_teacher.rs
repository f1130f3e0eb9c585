//! # Embodied Teacher
//!
//! A playground with a second robot of the learner's type, the teacher,
//! placed at its own pose. The teacher demonstrates the task either from a
//! person at the keyboard or from a policy that supplies its controls with
//! every step.
//!
//! In human mode the environment looks exactly like the plain playground
//! from outside and the simulator is slowed to a watchable rate. In policy
//! mode actions and observations come in learner/teacher pairs and the action
//! and observation spaces are dictionaries keyed `learner` and `teacher`.

use physics::World;

use crate::action::{Action, DemoAction};
use crate::agent::{Agent, AgentOptions};
use crate::config::EmbodiedTeacherConfig;
use crate::env::{Env, Info, StepResult};
use crate::error::EnvError;
use crate::keyboard::{KeySource, KeyboardControl, SharedKeys};
use crate::observation::{DemoObservation, Observation};
use crate::playground::PlayGround;
use crate::spaces::Space;
use crate::task::TeacherFeedback;

/// Model name of the teacher robot.
pub const TEACHER_NAME: &str = "teacher";

/// Simulator sub-steps per wall-clock second while a person demonstrates.
pub const HUMAN_DEMO_UPDATE_RATE: u32 = 500;

struct TeacherSpaces {
    control: Space,
    action: Space,
    observation: Space,
}

enum DemoMode {
    Human(KeyboardControl),
    Policy(TeacherSpaces),
}

pub struct EmbodiedTeacher {
    config: EmbodiedTeacherConfig,
    base: PlayGround,
    teacher_agent: Agent,
    mode: DemoMode,
    action_space: Space,
    observation_space: Space,
}

impl EmbodiedTeacher {
    /// Human demonstrations read a [`SharedKeys`] nobody writes to; use
    /// [`EmbodiedTeacher::with_key_source`] to attach a real keyboard.
    ///
    /// # Errors
    ///
    /// See [`EmbodiedTeacher::with_key_source`].
    pub fn new(config: EmbodiedTeacherConfig) -> Result<Self, EnvError> {
        Self::with_key_source(config, SharedKeys::new())
    }

    /// Build the environment. `keys` drives the teacher when
    /// `demo_by_human` is set and is dropped otherwise.
    ///
    /// # Errors
    ///
    /// Fails if the playground cannot be built, the teacher pose does not
    /// parse, or the teacher configuration names joints the robot lacks. In
    /// human mode the keyboard layout must match the teacher's joints.
    pub fn with_key_source(
        mut config: EmbodiedTeacherConfig,
        keys: impl KeySource + 'static,
    ) -> Result<Self, EnvError> {
        if config.demo_by_human {
            config.playground.real_time_update_rate = HUMAN_DEMO_UPDATE_RATE;
        }
        let mut base = PlayGround::new(config.playground.clone())?;

        let agent_type = config.playground.agent_type.clone();
        base.world_mut()
            .insert_model_at(&agent_type, TEACHER_NAME, &config.initial_teacher_pose)?;
        let teacher_config = config
            .teacher_config
            .clone()
            .unwrap_or_else(|| base.agent().config().clone());
        let teacher_agent = Agent::new(
            base.world(),
            &agent_type,
            TEACHER_NAME,
            teacher_config,
            AgentOptions {
                with_language: false,
                use_image_observation: config.teacher_use_image_observation,
                image_with_internal_states: config.teacher_image_with_internal_states,
                resized_image_size: config.playground.resized_image_size,
                vocab_sequence_length: config.playground.vocab_sequence_length,
                vocab_size: base.teacher().vocab_size(),
            },
        )?;

        let (mode, action_space, observation_space) = if config.demo_by_human {
            let expected = teacher_agent.control_len();
            let actual = KeyboardControl::action_len(&agent_type)?;
            if actual != expected {
                return Err(EnvError::ControlLength {
                    agent: TEACHER_NAME.to_owned(),
                    expected,
                    actual,
                });
            }
            (
                DemoMode::Human(KeyboardControl::new(keys)),
                base.action_space().clone(),
                base.observation_space().clone(),
            )
        } else {
            let spaces = TeacherSpaces {
                control: teacher_agent.get_control_space(),
                action: teacher_agent.get_action_space(),
                observation: teacher_agent.get_observation_space(base.world(), base.teacher())?,
            };
            let action_space = Space::dict([
                ("learner", base.action_space().clone()),
                ("teacher", spaces.action.clone()),
            ]);
            let observation_space = Space::dict([
                ("learner", base.observation_space().clone()),
                ("teacher", spaces.observation.clone()),
            ]);
            (DemoMode::Policy(spaces), action_space, observation_space)
        };

        tracing::info!(
            agent_type = %agent_type,
            teacher_pose = %config.initial_teacher_pose,
            demo_by_human = config.demo_by_human,
            "embodied teacher ready"
        );

        Ok(Self {
            config,
            base,
            teacher_agent,
            mode,
            action_space,
            observation_space,
        })
    }

    pub fn seed(&mut self, seed: u64) {
        self.base.seed(seed);
    }

    #[must_use]
    pub fn config(&self) -> &EmbodiedTeacherConfig {
        &self.config
    }

    #[must_use]
    pub fn is_human_demo(&self) -> bool {
        matches!(self.mode, DemoMode::Human(_))
    }

    #[must_use]
    pub fn world(&self) -> &World {
        self.base.world()
    }

    /// The underlying single-learner environment.
    #[must_use]
    pub fn playground(&self) -> &PlayGround {
        &self.base
    }

    #[must_use]
    pub fn learner(&self) -> &Agent {
        self.base.agent()
    }

    #[must_use]
    pub fn teacher_agent(&self) -> &Agent {
        &self.teacher_agent
    }

    #[must_use]
    pub fn control_space(&self) -> &Space {
        self.base.control_space()
    }

    /// Only defined when a policy drives the teacher.
    #[must_use]
    pub fn teacher_control_space(&self) -> Option<&Space> {
        match &self.mode {
            DemoMode::Policy(spaces) => Some(&spaces.control),
            DemoMode::Human(_) => None,
        }
    }

    #[must_use]
    pub fn teacher_action_space(&self) -> Option<&Space> {
        match &self.mode {
            DemoMode::Policy(spaces) => Some(&spaces.action),
            DemoMode::Human(_) => None,
        }
    }

    #[must_use]
    pub fn teacher_observation_space(&self) -> Option<&Space> {
        match &self.mode {
            DemoMode::Policy(spaces) => Some(&spaces.observation),
            DemoMode::Human(_) => None,
        }
    }

    #[must_use]
    pub fn sub_steps(&self) -> usize {
        self.base.sub_steps()
    }

    #[must_use]
    pub fn steps_in_this_episode(&self) -> usize {
        self.base.steps_in_this_episode()
    }

    #[must_use]
    pub fn cum_reward(&self) -> f32 {
        self.base.cum_reward()
    }

    #[must_use]
    pub fn last_feedback(&self) -> &TeacherFeedback {
        self.base.last_feedback()
    }

    /// Advance both robots by one environment step. The teacher's controls
    /// are applied after the learner's and before the physics tick. Both
    /// actions are checked first; on error nothing moves.
    ///
    /// # Errors
    ///
    /// Fails if either action does not fit its robot or the learner's
    /// sentence cannot be decoded.
    pub fn step_with_teacher_action(
        &mut self,
        teacher_action: &[f32],
        agent_action: Action,
    ) -> Result<StepResult<Observation>, EnvError> {
        let learner = self.base.prepare(agent_action)?;
        self.base
            .step_prepared(learner, &[(&self.teacher_agent, teacher_action)])
    }

    fn keyboard_action(&mut self) -> Result<Vec<f32>, EnvError> {
        match &mut self.mode {
            DemoMode::Human(keyboard) => keyboard.get_agent_actions(self.teacher_agent.agent_type()),
            DemoMode::Policy(_) => Err(EnvError::ActionMismatch(
                "the teacher is driven by a policy, expected learner and teacher actions",
            )),
        }
    }
}

impl Env for EmbodiedTeacher {
    type Obs = DemoObservation;
    type Act = DemoAction;

    fn reset(&mut self) -> Result<DemoObservation, EnvError> {
        let obs = self.base.reset()?;
        self.teacher_agent.reset(self.base.world_mut())?;
        match &mut self.mode {
            DemoMode::Human(keyboard) => {
                keyboard.reset();
                Ok(DemoObservation::Plain(obs))
            }
            DemoMode::Policy(_) => Ok(DemoObservation::Paired {
                learner: obs.clone(),
                teacher: obs,
            }),
        }
    }

    fn step(&mut self, action: DemoAction) -> Result<StepResult<DemoObservation>, EnvError> {
        match (self.is_human_demo(), action) {
            (true, DemoAction::Plain(learner)) => {
                let learner = self.base.prepare(learner)?;
                // Polled only once the learner action is known to be valid.
                let teacher_action = self.keyboard_action()?;
                let (obs, reward, done, info) = self
                    .base
                    .step_prepared(learner, &[(&self.teacher_agent, teacher_action.as_slice())])?;
                Ok((DemoObservation::Plain(obs), reward, done, info))
            }
            (false, DemoAction::Paired { learner, teacher }) => {
                let (obs, reward, done, _) = self.step_with_teacher_action(&teacher, learner)?;
                let teacher_obs = self
                    .teacher_agent
                    .get_observation(self.base.world(), self.base.teacher(), "")?;
                Ok((
                    DemoObservation::Paired {
                        learner: obs,
                        teacher: teacher_obs,
                    },
                    reward,
                    done,
                    Info::new(),
                ))
            }
            (true, DemoAction::Paired { .. }) => Err(EnvError::ActionMismatch(
                "the teacher is driven from the keyboard, expected the learner action alone",
            )),
            (false, DemoAction::Plain(_)) => Err(EnvError::ActionMismatch(
                "the teacher is driven by a policy, expected learner and teacher actions",
            )),
        }
    }

    fn action_space(&self) -> &Space {
        &self.action_space
    }

    fn observation_space(&self) -> &Space {
        &self.observation_space
    }
}
