//! # Playground
//!
//! Single-learner environment: one robot and a goal in a flat world, judged
//! by the configured tasks. [`crate::EmbodiedTeacher`] builds on top of it and
//! reuses its step routine with a second robot actuated in the same tick.

use physics::{Pose, World, WorldConfig};

use crate::action::{Action, Sentence};
use crate::agent::{Agent, AgentOptions};
use crate::config::{AgentConfig, PlayGroundConfig};
use crate::env::{Env, Info, StepResult};
use crate::error::EnvError;
use crate::observation::Observation;
use crate::spaces::Space;
use crate::task::TeacherFeedback;
use crate::teacher::Teacher;

/// Model name of the learner robot.
pub const AGENT_NAME: &str = "agent";

pub struct PlayGround {
    config: PlayGroundConfig,
    world: World,
    teacher: Teacher,
    agent: Agent,
    sub_steps: usize,
    control_space: Space,
    action_space: Space,
    observation_space: Space,
    steps_in_this_episode: usize,
    cum_reward: f32,
    last_feedback: TeacherFeedback,
}

impl PlayGround {
    /// Build the world, the learner and its tasks.
    ///
    /// # Errors
    ///
    /// Fails for agent types unknown to the simulator or the agent
    /// configuration, and for invalid timing parameters.
    pub fn new(config: PlayGroundConfig) -> Result<Self, EnvError> {
        let agent_config = AgentConfig::for_agent_type(&config.agent_type)?;
        let time_precision = config
            .world_time_precision
            .unwrap_or(agent_config.max_step_size);
        let mut world = World::new(WorldConfig {
            time_precision,
            real_time_update_rate: config.real_time_update_rate,
            port: config.port,
        })?;
        let sub_steps = ((config.step_time / time_precision).round() as usize).max(1);

        world.insert_model(&config.agent_type, AGENT_NAME, Pose::default())?;
        let teacher = Teacher::from_configs(&config.tasks, &mut world, config.seed)?;
        let agent = Agent::new(
            &world,
            &config.agent_type,
            AGENT_NAME,
            agent_config,
            AgentOptions {
                with_language: config.with_language,
                use_image_observation: config.use_image_observation,
                image_with_internal_states: config.image_with_internal_states,
                resized_image_size: config.resized_image_size,
                vocab_sequence_length: config.vocab_sequence_length,
                vocab_size: teacher.vocab_size(),
            },
        )?;

        let control_space = agent.get_control_space();
        let action_space = agent.get_action_space();
        let observation_space = agent.get_observation_space(&world, &teacher)?;

        tracing::info!(
            agent_type = %config.agent_type,
            sub_steps,
            with_language = config.with_language,
            vocab_size = teacher.vocab_size(),
            "playground ready"
        );

        Ok(Self {
            config,
            world,
            teacher,
            agent,
            sub_steps,
            control_space,
            action_space,
            observation_space,
            steps_in_this_episode: 0,
            cum_reward: 0.0,
            last_feedback: TeacherFeedback::default(),
        })
    }

    /// Reseed the task randomness.
    pub fn seed(&mut self, seed: u64) {
        self.teacher.seed(seed);
    }

    #[must_use]
    pub fn config(&self) -> &PlayGroundConfig {
        &self.config
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[must_use]
    pub fn teacher(&self) -> &Teacher {
        &self.teacher
    }

    #[must_use]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Simulator sub-steps per environment step.
    #[must_use]
    pub fn sub_steps(&self) -> usize {
        self.sub_steps
    }

    #[must_use]
    pub fn control_space(&self) -> &Space {
        &self.control_space
    }

    #[must_use]
    pub fn steps_in_this_episode(&self) -> usize {
        self.steps_in_this_episode
    }

    /// Sum of rewards since the last reset.
    #[must_use]
    pub fn cum_reward(&self) -> f32 {
        self.cum_reward
    }

    /// Feedback from the most recent `teach` call, before action costs.
    #[must_use]
    pub fn last_feedback(&self) -> &TeacherFeedback {
        &self.last_feedback
    }

    /// Split a learner action into the sentence it carries and its controls,
    /// checking both against this environment.
    ///
    /// # Errors
    ///
    /// Fails if the action kind does not match the language setting, the
    /// sentence does not decode, or the controls have the wrong length.
    pub(crate) fn prepare(&self, action: Action) -> Result<PreparedAction, EnvError> {
        let (sentence, controls) = match (self.config.with_language, action) {
            (true, Action::Language { control, sentence }) => {
                let sentence = match sentence {
                    Sentence::Raw(s) => s,
                    Sentence::Encoded(seq) => self.teacher.sequence_to_sentence(&seq)?,
                };
                (sentence, control)
            }
            (false, Action::Control(control)) => (String::new(), control),
            (true, Action::Control(_)) => {
                return Err(EnvError::ActionMismatch(
                    "language is enabled, expected controls and a sentence",
                ))
            }
            (false, Action::Language { .. }) => {
                return Err(EnvError::ActionMismatch(
                    "language is disabled, expected controls only",
                ))
            }
        };
        self.agent.check_controls(&controls)?;
        Ok(PreparedAction { sentence, controls })
    }

    /// One environment step. Every robot in `others` is commanded after the
    /// learner and before the physics tick, so all commands act over the same
    /// simulated interval. All controls are checked before any is applied: a
    /// rejected step leaves the world and the episode counters untouched.
    pub(crate) fn step_prepared(
        &mut self,
        action: PreparedAction,
        others: &[(&Agent, &[f32])],
    ) -> Result<StepResult<Observation>, EnvError> {
        for (agent, controls) in others {
            agent.check_controls(controls)?;
        }
        let PreparedAction { sentence, controls } = action;

        self.agent.take_action(&mut self.world, &controls)?;
        for (agent, controls) in others {
            agent.take_action(&mut self.world, controls)?;
        }
        self.world.step(self.sub_steps);

        let feedback = self.teacher.teach(&self.world, self.agent.id(), &sentence);
        let obs = self
            .agent
            .get_observation(&self.world, &self.teacher, &feedback.sentence)?;
        self.steps_in_this_episode += 1;

        let reward = feedback.reward - self.config.action_cost * mean_square(&controls);
        self.cum_reward += reward;
        let done = feedback.done;
        if done {
            tracing::debug!(
                cum_reward = self.cum_reward,
                steps = self.steps_in_this_episode,
                success = feedback.success,
                "episode ends"
            );
        }
        self.last_feedback = feedback;
        Ok((obs, reward, done, Info::new()))
    }
}

/// A learner action that passed validation.
pub(crate) struct PreparedAction {
    sentence: String,
    controls: Vec<f32>,
}

fn mean_square(controls: &[f32]) -> f32 {
    if controls.is_empty() {
        return 0.0;
    }
    controls.iter().map(|c| c * c).sum::<f32>() / controls.len() as f32
}

impl Env for PlayGround {
    type Obs = Observation;
    type Act = Action;

    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.world.reset();
        self.agent.reset(&mut self.world)?;
        self.teacher.reset(&mut self.world, self.agent.id());
        self.steps_in_this_episode = 0;
        self.cum_reward = 0.0;
        self.last_feedback = self.teacher.teach(&self.world, self.agent.id(), "");
        self.agent
            .get_observation(&self.world, &self.teacher, &self.last_feedback.sentence)
    }

    fn step(&mut self, action: Action) -> Result<StepResult<Observation>, EnvError> {
        let action = self.prepare(action)?;
        self.step_prepared(action, &[])
    }

    fn action_space(&self) -> &Space {
        &self.action_space
    }

    fn observation_space(&self) -> &Space {
        &self.observation_space
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use physics::ModelId;

    use super::*;
    use crate::task::Task;

    /// Remembers every sentence the learner says.
    struct Recording(Arc<Mutex<Vec<String>>>);

    impl Task for Recording {
        fn name(&self) -> &str {
            "recording"
        }
        fn vocab(&self) -> Vec<String> {
            vec!["go to goal".to_owned()]
        }
        fn reset(&mut self, _: &mut World, _: ModelId, _: &mut fastrand::Rng) {}
        fn run(&mut self, _: &World, _: ModelId, sentence: &str) -> TeacherFeedback {
            self.0.lock().push(sentence.to_owned());
            TeacherFeedback::default()
        }
        fn task_specific_observation(&self, _: &World, _: ModelId) -> Vec<f32> {
            Vec::new()
        }
    }

    fn pioneer(config: PlayGroundConfig) -> PlayGround {
        PlayGround::new(PlayGroundConfig {
            agent_type: "pioneer2dx_noplugin".into(),
            world_time_precision: Some(0.01),
            seed: Some(11),
            ..config
        })
        .unwrap()
    }

    #[test]
    fn sub_steps_follow_step_time() {
        let env = pioneer(PlayGroundConfig::default());
        assert_eq!(env.sub_steps(), 10);

        let env = PlayGround::new(PlayGroundConfig {
            agent_type: "pioneer2dx_noplugin".into(),
            ..PlayGroundConfig::default()
        })
        .unwrap();
        assert_eq!(env.world().time_precision(), 0.002);
        assert_eq!(env.sub_steps(), 50);
    }

    #[test]
    fn unknown_agent_type_fails() {
        let err = PlayGround::new(PlayGroundConfig {
            agent_type: "goal".into(),
            ..PlayGroundConfig::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, EnvError::UnknownAgentType(_)));
    }

    #[test]
    fn mean_square_of_controls() {
        assert_eq!(mean_square(&[]), 0.0);
        assert!((mean_square(&[1.0, -3.0]) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn action_kind_must_match_language_setting() {
        let mut env = pioneer(PlayGroundConfig::default());
        env.reset().unwrap();
        let err = env
            .step(Action::Language {
                control: vec![0.0, 0.0],
                sentence: "go to goal".into(),
            })
            .unwrap_err();
        assert!(matches!(err, EnvError::ActionMismatch(_)));
    }

    #[test]
    fn action_cost_is_subtracted() {
        let mut env = pioneer(PlayGroundConfig {
            action_cost: 0.5,
            ..PlayGroundConfig::default()
        });
        env.reset().unwrap();
        let (_, reward, _, info) = env.step(Action::Control(vec![2.0, 4.0])).unwrap();
        let expected = env.last_feedback().reward - 0.5 * 10.0;
        assert!((reward - expected).abs() < 1e-6);
        assert!(info.is_empty());
        assert!((env.cum_reward() - reward).abs() < 1e-6);
    }

    #[test]
    fn tasks_hear_the_learner_sentence() {
        let mut env = pioneer(PlayGroundConfig {
            with_language: true,
            vocab_sequence_length: 6,
            ..PlayGroundConfig::default()
        });
        let heard = Arc::new(Mutex::new(Vec::new()));
        env.teacher = Teacher::new(vec![Box::new(Recording(Arc::clone(&heard)))], Some(0));
        env.reset().unwrap();

        env.step(Action::Language {
            control: vec![0.0, 0.0],
            sentence: "go to goal".into(),
        })
        .unwrap();
        let seq = env.teacher.sentence_to_sequence("go to goal", 6).unwrap();
        env.step(Action::Language {
            control: vec![0.0, 0.0],
            sentence: Sentence::Encoded(seq),
        })
        .unwrap();

        assert_eq!(*heard.lock(), vec!["", "go to goal", "go to goal"]);
    }

    #[test]
    fn rejected_step_changes_nothing() {
        let mut env = pioneer(PlayGroundConfig::default());
        env.reset().unwrap();
        let learner = env.prepare(Action::Control(vec![5.0, 5.0])).unwrap();

        let mut world = World::new(WorldConfig::default()).unwrap();
        world.insert_model("pioneer2dx_noplugin", "other", Pose::default()).unwrap();
        let other = Agent::new(
            &world,
            "pioneer2dx_noplugin",
            "other",
            AgentConfig::for_agent_type("pioneer2dx_noplugin").unwrap(),
            AgentOptions {
                with_language: false,
                use_image_observation: false,
                image_with_internal_states: false,
                resized_image_size: None,
                vocab_sequence_length: 0,
                vocab_size: 0,
            },
        )
        .unwrap();
        let err = env.step_prepared(learner, &[(&other, [1.0_f32].as_slice())]).unwrap_err();

        assert!(matches!(err, EnvError::ControlLength { expected: 2, actual: 1, .. }));
        assert!(env.world().model(env.agent().id()).commands().iter().all(|c| *c == 0.0));
        assert_eq!(env.world().iterations(), 0);
        assert_eq!(env.steps_in_this_episode(), 0);
    }
}
