//! # Agent Proxy
//!
//! An [`Agent`] is a view onto one robot in the shared [`World`]. It keeps
//! only the robot's [`ModelId`] and its own sensing configuration, so two
//! agents of the same robot type can observe the same world differently.

use physics::{ModelId, World};

use crate::camera::{self, Camera};
use crate::config::AgentConfig;
use crate::error::EnvError;
use crate::observation::{Observation, ObservationData};
use crate::spaces::{BoxSpace, Space};
use crate::teacher::Teacher;

/// Per-agent observation and action options.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentOptions {
    pub with_language: bool,
    pub use_image_observation: bool,
    pub image_with_internal_states: bool,
    pub resized_image_size: Option<(u32, u32)>,
    pub vocab_sequence_length: usize,
    /// Size of the teacher's vocabulary, bounds the sentence action.
    pub vocab_size: usize,
}

pub struct Agent {
    agent_type: String,
    name: String,
    id: ModelId,
    config: AgentConfig,
    options: AgentOptions,
    /// Model joint index of each control, in action order.
    joints: Vec<usize>,
    model_joints: usize,
    camera: Camera,
}

impl Agent {
    /// Attach to the model called `name`, already inserted in `world`.
    ///
    /// # Errors
    ///
    /// Fails if the model does not exist or lacks a configured control joint.
    pub fn new(
        world: &World,
        agent_type: &str,
        name: &str,
        config: AgentConfig,
        options: AgentOptions,
    ) -> Result<Self, EnvError> {
        let id = world.model_id(name)?;
        let spec = &world.model(id).spec;
        let joints = config
            .control_joints
            .iter()
            .map(|joint| {
                spec.joint_index(joint).ok_or_else(|| EnvError::UnknownJoint {
                    model: name.to_owned(),
                    joint: joint.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let camera = Camera::from_config(&config);
        Ok(Self {
            agent_type: agent_type.to_owned(),
            name: name.to_owned(),
            id,
            model_joints: spec.joints.len(),
            config,
            options,
            joints,
            camera,
        })
    }

    #[must_use]
    pub fn agent_type(&self) -> &str {
        &self.agent_type
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn id(&self) -> ModelId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[must_use]
    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    /// Number of controlled joints.
    #[must_use]
    pub fn control_len(&self) -> usize {
        self.joints.len()
    }

    /// Validate `controls` against the control space without touching the world.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ControlLength`] on a length mismatch.
    pub fn check_controls(&self, controls: &[f32]) -> Result<(), EnvError> {
        if controls.len() == self.joints.len() {
            return Ok(());
        }
        Err(EnvError::ControlLength {
            agent: self.name.clone(),
            expected: self.joints.len(),
            actual: controls.len(),
        })
    }

    /// Send joint velocity commands, clipped to the control limit.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ControlLength`] if `controls` does not match the
    /// control space.
    pub fn take_action(&self, world: &mut World, controls: &[f32]) -> Result<(), EnvError> {
        self.check_controls(controls)?;
        let limit = self.config.control_limit;
        let mut commands = vec![0.0; self.model_joints];
        for (&joint, &control) in self.joints.iter().zip(controls) {
            commands[joint] = control.clamp(-limit, limit);
        }
        world.apply_action(self.id, &commands)?;
        Ok(())
    }

    /// Stop every joint of the robot.
    ///
    /// # Errors
    ///
    /// Fails only if the model was removed from `world`.
    pub fn reset(&self, world: &mut World) -> Result<(), EnvError> {
        world.apply_action(self.id, &vec![0.0; self.model_joints])?;
        Ok(())
    }

    /// Positions then velocities of the controlled joints.
    #[must_use]
    pub fn internal_states(&self, world: &World) -> Vec<f32> {
        let model = world.model(self.id);
        let positions = self.joints.iter().map(|&j| model.joint_positions[j]);
        let velocities = self.joints.iter().map(|&j| model.joint_velocities[j]);
        positions.chain(velocities).collect()
    }

    /// Observe the world, embedding `sentence` when language is enabled.
    ///
    /// # Errors
    ///
    /// Fails if `sentence` cannot be encoded with the teacher's vocabulary.
    pub fn get_observation(
        &self,
        world: &World,
        teacher: &Teacher,
        sentence: &str,
    ) -> Result<Observation, EnvError> {
        let data = if self.options.use_image_observation {
            let frame = self.camera.capture(world, self.id);
            let frame = match self.options.resized_image_size {
                Some(size) => camera::resize(&frame, size),
                None => frame,
            };
            ObservationData::Image(frame)
        } else {
            let mut states = teacher.task_specific_observation(world, self.id);
            states.extend(self.internal_states(world));
            ObservationData::States(states)
        };

        let internal_states = (self.options.use_image_observation
            && self.options.image_with_internal_states)
            .then(|| self.internal_states(world));

        let sentence = if self.options.with_language {
            Some(teacher.sentence_to_sequence(sentence, self.options.vocab_sequence_length)?)
        } else {
            None
        };

        Ok(Observation {
            data,
            internal_states,
            sentence,
        })
    }

    #[must_use]
    pub fn get_control_space(&self) -> Space {
        let limit = self.config.control_limit;
        Space::Box(BoxSpace::uniform(&[self.joints.len()], -limit, limit))
    }

    #[must_use]
    pub fn get_action_space(&self) -> Space {
        let control = self.get_control_space();
        if self.options.with_language {
            let vocab = u32::try_from(self.options.vocab_size).unwrap_or(u32::MAX);
            Space::dict([
                ("control", control),
                (
                    "sentence",
                    Space::MultiDiscrete(vec![vocab; self.options.vocab_sequence_length]),
                ),
            ])
        } else {
            control
        }
    }

    /// Space of [`Agent::get_observation`], derived from a sample observation.
    ///
    /// # Errors
    ///
    /// Propagates failures of the sample observation.
    pub fn get_observation_space(&self, world: &World, teacher: &Teacher) -> Result<Space, EnvError> {
        let sample = self.get_observation(world, teacher, "")?;
        let data = match &sample.data {
            ObservationData::States(states) => Space::Box(BoxSpace::unbounded(&[states.len()])),
            ObservationData::Image(img) => {
                let (w, h) = img.dimensions();
                Space::Box(BoxSpace::uniform(&[h as usize, w as usize, 3], 0.0, 255.0))
            }
        };
        if sample.internal_states.is_none() && sample.sentence.is_none() {
            return Ok(data);
        }

        let mut fields = vec![("data", data)];
        if let Some(states) = &sample.internal_states {
            fields.push(("states", Space::Box(BoxSpace::unbounded(&[states.len()]))));
        }
        if let Some(seq) = &sample.sentence {
            let vocab = u32::try_from(teacher.vocab_size()).unwrap_or(u32::MAX);
            fields.push(("sentence", Space::MultiDiscrete(vec![vocab; seq.len()])));
        }
        Ok(Space::dict(fields))
    }
}
