#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! # Embodied Teacher Environments
//!
//! Reinforcement learning environments where a learner robot is taught in a
//! shared physical world.
//!
//! ## Key Components
//!
//! -   **[`PlayGround`]:** one learner, a goal and the tasks that judge it.
//!     Tasks are run by a [`Teacher`] that also talks to the learner through a
//!     small vocabulary.
//! -   **[`EmbodiedTeacher`]:** adds a second robot, the embodied teacher,
//!     driven either from the keyboard ([`KeyboardControl`]) or by a policy
//!     that supplies its actions next to the learner's.
//! -   **[`Agent`]:** per-robot proxy that clips commands and builds state or
//!     camera observations.
//! -   **[`Env`]:** the `reset`/`step` contract both environments implement,
//!     with [`Space`] descriptions of their actions and observations.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use embodied::{Action, DemoAction, EmbodiedTeacher, EmbodiedTeacherConfig, Env};
//!
//! let mut env = EmbodiedTeacher::new(EmbodiedTeacherConfig::default())?;
//! let obs = env.reset()?;
//! let (obs, reward, done, _info) = env.step(DemoAction::Paired {
//!     learner: Action::Control(vec![0.0; 11]),
//!     teacher: vec![0.0; 11],
//! })?;
//! # Ok::<(), embodied::EnvError>(())
//! ```

pub mod action;
pub mod agent;
pub mod camera;
pub mod config;
pub mod embodied_teacher;
pub mod env;
pub mod error;
pub mod keyboard;
pub mod observation;
pub mod playground;
pub mod spaces;
pub mod task;
pub mod teacher;
pub mod vocab;

pub use action::{Action, DemoAction, Sentence};
pub use agent::{Agent, AgentOptions};
pub use config::{AgentConfig, EmbodiedTeacherConfig, GoalTaskConfig, PlayGroundConfig, TaskConfig};
pub use embodied_teacher::EmbodiedTeacher;
pub use env::{Env, Info, StepResult};
pub use error::EnvError;
pub use keyboard::{KeySource, KeyboardControl, SharedKeys};
pub use observation::{DemoObservation, Observation, ObservationData};
pub use playground::PlayGround;
pub use spaces::{sample_multi_discrete, BoxSpace, Space};
pub use task::{GoalTask, Task, TeacherFeedback};
pub use teacher::Teacher;
pub use vocab::Vocabulary;
