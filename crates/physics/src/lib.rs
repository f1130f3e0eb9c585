#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::missing_panics_doc
)]
//! # Playground Physics
//!
//! The simulated world shared by every agent in the playground.
//!
//! This crate owns all model state. A [`World`] holds the robots and props
//! inserted into it, applies per-joint velocity commands, and advances time in
//! fixed sub-steps. Agents interact with it only through a [`ModelId`]
//! handle, so the learner and the teacher always observe one consistent
//! world.
//!
//! ## Key Components
//!
//! -   **Catalog:** [`catalog::model_spec`] describes the kinematics of each
//!     known model type (differential and mecanum bases, limited joints).
//! -   **World:** [`World`] inserts models, takes actions, steps and resets.
//! -   **Integration:** the [`integrator`] module moves joints and bases.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{Pose, World, WorldConfig};
//!
//! let mut world = World::new(WorldConfig { time_precision: 0.01, ..WorldConfig::default() })?;
//! let robot = world.insert_model("pioneer2dx_noplugin", "agent", Pose::default())?;
//! world.apply_action(robot, &[4.0, 4.0])?;
//! world.step(10);
//! assert!(world.model(robot).pose.position.x > 0.0);
//! # Ok::<(), physics::WorldError>(())
//! ```

pub mod builder;
pub mod catalog;
pub mod error;
pub mod integrator;
pub mod types;
pub mod world;

pub use catalog::{model_spec, Drive, JointKind, JointSpec, ModelSpec, MODEL_TYPES};
pub use error::WorldError;
pub use types::{Pose, Vec3};
pub use world::{Model, ModelId, World, WorldConfig};
