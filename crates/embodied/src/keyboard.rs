//! # Keyboard Demonstrations
//!
//! Turns the set of currently held keys into joint commands for the teacher
//! robot. Capturing the keys is left to a [`KeySource`]; [`SharedKeys`] lets a
//! listener thread publish key state that the environment polls each step.
//!
//! Layout: `W`/`S` drive forward and backward, `A`/`D` turn, `E` toggles the
//! gripper, `I`/`K` and `J`/`L` move the first two arm joints. Holding a
//! driving key ramps the speed up so short taps give fine control.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::EnvError;

/// Non-blocking view of the keyboard.
pub trait KeySource: Send {
    /// Keys held down right now, lowercase.
    fn pressed(&mut self) -> HashSet<char>;
}

/// Key state written by one thread and polled by another.
#[derive(Clone, Debug, Default)]
pub struct SharedKeys(Arc<Mutex<HashSet<char>>>);

impl SharedKeys {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, key: char) {
        self.0.lock().insert(key.to_ascii_lowercase());
    }

    pub fn release(&self, key: char) {
        self.0.lock().remove(&key.to_ascii_lowercase());
    }

    /// Replace the held keys with exactly `keys`.
    pub fn set(&self, keys: impl IntoIterator<Item = char>) {
        let mut held = self.0.lock();
        held.clear();
        held.extend(keys.into_iter().map(|k| k.to_ascii_lowercase()));
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

impl KeySource for SharedKeys {
    fn pressed(&mut self) -> HashSet<char> {
        self.0.lock().clone()
    }
}

const MIN_SPEED: f32 = 0.2;
const SPEED_STEP: f32 = 0.1;
const ARM_SPEED: f32 = 0.5;
const GRIPPER_SPEED: f32 = 0.01;

pub struct KeyboardControl {
    source: Box<dyn KeySource>,
    speed: f32,
    gripper_open: bool,
    gripper_key_down: bool,
}

impl KeyboardControl {
    pub fn new(source: impl KeySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            speed: MIN_SPEED,
            gripper_open: false,
            gripper_key_down: false,
        }
    }

    /// Forget the speed ramp and the gripper latch.
    pub fn reset(&mut self) {
        self.speed = MIN_SPEED;
        self.gripper_open = false;
        self.gripper_key_down = false;
    }

    #[must_use]
    pub fn gripper_open(&self) -> bool {
        self.gripper_open
    }

    /// Length of the action the keyboard produces for `agent_type`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::NoKeyboardMapping`] for robots without a layout.
    pub fn action_len(agent_type: &str) -> Result<usize, EnvError> {
        match agent_type {
            "pioneer2dx_noplugin" | "turtlebot" => Ok(2),
            "youbot_noplugin" => Ok(11),
            other => Err(EnvError::NoKeyboardMapping(other.to_owned())),
        }
    }

    /// Poll the keyboard and produce one action for a robot of `agent_type`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::NoKeyboardMapping`] for robots without a layout.
    pub fn get_agent_actions(&mut self, agent_type: &str) -> Result<Vec<f32>, EnvError> {
        Self::action_len(agent_type)?;
        let keys = self.source.pressed();
        let axis = |pos: char, neg: char| f32::from(u8::from(keys.contains(&pos))) - f32::from(u8::from(keys.contains(&neg)));

        let forward = axis('w', 's');
        let turn = axis('a', 'd');
        if forward == 0.0 && turn == 0.0 {
            self.speed = MIN_SPEED;
        } else {
            self.speed = (self.speed + SPEED_STEP).min(1.0);
        }

        let e_down = keys.contains(&'e');
        if e_down && !self.gripper_key_down {
            self.gripper_open = !self.gripper_open;
        }
        self.gripper_key_down = e_down;

        let actions = match agent_type {
            "pioneer2dx_noplugin" | "turtlebot" => {
                let max = if agent_type == "turtlebot" { 15.0 } else { 10.0 };
                let scale = self.speed * max;
                let left = ((forward - turn) * scale).clamp(-max, max);
                let right = ((forward + turn) * scale).clamp(-max, max);
                vec![left, right]
            }
            "youbot_noplugin" => {
                let max = 15.0;
                let scale = self.speed * max;
                let left = ((forward - turn) * scale).clamp(-max, max);
                let right = ((forward + turn) * scale).clamp(-max, max);
                let gripper = if self.gripper_open { GRIPPER_SPEED } else { -GRIPPER_SPEED };
                vec![
                    left,
                    right,
                    left,
                    right,
                    axis('j', 'l') * ARM_SPEED,
                    axis('i', 'k') * ARM_SPEED,
                    0.0,
                    0.0,
                    0.0,
                    gripper,
                    gripper,
                ]
            }
            other => return Err(EnvError::NoKeyboardMapping(other.to_owned())),
        };
        Ok(actions)
    }
}
