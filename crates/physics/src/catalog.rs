//! # Model Catalog
//!
//! Kinematic descriptions of every model type the world knows how to insert.
//! Robot names match the model names used by the agent configuration, so an
//! agent type string selects both its body and its controllable joints.

/// How a joint moves when it receives a velocity command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum JointKind {
    /// Unlimited rotation, e.g. a wheel.
    Continuous,
    /// Rotation clamped to `[lower, upper]` radians.
    Revolute { lower: f32, upper: f32 },
    /// Translation clamped to `[lower, upper]` metres.
    Prismatic { lower: f32, upper: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct JointSpec {
    pub name: &'static str,
    pub kind: JointKind,
}

impl JointSpec {
    const fn continuous(name: &'static str) -> Self {
        Self { name, kind: JointKind::Continuous }
    }

    const fn revolute(name: &'static str, lower: f32, upper: f32) -> Self {
        Self { name, kind: JointKind::Revolute { lower, upper } }
    }

    const fn prismatic(name: &'static str, lower: f32, upper: f32) -> Self {
        Self { name, kind: JointKind::Prismatic { lower, upper } }
    }
}

/// Mobile base kinematics. Wheel fields are indices into the model's joints.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Drive {
    /// Never moves on its own.
    Static,
    Differential {
        left: usize,
        right: usize,
        wheel_radius: f32,
        wheel_separation: f32,
    },
    /// Four wheels ordered front-left, front-right, back-left, back-right.
    Mecanum {
        wheels: [usize; 4],
        wheel_radius: f32,
        half_length: f32,
        half_width: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelSpec {
    pub model_type: &'static str,
    /// Footprint radius used for rendering and proximity checks.
    pub radius: f32,
    pub color: [u8; 3],
    pub drive: Drive,
    pub joints: Vec<JointSpec>,
}

impl ModelSpec {
    #[must_use]
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }
}

/// Model types accepted by [`crate::World::insert_model`].
pub const MODEL_TYPES: &[&str] = &["pioneer2dx_noplugin", "turtlebot", "youbot_noplugin", "goal"];

/// Look up the kinematic description of `model_type`.
#[must_use]
pub fn model_spec(model_type: &str) -> Option<ModelSpec> {
    let spec = match model_type {
        "pioneer2dx_noplugin" => ModelSpec {
            model_type: "pioneer2dx_noplugin",
            radius: 0.25,
            color: [200, 40, 40],
            drive: Drive::Differential {
                left: 0,
                right: 1,
                wheel_radius: 0.11,
                wheel_separation: 0.34,
            },
            joints: vec![
                JointSpec::continuous("left_wheel_hinge"),
                JointSpec::continuous("right_wheel_hinge"),
            ],
        },
        "turtlebot" => ModelSpec {
            model_type: "turtlebot",
            radius: 0.18,
            color: [60, 60, 60],
            drive: Drive::Differential {
                left: 0,
                right: 1,
                wheel_radius: 0.035,
                wheel_separation: 0.23,
            },
            joints: vec![
                JointSpec::continuous("wheel_left_joint"),
                JointSpec::continuous("wheel_right_joint"),
            ],
        },
        "youbot_noplugin" => ModelSpec {
            model_type: "youbot_noplugin",
            radius: 0.35,
            color: [230, 140, 20],
            drive: Drive::Mecanum {
                wheels: [0, 1, 2, 3],
                wheel_radius: 0.05,
                half_length: 0.228,
                half_width: 0.158,
            },
            joints: vec![
                JointSpec::continuous("wheel_joint_fl"),
                JointSpec::continuous("wheel_joint_fr"),
                JointSpec::continuous("wheel_joint_bl"),
                JointSpec::continuous("wheel_joint_br"),
                JointSpec::revolute("arm_joint_1", -2.95, 2.95),
                JointSpec::revolute("arm_joint_2", -1.13, 1.57),
                JointSpec::revolute("arm_joint_3", -2.64, 2.55),
                JointSpec::revolute("arm_joint_4", -1.79, 1.79),
                JointSpec::revolute("arm_joint_5", -2.92, 2.92),
                JointSpec::prismatic("gripper_finger_joint_l", 0.0, 0.0115),
                JointSpec::prismatic("gripper_finger_joint_r", 0.0, 0.0115),
            ],
        },
        "goal" => ModelSpec {
            model_type: "goal",
            radius: 0.2,
            color: [20, 180, 40],
            drive: Drive::Static,
            joints: Vec::new(),
        },
        _ => return None,
    };
    Some(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_type_resolves() {
        for name in MODEL_TYPES {
            let spec = model_spec(name).unwrap();
            assert_eq!(spec.model_type, *name);
        }
        assert!(model_spec("icub").is_none());
    }

    #[test]
    fn drive_wheels_point_at_continuous_joints() {
        for name in MODEL_TYPES {
            let spec = model_spec(name).unwrap();
            let wheels: Vec<usize> = match spec.drive {
                Drive::Static => vec![],
                Drive::Differential { left, right, .. } => vec![left, right],
                Drive::Mecanum { wheels, .. } => wheels.to_vec(),
            };
            for w in wheels {
                assert_eq!(spec.joints[w].kind, JointKind::Continuous, "{name}");
            }
        }
    }
}
