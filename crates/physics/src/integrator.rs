//! # Kinematic Integration
//!
//! Joints follow their velocity commands through a first-order response and
//! are integrated with explicit Euler steps. Mobile bases derive their body
//! velocity from the wheel speeds and move in the ground plane.

use std::f32::consts::PI;

use crate::catalog::{Drive, JointKind};
use crate::types::Vec3;
use crate::world::Model;

/// Time constant of the joint velocity controllers, in seconds.
const JOINT_RESPONSE_TIME: f32 = 0.05;

/// Move every joint velocity toward its command, then integrate positions.
pub fn integrate_joints(model: &mut Model, dt: f32) {
    let blend = (dt / JOINT_RESPONSE_TIME).min(1.0);
    for (i, joint) in model.spec.joints.iter().enumerate() {
        let vel = &mut model.joint_velocities[i];
        *vel += (model.commands[i] - *vel) * blend;

        let pos = &mut model.joint_positions[i];
        *pos += *vel * dt;
        match joint.kind {
            JointKind::Continuous => {}
            JointKind::Revolute { lower, upper } | JointKind::Prismatic { lower, upper } => {
                if *pos <= lower || *pos >= upper {
                    *pos = pos.clamp(lower, upper);
                    *vel = 0.0;
                }
            }
        }
    }
}

/// Body-frame `(forward, lateral, yaw rate)` produced by the wheel joints.
#[must_use]
pub fn base_twist(drive: &Drive, joint_velocities: &[f32]) -> (f32, f32, f32) {
    match *drive {
        Drive::Static => (0.0, 0.0, 0.0),
        Drive::Differential {
            left,
            right,
            wheel_radius,
            wheel_separation,
        } => {
            let wl = joint_velocities[left];
            let wr = joint_velocities[right];
            let forward = wheel_radius * (wl + wr) / 2.0;
            let yaw_rate = wheel_radius * (wr - wl) / wheel_separation;
            (forward, 0.0, yaw_rate)
        }
        Drive::Mecanum {
            wheels: [fl, fr, bl, br],
            wheel_radius,
            half_length,
            half_width,
        } => {
            let (w_fl, w_fr, w_bl, w_br) = (
                joint_velocities[fl],
                joint_velocities[fr],
                joint_velocities[bl],
                joint_velocities[br],
            );
            let k = wheel_radius / 4.0;
            let forward = k * (w_fl + w_fr + w_bl + w_br);
            let lateral = k * (-w_fl + w_fr + w_bl - w_br);
            let yaw_rate = k * (-w_fl + w_fr - w_bl + w_br) / (half_length + half_width);
            (forward, lateral, yaw_rate)
        }
    }
}

/// Move the base of a model in the ground plane.
pub fn integrate_base(model: &mut Model, dt: f32) {
    if matches!(model.spec.drive, Drive::Static) {
        return;
    }
    let (forward, lateral, yaw_rate) = base_twist(&model.spec.drive, &model.joint_velocities);

    let heading = glam::Quat::from_rotation_z(model.pose.yaw());
    let world_vel: Vec3 = (heading * glam::Vec3::new(forward, lateral, 0.0)).into();

    model.linear_velocity = world_vel;
    model.angular_velocity = Vec3::new(0.0, 0.0, yaw_rate);
    model.pose.position += world_vel * dt;
    model.pose.rotation.z = wrap_angle(model.pose.rotation.z + yaw_rate * dt);
}

/// Wrap an angle into `(-PI, PI]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}
