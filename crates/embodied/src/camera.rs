//! # Onboard Camera
//!
//! A pinhole camera mounted on an agent's base. Every other model is drawn as
//! an upright block of its catalog color, far models first so near ones
//! cover them. Frames are produced at the camera's native resolution and
//! resized to the configured observation size.

use image::{imageops, Rgb, RgbImage};
use physics::{ModelId, World};

use crate::config::AgentConfig;

const MOUNT_HEIGHT: f32 = 0.5;
const NEAR_CLIP: f32 = 0.05;
const SKY: Rgb<u8> = Rgb([170, 200, 235]);
const GROUND: Rgb<u8> = Rgb([110, 110, 100]);

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub width: u32,
    pub height: u32,
    /// Horizontal field of view, radians.
    pub fov: f32,
}

impl Camera {
    #[must_use]
    pub fn from_config(config: &AgentConfig) -> Self {
        let [width, height] = config.camera_resolution;
        Self {
            width,
            height,
            fov: config.camera_fov,
        }
    }

    fn focal_length(&self) -> f32 {
        (self.width as f32 / 2.0) / (self.fov / 2.0).tan()
    }

    /// Render what `viewer` sees.
    #[must_use]
    pub fn capture(&self, world: &World, viewer: ModelId) -> RgbImage {
        let horizon = self.height / 2;
        let mut img = RgbImage::from_fn(self.width, self.height, |_, y| {
            if y < horizon {
                SKY
            } else {
                GROUND
            }
        });

        let eye = world.model(viewer);
        let to_body = glam::Quat::from_rotation_z(eye.pose.yaw()).inverse();
        let eye_pos: glam::Vec3 = eye.pose.position.into();

        let mut visible: Vec<(f32, glam::Vec3, f32, [u8; 3])> = world
            .models()
            .filter(|m| m.name != eye.name)
            .filter_map(|m| {
                let rel = to_body * (glam::Vec3::from(m.pose.position) - eye_pos);
                (rel.x > NEAR_CLIP).then_some((rel.x, rel, m.spec.radius, m.spec.color))
            })
            .collect();
        visible.sort_by(|a, b| b.0.total_cmp(&a.0));

        let f = self.focal_length();
        let cx = self.width as f32 / 2.0;
        let cy = self.height as f32 / 2.0;
        for (depth, rel, radius, color) in visible {
            let center = cx - f * rel.y / depth;
            let half_width = f * radius / depth;
            let top = cy - f * (rel.z + 2.0 * radius - MOUNT_HEIGHT) / depth;
            let bottom = cy - f * (rel.z - MOUNT_HEIGHT) / depth;
            self.fill(&mut img, (center - half_width, top), (center + half_width, bottom), Rgb(color));
        }
        img
    }

    fn fill(&self, img: &mut RgbImage, min: (f32, f32), max: (f32, f32), color: Rgb<u8>) {
        let clamp_x = |v: f32| v.clamp(0.0, self.width as f32) as u32;
        let clamp_y = |v: f32| v.clamp(0.0, self.height as f32) as u32;
        for y in clamp_y(min.1)..clamp_y(max.1) {
            for x in clamp_x(min.0)..clamp_x(max.0) {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Resize a frame to `(width, height)`.
#[must_use]
pub fn resize(frame: &RgbImage, (width, height): (u32, u32)) -> RgbImage {
    if frame.dimensions() == (width, height) {
        return frame.clone();
    }
    imageops::resize(frame, width, height, imageops::FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::{Pose, WorldConfig};

    fn camera() -> Camera {
        Camera {
            width: 64,
            height: 48,
            fov: 1.2,
        }
    }

    #[test]
    fn empty_world_shows_sky_and_ground() {
        let mut world = World::new(WorldConfig::default()).unwrap();
        let me = world.insert_model("turtlebot", "agent", Pose::default()).unwrap();
        let img = camera().capture(&world, me);
        assert_eq!(img.dimensions(), (64, 48));
        assert_eq!(*img.get_pixel(10, 2), SKY);
        assert_eq!(*img.get_pixel(10, 45), GROUND);
    }

    #[test]
    fn goal_ahead_is_drawn_in_the_middle() {
        let mut world = World::new(WorldConfig::default()).unwrap();
        let me = world.insert_model("turtlebot", "agent", Pose::default()).unwrap();
        world.insert_model("goal", "goal", Pose::at(2.0, 0.0, 0.0)).unwrap();
        let img = camera().capture(&world, me);
        let goal_color = Rgb(physics::model_spec("goal").unwrap().color);
        assert_eq!(*img.get_pixel(32, 30), goal_color);
        assert_eq!(*img.get_pixel(5, 30), GROUND);
    }

    #[test]
    fn models_behind_are_not_drawn() {
        let mut world = World::new(WorldConfig::default()).unwrap();
        let me = world.insert_model("turtlebot", "agent", Pose::default()).unwrap();
        world.insert_model("goal", "goal", Pose::at(-2.0, 0.0, 0.0)).unwrap();
        let img = camera().capture(&world, me);
        assert_eq!(*img.get_pixel(32, 20), SKY);
    }

    #[test]
    fn resize_changes_dimensions() {
        let img = RgbImage::new(64, 48);
        assert_eq!(resize(&img, (16, 16)).dimensions(), (16, 16));
    }
}
