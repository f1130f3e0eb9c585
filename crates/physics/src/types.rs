use std::fmt;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

use crate::error::WorldError;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance measured in the ground (x/y) plane only.
    #[must_use]
    pub fn planar_distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[must_use]
    pub fn to_array(self) -> [f32; 3] {
        bytemuck::cast(self)
    }
}

impl From<glam::Vec3> for Vec3 {
    fn from(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for glam::Vec3 {
    fn from(v: Vec3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Position plus roll/pitch/yaw orientation, in world coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Pose {
    pub position: Vec3,
    /// `(roll, pitch, yaw)` in radians.
    pub rotation: Vec3,
}

impl Pose {
    #[must_use]
    pub const fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    #[must_use]
    pub const fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vec3::new(x, y, z), Vec3::ZERO)
    }

    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.rotation.z
    }

    /// `[x, y, z, roll, pitch, yaw]`
    #[must_use]
    pub fn to_array(self) -> [f32; 6] {
        bytemuck::cast(self)
    }
}

/// Parses the `"x y z roll pitch yaw"` format used for model placement.
impl FromStr for Pose {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(str::parse::<f32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| WorldError::InvalidPose(s.to_owned()))?;
        let values: [f32; 6] = values
            .try_into()
            .map_err(|_| WorldError::InvalidPose(s.to_owned()))?;
        Ok(bytemuck::cast(values))
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, roll, pitch, yaw] = self.to_array();
        write!(f, "{x} {y} {z} {roll} {pitch} {yaw}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_component_pose() {
        let pose: Pose = "0 -2 0 0 0 1.5".parse().unwrap();
        assert_eq!(pose.position, Vec3::new(0.0, -2.0, 0.0));
        assert!((pose.yaw() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn rejects_short_or_garbled_pose() {
        assert!("0 1 2".parse::<Pose>().is_err());
        assert!("0 1 2 3 4 five".parse::<Pose>().is_err());
        assert!("0 1 2 3 4 5 6".parse::<Pose>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let pose = Pose::new(Vec3::new(1.0, 2.5, 0.0), Vec3::new(0.0, 0.0, -0.5));
        let parsed: Pose = pose.to_string().parse().unwrap();
        assert_eq!(parsed, pose);
    }
}
