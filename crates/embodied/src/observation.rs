//! # Observations

use image::RgbImage;

#[derive(Clone, Debug, PartialEq)]
pub enum ObservationData {
    /// Low-dimensional state vector, poses in world coordinates.
    States(Vec<f32>),
    /// Camera frame, `height x width x 3`.
    Image(RgbImage),
}

/// What one agent perceives after a step.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub data: ObservationData,
    /// Joint positions and velocities, present alongside image data when
    /// internal states are requested.
    pub internal_states: Option<Vec<f32>>,
    /// Teacher sentence encoded with the vocabulary, present when language is
    /// enabled.
    pub sentence: Option<Vec<u32>>,
}

impl Observation {
    #[must_use]
    pub fn states(&self) -> Option<&[f32]> {
        match &self.data {
            ObservationData::States(s) => Some(s),
            ObservationData::Image(_) => None,
        }
    }

    #[must_use]
    pub fn image(&self) -> Option<&RgbImage> {
        match &self.data {
            ObservationData::Image(img) => Some(img),
            ObservationData::States(_) => None,
        }
    }
}

/// Observation returned by [`crate::EmbodiedTeacher`].
#[derive(Clone, Debug, PartialEq)]
pub enum DemoObservation {
    Plain(Observation),
    Paired {
        learner: Observation,
        teacher: Observation,
    },
}

impl DemoObservation {
    #[must_use]
    pub fn learner(&self) -> &Observation {
        match self {
            Self::Plain(obs) | Self::Paired { learner: obs, .. } => obs,
        }
    }

    #[must_use]
    pub fn teacher(&self) -> Option<&Observation> {
        match self {
            Self::Plain(_) => None,
            Self::Paired { teacher, .. } => Some(teacher),
        }
    }
}
