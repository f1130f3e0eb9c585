//! # Actions
//!
//! Learner actions with an optional sentence, and the paired learner/teacher
//! action of a policy-driven demonstration.

use serde::{Deserialize, Serialize};

/// What the learner says alongside its controls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentence {
    /// Already readable text, passed to the teacher unchanged.
    Raw(String),
    /// Token ids to decode with the teacher's vocabulary.
    Encoded(Vec<u32>),
}

impl From<&str> for Sentence {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_owned())
    }
}

impl From<Vec<u32>> for Sentence {
    fn from(seq: Vec<u32>) -> Self {
        Self::Encoded(seq)
    }
}

/// Action for one agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Joint commands only, used when language is disabled.
    Control(Vec<f32>),
    Language { control: Vec<f32>, sentence: Sentence },
}

impl Action {
    #[must_use]
    pub fn controls(&self) -> &[f32] {
        match self {
            Self::Control(control) | Self::Language { control, .. } => control,
        }
    }
}

impl From<Vec<f32>> for Action {
    fn from(control: Vec<f32>) -> Self {
        Self::Control(control)
    }
}

/// Action accepted by [`crate::EmbodiedTeacher::step`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DemoAction {
    /// Learner action alone; the teacher is driven from the keyboard.
    Plain(Action),
    /// Learner action plus the teacher policy's joint commands.
    Paired { learner: Action, teacher: Vec<f32> },
}
