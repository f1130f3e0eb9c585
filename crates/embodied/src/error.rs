//! # Errors
//!
//! Errors raised while building or stepping an environment.

use physics::WorldError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error(transparent)]
    World(#[from] WorldError),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("no agent configuration for agent type `{0}`")]
    UnknownAgentType(String),
    #[error("model `{model}` has no joint `{joint}`")]
    UnknownJoint { model: String, joint: String },
    #[error("action does not match the action space: {0}")]
    ActionMismatch(&'static str),
    #[error("agent `{agent}` expects {expected} controls, got {actual}")]
    ControlLength {
        agent: String,
        expected: usize,
        actual: usize,
    },
    #[error("word `{0}` is not in the vocabulary")]
    UnknownWord(String),
    #[error("token {token} is outside the vocabulary of size {vocab_size}")]
    UnknownToken { token: u32, vocab_size: usize },
    #[error("sentence has {words} words but sequences hold {max}")]
    SentenceTooLong { words: usize, max: usize },
    #[error("no keyboard mapping for agent type `{0}`")]
    NoKeyboardMapping(String),
}
