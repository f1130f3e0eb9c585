use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorldError {
    #[error("unknown model type `{0}`")]
    UnknownModelType(String),
    #[error("a model named `{0}` already exists")]
    DuplicateModel(String),
    #[error("no model named `{0}`")]
    UnknownModel(String),
    #[error("invalid pose `{0}`, expected \"x y z roll pitch yaw\"")]
    InvalidPose(String),
    #[error("model `{model}` takes {expected} joint commands, got {actual}")]
    ControlLength {
        model: String,
        expected: usize,
        actual: usize,
    },
    #[error("time precision must be positive and finite, got {0}")]
    InvalidTimePrecision(f32),
}
