//! # World Builder
//!
//! Methods for populating a [`World`] with models from the catalog.

use crate::catalog::model_spec;
use crate::error::WorldError;
use crate::types::Pose;
use crate::world::{Model, ModelId, World};

impl World {
    /// Insert a model of `model_type` under a unique `name`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownModelType`] for types missing from the
    /// catalog and [`WorldError::DuplicateModel`] if `name` is taken.
    pub fn insert_model(
        &mut self,
        model_type: &str,
        name: &str,
        pose: Pose,
    ) -> Result<ModelId, WorldError> {
        let spec = model_spec(model_type)
            .ok_or_else(|| WorldError::UnknownModelType(model_type.to_owned()))?;
        if self.names.contains_key(name) {
            return Err(WorldError::DuplicateModel(name.to_owned()));
        }
        let id = ModelId(self.models.len());
        self.models.push(Model::new(name.to_owned(), spec, pose));
        self.names.insert(name.to_owned(), id);
        tracing::debug!(model_type, name, %pose, "inserted model");
        Ok(id)
    }

    /// Like [`World::insert_model`] with the pose given as `"x y z roll pitch yaw"`.
    ///
    /// # Errors
    ///
    /// Also returns [`WorldError::InvalidPose`] if the pose does not parse.
    pub fn insert_model_at(
        &mut self,
        model_type: &str,
        name: &str,
        pose: &str,
    ) -> Result<ModelId, WorldError> {
        self.insert_model(model_type, name, pose.parse()?)
    }
}
