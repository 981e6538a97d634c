//! Scene errors.

use thiserror::Error;

use crate::scene::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("node {0} is not registered in this scene")]
    UnknownNode(NodeId),
    #[error("node {0} is not a model node")]
    NotAModel(NodeId),
    #[error("node {0} is not a transform node")]
    NotATransform(NodeId),
}

pub type SceneResult<T> = Result<T, SceneError>;
