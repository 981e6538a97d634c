//! Core types: math re-exports, Transform, scene container.

pub use glam::{EulerRot, Mat4, Quat, Vec3, vec3};

pub mod error;
pub mod scene;
pub mod transform;

pub use error::{SceneError, SceneResult};
pub use scene::{ModelNode, Node, NodeId, Scene, TransformNode};
pub use transform::Transform;
