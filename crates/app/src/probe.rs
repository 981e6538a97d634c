//! Default haptic probe: decode the bundled mesh and register it in the scene.
//!
//! The probe is an optional asset. A missing or corrupt resource leaves the
//! scene untouched and startup continues; the outcome is only logged.

use asset::{DecodeError, MeshDecoder, PlyDecoder};
use corelib::{ModelNode, NodeId, Scene, TransformNode};

pub const PROBE_MODEL_NAME: &str = "Model: Haptic Probe";
pub const PROBE_TRANSFORM_NAME: &str = "Transform: Haptic Probe";

/// Why the probe was not added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Resource missing or empty.
    ResourceUnavailable,
    /// Decoder rejected the bytes with this (non-zero) code.
    DecodeFailed { code: u32 },
}

/// Outcome of [`load_default_probe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadResult {
    Loaded { model: NodeId, transform: NodeId },
    Skipped(SkipReason),
}

impl LoadResult {
    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadResult::Loaded { .. })
    }
}

/// Decode `resource` as PLY and add the probe model plus its transform to
/// `scene`. Adds either both nodes or neither.
pub fn load_default_probe(resource: Option<&[u8]>, scene: &mut Scene) -> LoadResult {
    load_default_probe_with(&PlyDecoder, resource, scene)
}

/// [`load_default_probe`] with an explicit decoder.
pub fn load_default_probe_with<D: MeshDecoder>(
    decoder: &D,
    resource: Option<&[u8]>,
    scene: &mut Scene,
) -> LoadResult {
    let bytes = match resource {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => {
            log::info!("Haptic probe resource unavailable; starting without it");
            return LoadResult::Skipped(SkipReason::ResourceUnavailable);
        }
    };

    let mesh = match decoder.decode(bytes) {
        Ok(mesh) => mesh,
        Err(err) => {
            log::warn!("Haptic probe resource could not be decoded: {err}");
            return LoadResult::Skipped(SkipReason::DecodeFailed { code: err.code() });
        }
    };

    log::info!(
        "Loaded haptic probe mesh: {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangle_count()
    );

    let model = ModelNode::new(PROBE_MODEL_NAME)
        .with_mesh(mesh)
        .with_visibility(true);
    let (model, transform) =
        scene.add_model_with_transform(model, TransformNode::new(PROBE_TRANSFORM_NAME));
    LoadResult::Loaded { model, transform }
}
