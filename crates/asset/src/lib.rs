//! Asset decoding (meshes).
//! PLY mesh decoder producing CPU-friendly mesh data, behind the
//! [`decoder::MeshDecoder`] seam.

pub mod decoder;
pub mod mesh;
pub mod ply;

pub use decoder::{DecodeError, MeshDecoder, PlyDecoder};
pub use mesh::{MeshData, MeshVertex};
