//! Format-agnostic decoding seam used by scene loaders.

use crate::mesh::MeshData;
use crate::ply::{self, PlyError};

/// Error produced by a [`MeshDecoder`]; `code()` is never `0`.
pub trait DecodeError: std::error::Error {
    fn code(&self) -> u32;
}

/// Turns serialized bytes into mesh geometry.
pub trait MeshDecoder {
    type Error: DecodeError;

    fn decode(&self, bytes: &[u8]) -> Result<MeshData, Self::Error>;
}

impl DecodeError for PlyError {
    fn code(&self) -> u32 {
        PlyError::code(self)
    }
}

/// Stanford PLY decoder (ASCII and binary).
#[derive(Clone, Copy, Debug, Default)]
pub struct PlyDecoder;

impl MeshDecoder for PlyDecoder {
    type Error = PlyError;

    fn decode(&self, bytes: &[u8]) -> Result<MeshData, PlyError> {
        ply::decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ply_decoder_reports_nonzero_codes() {
        let err = PlyDecoder.decode(b"not a mesh").unwrap_err();
        assert_ne!(DecodeError::code(&err), ply::NO_ERROR);
    }
}
