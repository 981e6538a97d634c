//! Resources compiled into the binary, addressed by `:/`-prefixed names.

/// Name of the default haptic probe mesh.
pub const PROBE_MESH: &str = ":/cylinder.ply";

const TABLE: &[(&str, &[u8])] = &[(PROBE_MESH, include_bytes!("../resources/cylinder.ply"))];

/// Look up an embedded resource by name.
pub fn lookup(name: &str) -> Option<&'static [u8]> {
    TABLE
        .iter()
        .find(|(entry, _)| *entry == name)
        .map(|(_, bytes)| *bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_mesh_is_embedded() {
        let bytes = lookup(PROBE_MESH).expect("probe resource");
        assert!(bytes.starts_with(b"ply\n"));
    }

    #[test]
    fn bundled_probe_decodes() {
        let bytes = lookup(PROBE_MESH).expect("probe resource");
        let mesh = asset::ply::decode(bytes).expect("bundled cylinder is valid PLY");
        assert_eq!(mesh.vertices.len(), 50);
        assert_eq!(mesh.triangle_count(), 96);
        let (min, max) = mesh.bounds().expect("bounds");
        assert!((max[2] - min[2] - 60.0).abs() < 1e-4);
    }

    #[test]
    fn unknown_names_are_absent() {
        assert!(lookup(":/missing.ply").is_none());
        assert!(lookup("cylinder.ply").is_none());
    }
}
