//! vpaw application shell: window chrome, embedded resources, patient file
//! lookup and the default haptic probe loaded at startup.

pub mod config;
pub mod patient;
pub mod probe;
pub mod resources;
pub mod shell;

use corelib::{Node, Scene};

/// Log one line per node: id, kind, name and model details.
pub fn log_scene(scene: &Scene) {
    log::info!("Scene holds {} node(s)", scene.len());
    for (id, node) in scene.iter() {
        match node {
            Node::Model(m) => log::info!(
                "  {id} model '{}' visible={} triangles={} transform={}",
                m.name,
                m.visible,
                m.mesh.as_ref().map_or(0, |mesh| mesh.triangle_count()),
                m.transform_id()
                    .map_or_else(|| "none".to_string(), |t| t.to_string())
            ),
            Node::Transform(t) => log::info!(
                "  {id} transform '{}' identity={}",
                t.name,
                t.transform.is_identity()
            ),
        }
    }
}
