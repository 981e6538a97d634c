//! Scene container: model and transform nodes addressed by dense ids.

use std::fmt;
use std::sync::Arc;

use asset::MeshData;

use crate::error::{SceneError, SceneResult};
use crate::transform::Transform;

/// Node id (dense, index into the slot array). Never reused within a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node{}", self.0)
    }
}

/// Named surface with optional geometry and an optional transform reference.
#[derive(Clone, Debug, Default)]
pub struct ModelNode {
    pub name: String,
    pub mesh: Option<Arc<MeshData>>,
    pub visible: bool,
    /// Only the scene writes this, so it always names a registered transform.
    transform_id: Option<NodeId>,
}

impl ModelNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_mesh(mut self, mesh: MeshData) -> Self {
        self.mesh = Some(Arc::new(mesh));
        self
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[inline]
    pub fn transform_id(&self) -> Option<NodeId> {
        self.transform_id
    }
}

/// Named spatial transform, identity at creation.
#[derive(Clone, Debug)]
pub struct TransformNode {
    pub name: String,
    pub transform: Transform,
}

impl TransformNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Node {
    Model(ModelNode),
    Transform(TransformNode),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Model(m) => &m.name,
            Node::Transform(t) => &t.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Model(_) => "model",
            Node::Transform(_) => "transform",
        }
    }
}

/// Mutable graph of nodes. Slots of removed nodes stay empty so ids keep
/// pointing at the same node for the scene's lifetime.
#[derive(Default)]
pub struct Scene {
    slots: Vec<Option<Node>>,
    alive: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node and return its id.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        log::debug!("Adding {} node '{}' as {}", node.kind(), node.name(), id);
        self.slots.push(Some(node));
        self.alive += 1;
        id
    }

    /// Insert `model`, then `transform`, then point the model at the transform.
    pub fn add_model_with_transform(
        &mut self,
        model: ModelNode,
        transform: TransformNode,
    ) -> (NodeId, NodeId) {
        let model_id = self.add_node(Node::Model(model));
        let transform_id = self.add_node(Node::Transform(transform));
        if let Some(Node::Model(m)) = self.slots[model_id.index()].as_mut() {
            m.transform_id = Some(transform_id);
        }
        (model_id, transform_id)
    }

    /// Point `model` at `transform`. Both must be alive nodes of the right kind.
    pub fn set_transform_ref(&mut self, model: NodeId, transform: NodeId) -> SceneResult<()> {
        match self.node(transform) {
            Some(Node::Transform(_)) => {}
            Some(_) => return Err(SceneError::NotATransform(transform)),
            None => return Err(SceneError::UnknownNode(transform)),
        }
        self.model_mut(model)?.transform_id = Some(transform);
        Ok(())
    }

    pub fn clear_transform_ref(&mut self, model: NodeId) -> SceneResult<()> {
        self.model_mut(model)?.transform_id = None;
        Ok(())
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn model(&self, id: NodeId) -> SceneResult<&ModelNode> {
        match self.node(id) {
            Some(Node::Model(m)) => Ok(m),
            Some(_) => Err(SceneError::NotAModel(id)),
            None => Err(SceneError::UnknownNode(id)),
        }
    }

    pub fn model_mut(&mut self, id: NodeId) -> SceneResult<&mut ModelNode> {
        match self.slots.get_mut(id.index()).and_then(Option::as_mut) {
            Some(Node::Model(m)) => Ok(m),
            Some(_) => Err(SceneError::NotAModel(id)),
            None => Err(SceneError::UnknownNode(id)),
        }
    }

    pub fn transform(&self, id: NodeId) -> SceneResult<&TransformNode> {
        match self.node(id) {
            Some(Node::Transform(t)) => Ok(t),
            Some(_) => Err(SceneError::NotATransform(id)),
            None => Err(SceneError::UnknownNode(id)),
        }
    }

    pub fn transform_mut(&mut self, id: NodeId) -> SceneResult<&mut TransformNode> {
        match self.slots.get_mut(id.index()).and_then(Option::as_mut) {
            Some(Node::Transform(t)) => Ok(t),
            Some(_) => Err(SceneError::NotATransform(id)),
            None => Err(SceneError::UnknownNode(id)),
        }
    }

    /// The transform node a model points at, if any.
    pub fn resolve_transform(&self, model: NodeId) -> Option<(NodeId, &TransformNode)> {
        let id = self.model(model).ok()?.transform_id?;
        self.transform(id).ok().map(|t| (id, t))
    }

    /// First alive node with exactly this name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.name() == name).map(|(id, _)| id)
    }

    /// Remove a node. Removing a transform detaches every model that used it.
    pub fn remove_node(&mut self, id: NodeId) -> SceneResult<Node> {
        let node = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(SceneError::UnknownNode(id))?;
        self.alive -= 1;

        if matches!(node, Node::Transform(_)) {
            for slot in self.slots.iter_mut().flatten() {
                if let Node::Model(m) = slot {
                    if m.transform_id == Some(id) {
                        m.transform_id = None;
                    }
                }
            }
        }
        log::debug!("Removed {} node '{}' ({})", node.kind(), node.name(), id);
        Ok(node)
    }

    /// Number of alive nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.alive
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// Iterate over alive nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    pub fn iter_models(&self) -> impl Iterator<Item = (NodeId, &ModelNode)> {
        self.iter().filter_map(|(id, n)| match n {
            Node::Model(m) => Some((id, m)),
            Node::Transform(_) => None,
        })
    }

    /// Drop every node. Ids handed out earlier stay retired.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.alive = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;
    use asset::MeshVertex;

    fn triangle() -> MeshData {
        MeshData::new(
            vec![
                MeshVertex::at([0.0, 0.0, 0.0]),
                MeshVertex::at([1.0, 0.0, 0.0]),
                MeshVertex::at([0.0, 1.0, 0.0]),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn add_model_with_transform_links_both() {
        let mut scene = Scene::new();
        let (model, transform) = scene.add_model_with_transform(
            ModelNode::new("m").with_mesh(triangle()),
            TransformNode::new("t"),
        );
        assert_eq!(scene.len(), 2);
        let (resolved, node) = scene.resolve_transform(model).expect("linked");
        assert_eq!(resolved, transform);
        assert_eq!(node.name, "t");
        assert!(node.transform.is_identity());
    }

    #[test]
    fn transform_ref_must_name_a_transform() {
        let mut scene = Scene::new();
        let a = scene.add_node(Node::Model(ModelNode::new("a")));
        let b = scene.add_node(Node::Model(ModelNode::new("b")));
        assert_eq!(scene.set_transform_ref(a, b), Err(SceneError::NotATransform(b)));

        let t = scene.add_node(Node::Transform(TransformNode::new("t")));
        assert_eq!(scene.set_transform_ref(t, t), Err(SceneError::NotAModel(t)));

        let ghost = NodeId(42);
        assert_eq!(scene.set_transform_ref(a, ghost), Err(SceneError::UnknownNode(ghost)));
        assert!(scene.model(a).expect("model").transform_id().is_none());

        scene.set_transform_ref(a, t).expect("valid link");
        assert_eq!(scene.model(a).expect("model").transform_id(), Some(t));
    }

    #[test]
    fn removing_transform_detaches_models() {
        let mut scene = Scene::new();
        let (model, transform) =
            scene.add_model_with_transform(ModelNode::new("m"), TransformNode::new("t"));
        let removed = scene.remove_node(transform).expect("remove transform");
        assert_eq!(removed.name(), "t");
        assert_eq!(scene.len(), 1);
        assert!(scene.resolve_transform(model).is_none());
        assert!(scene.model(model).expect("model").transform_id().is_none());
        assert_eq!(scene.remove_node(transform).unwrap_err(), SceneError::UnknownNode(transform));
    }

    #[test]
    fn moving_the_transform_is_seen_through_the_model() {
        let mut scene = Scene::new();
        let (model, transform) =
            scene.add_model_with_transform(ModelNode::new("m"), TransformNode::new("t"));

        scene
            .transform_mut(transform)
            .expect("transform node")
            .transform
            .translation = Vec3::new(0.0, 0.0, 5.0);
        let (_, resolved) = scene.resolve_transform(model).expect("linked");
        assert!(!resolved.transform.is_identity());
        assert_eq!(resolved.transform.translation.z, 5.0);

        assert_eq!(
            scene.transform_mut(model).unwrap_err(),
            SceneError::NotATransform(model)
        );
    }

    #[test]
    fn clearing_the_link_keeps_both_nodes() {
        let mut scene = Scene::new();
        let (model, transform) =
            scene.add_model_with_transform(ModelNode::new("m"), TransformNode::new("t"));

        scene.clear_transform_ref(model).expect("model node");
        assert!(scene.resolve_transform(model).is_none());
        assert!(scene.contains(transform));
        assert_eq!(scene.len(), 2);
        assert_eq!(
            scene.clear_transform_ref(transform),
            Err(SceneError::NotAModel(transform))
        );
    }

    #[test]
    fn ids_are_not_reused() {
        let mut scene = Scene::new();
        let first = scene.add_node(Node::Transform(TransformNode::new("a")));
        scene.clear();
        assert!(scene.is_empty());
        assert!(!scene.contains(first));
        let second = scene.add_node(Node::Transform(TransformNode::new("b")));
        assert_ne!(first, second);
        assert_eq!(scene.find_by_name("b"), Some(second));
        assert_eq!(scene.find_by_name("a"), None);
    }

    #[test]
    fn iter_models_skips_transforms() {
        let mut scene = Scene::new();
        scene.add_model_with_transform(ModelNode::new("m"), TransformNode::new("t"));
        let names: Vec<_> = scene.iter_models().map(|(_, m)| m.name.as_str()).collect();
        assert_eq!(names, vec!["m"]);
    }
}
