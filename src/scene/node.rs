use crate::foundation::core::NodeId;
use crate::geometry::vertex::Mesh;
use crate::transform::trs::Trs;

/// One node of an asset's scene graph.
///
/// A parent exclusively owns its children. Trees are built once (see
/// [`crate::SceneBuilder`]) and never mutated afterwards; compaction produces new nodes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneNode {
    /// Identity used by animation channels.
    pub id: NodeId,
    /// Transform relative to the parent.
    #[serde(default)]
    pub transform: Trs,
    /// Geometry in this node's local space.
    #[serde(default)]
    pub mesh: Option<Mesh>,
    /// Ordered children.
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Leaf node with an identity transform and no geometry.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            transform: Trs::IDENTITY,
            mesh: None,
            children: Vec::new(),
        }
    }

    /// Visit this node and its descendants depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SceneNode, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a SceneNode, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// First node in this subtree with the given id.
    pub fn find(&self, id: NodeId) -> Option<&SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// `true` when the node carries at least one vertex.
    pub fn has_geometry(&self) -> bool {
        self.mesh.as_ref().is_some_and(|m| !m.is_empty())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
