use std::collections::BTreeSet;

use crate::foundation::core::NodeId;
use crate::foundation::error::{ModelError, ModelResult};

/// Options controlling how an asset is baked into an [`AnimatedModel`](crate::AnimatedModel).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BakeSettings {
    /// Nodes skipped together with their subtrees.
    pub excluded_nodes: BTreeSet<NodeId>,
    /// Loop length used when no channel has a positive keyframe time.
    pub default_length: f32,
    /// Bake several clips concurrently.
    pub parallel: bool,
    /// Worker thread count for parallel clip baking (`None` = rayon default).
    pub threads: Option<usize>,
}

impl Default for BakeSettings {
    fn default() -> Self {
        Self {
            excluded_nodes: BTreeSet::new(),
            default_length: 1.0,
            parallel: true,
            threads: None,
        }
    }
}

impl BakeSettings {
    /// Check the settings before use.
    pub fn validate(&self) -> ModelResult<()> {
        if !self.default_length.is_finite() || self.default_length <= 0.0 {
            return Err(ModelError::validation(
                "bake 'default_length' must be finite and > 0",
            ));
        }
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(ModelError::validation(
                "bake 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Skip `node` and its subtree.
    pub fn exclude(mut self, node: NodeId) -> Self {
        self.excluded_nodes.insert(node);
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bake/settings.rs"]
mod tests;
