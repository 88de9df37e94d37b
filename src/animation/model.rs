use std::collections::{BTreeSet, HashMap, HashSet};

use smallvec::SmallVec;

use crate::animation::channel::{Channel, ChannelSample};
use crate::animation::sink::DrawSink;
use crate::bake::settings::BakeSettings;
use crate::compact::optimizer::{CompactedNode, compact};
use crate::foundation::core::{NodeId, Quat, Vec3};
use crate::foundation::error::ModelResult;
use crate::foundation::math::normalize_quat_or_identity;
use crate::geometry::vertex::Geometry;
use crate::scene::node::SceneNode;
use crate::transform::trs::Trs;

/// A compacted, loopable animated asset.
///
/// Built once from a scene tree and its channels, then queried every frame. The model is
/// read-only after construction and can be shared across threads; each query allocates its own
/// scratch state.
#[derive(Clone, Debug)]
pub struct AnimatedModel {
    roots: Vec<CompactedNode>,
    static_batches: Vec<Geometry>,
    channels: Vec<Channel>,
    by_node: HashMap<NodeId, SmallVec<[usize; 4]>>,
    length: f32,
}

impl AnimatedModel {
    /// Compact `roots` around the nodes animated by `channels`.
    ///
    /// Channels that target a missing or excluded node, or whose keyframes are empty, unsorted
    /// or non-finite, are dropped with a warning. The remaining ones decide which nodes stay
    /// dynamic; everything else is folded into static batches.
    #[tracing::instrument(skip_all, fields(channels = channels.len()))]
    pub fn build(
        roots: &[SceneNode],
        channels: Vec<Channel>,
        settings: &BakeSettings,
    ) -> ModelResult<Self> {
        settings.validate()?;

        let mut live = HashSet::new();
        for root in roots {
            collect_live(root, &settings.excluded_nodes, &mut live);
        }

        let mut kept = Vec::with_capacity(channels.len());
        for (index, channel) in channels.into_iter().enumerate() {
            if !live.contains(&channel.target) {
                tracing::warn!(
                    node = %channel.target,
                    channel = index,
                    "dropping channel: target node is missing or excluded"
                );
                continue;
            }
            if let Err(err) = channel.validate() {
                tracing::warn!(
                    node = %channel.target,
                    channel = index,
                    error = %err,
                    "dropping channel"
                );
                continue;
            }
            kept.push(channel);
        }

        let mut by_node: HashMap<NodeId, SmallVec<[usize; 4]>> = HashMap::new();
        for (i, channel) in kept.iter().enumerate() {
            by_node.entry(channel.target).or_default().push(i);
        }
        let animated: HashSet<NodeId> = by_node.keys().copied().collect();

        let scene = compact(roots, &animated, &settings.excluded_nodes);

        let max_time = kept.iter().map(Channel::max_time).fold(0.0, f32::max);
        let length = if max_time > 0.0 {
            max_time
        } else {
            settings.default_length
        };

        tracing::debug!(
            kept_channels = kept.len(),
            length,
            "built animated model"
        );
        Ok(Self {
            roots: scene.roots,
            static_batches: scene.static_batches,
            channels: kept,
            by_node,
            length,
        })
    }

    /// Loop length in seconds. Always finite and positive.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Dynamic roots.
    pub fn roots(&self) -> &[CompactedNode] {
        &self.roots
    }

    /// Geometry of fully static root subtrees, in model space.
    pub fn static_batches(&self) -> &[Geometry] {
        &self.static_batches
    }

    /// Channels that survived validation.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Map a query time onto the loop, `[0, length)`.
    pub fn local_time(&self, time: f64) -> f32 {
        if !time.is_finite() {
            return 0.0;
        }
        let local = time.rem_euclid(f64::from(self.length)) as f32;
        // Narrowing can round up onto the loop end.
        if local >= self.length { 0.0 } else { local }
    }

    /// Pose of `node` relative to its parent at `time`.
    pub fn pose(&self, node: &CompactedNode, time: f64) -> Trs {
        self.pose_at_local(node, self.local_time(time))
    }

    /// Pose of the dynamic node `id` at `time`, or `None` if it did not survive compaction.
    pub fn pose_of(&self, id: NodeId, time: f64) -> Option<Trs> {
        self.roots
            .iter()
            .find_map(|r| r.find(id))
            .map(|node| self.pose(node, time))
    }

    /// Submit every batch of the model at `time`, placed at the origin.
    pub fn render(&self, time: f64, sink: &mut dyn DrawSink) {
        self.render_at(Trs::IDENTITY, time, sink);
    }

    /// Submit every batch of the model at `time`, with `placement` as the root transform.
    ///
    /// Static root batches go first, then each dynamic node in depth-first pre-order with its
    /// pose composed onto its parent's.
    pub fn render_at(&self, placement: Trs, time: f64, sink: &mut dyn DrawSink) {
        for batch in &self.static_batches {
            sink.draw(&placement, batch);
        }
        let local = self.local_time(time);
        for root in &self.roots {
            self.visit(root, &placement, local, &mut |node, world| {
                for batch in &node.static_batches {
                    sink.draw(world, batch);
                }
            });
        }
    }

    /// World transform of every dynamic node at `time`, in render order.
    pub fn world_poses(&self, time: f64) -> Vec<(NodeId, Trs)> {
        let local = self.local_time(time);
        let mut out = Vec::new();
        for root in &self.roots {
            self.visit(root, &Trs::IDENTITY, local, &mut |node, world| {
                out.push((node.id, *world))
            });
        }
        out
    }

    fn visit(
        &self,
        node: &CompactedNode,
        parent: &Trs,
        local: f32,
        f: &mut impl FnMut(&CompactedNode, &Trs),
    ) {
        let world = parent.compose(&self.pose_at_local(node, local));
        f(node, &world);
        for child in &node.children {
            self.visit(child, &world, local, f);
        }
    }

    fn pose_at_local(&self, node: &CompactedNode, local: f32) -> Trs {
        let Some(indices) = self.by_node.get(&node.id) else {
            return node.base;
        };

        let mut translation: Option<Vec3> = None;
        let mut rotation: Option<Quat> = None;
        let mut scale: Option<Vec3> = None;
        for &i in indices {
            match self.channels[i].sample(local) {
                Some(ChannelSample::Translation(v)) => {
                    *translation.get_or_insert(Vec3::ZERO) += v;
                }
                Some(ChannelSample::Scale(v)) => {
                    *scale.get_or_insert(Vec3::ZERO) += v;
                }
                Some(ChannelSample::Rotation(q)) => {
                    let acc = rotation.get_or_insert(Quat::IDENTITY);
                    *acc = *acc * q;
                }
                None => {}
            }
        }

        Trs {
            translation: translation.unwrap_or(node.base.translation),
            rotation: rotation.map_or(node.base.rotation, normalize_quat_or_identity),
            scale: scale.unwrap_or(node.base.scale),
        }
    }
}

/// Ids of every node that survives exclusion.
fn collect_live(node: &SceneNode, excluded: &BTreeSet<NodeId>, out: &mut HashSet<NodeId>) {
    if excluded.contains(&node.id) {
        return;
    }
    out.insert(node.id);
    for child in &node.children {
        collect_live(child, excluded, out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/model.rs"]
mod tests;
