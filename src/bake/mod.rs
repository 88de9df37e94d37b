//! Asset-level entry points: one static model, or one animated model per clip.

use rayon::prelude::*;

use crate::animation::channel::AnimationClip;
use crate::animation::model::AnimatedModel;
use crate::foundation::error::{ModelError, ModelResult};
use crate::scene::node::SceneNode;

/// Settings shared by every bake entry point.
pub mod settings;

use settings::BakeSettings;

/// Bake `roots` without animation: every surviving node folds into model-level static batches.
#[tracing::instrument(skip_all)]
pub fn bake_static(roots: &[SceneNode], settings: &BakeSettings) -> ModelResult<AnimatedModel> {
    AnimatedModel::build(roots, Vec::new(), settings)
}

/// Bake one [`AnimatedModel`] per clip. The output keeps the order of `clips`.
///
/// With `settings.parallel` the clips are baked on a dedicated rayon pool sized by
/// `settings.threads`; each bake only reads the shared scene tree.
#[tracing::instrument(skip_all, fields(clips = clips.len(), parallel = settings.parallel))]
pub fn bake_clips(
    roots: &[SceneNode],
    clips: &[AnimationClip],
    settings: &BakeSettings,
) -> ModelResult<Vec<(String, AnimatedModel)>> {
    settings.validate()?;

    let bake_one = |clip: &AnimationClip| {
        AnimatedModel::build(roots, clip.channels.clone(), settings)
            .map(|model| (clip.name.clone(), model))
    };

    if !settings.parallel || clips.len() < 2 {
        return clips.iter().map(bake_one).collect();
    }

    let pool = build_thread_pool(settings.threads)?;
    pool.install(|| clips.par_iter().map(bake_one).collect())
}

fn build_thread_pool(threads: Option<usize>) -> ModelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ModelError::validation(
            "bake 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ModelError::bake(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/bake/bake.rs"]
mod tests;
