use crate::foundation::core::{NodeId, Quat, Vec3};
use crate::foundation::error::{ModelError, ModelResult};
use crate::transform::lerp::Lerp;

/// One sample of an animated property.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    /// Time of the sample, in seconds.
    pub time: f32,
    /// Property value at `time`.
    pub value: T,
}

impl<T> Keyframe<T> {
    /// Build a keyframe.
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Transform property driven by a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelProperty {
    /// Translation, summed across channels.
    Translation,
    /// Rotation, multiplied across channels.
    Rotation,
    /// Scale, summed across channels.
    Scale,
}

/// Keyframes of one channel, typed by the property they drive.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "property", content = "keys", rename_all = "snake_case")]
pub enum ChannelKeyframes {
    /// Translation keys.
    Translation(Vec<Keyframe<Vec3>>),
    /// Rotation keys, `[x, y, z, w]`.
    Rotation(Vec<Keyframe<Quat>>),
    /// Scale keys.
    Scale(Vec<Keyframe<Vec3>>),
}

/// A value sampled from a channel at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChannelSample {
    /// Sampled translation.
    Translation(Vec3),
    /// Sampled rotation.
    Rotation(Quat),
    /// Sampled scale.
    Scale(Vec3),
}

/// Keyframe animation of one property of one node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Channel {
    /// Node whose transform is animated.
    pub target: NodeId,
    /// Time-sorted keyframes.
    pub keyframes: ChannelKeyframes,
}

impl Channel {
    /// Translation channel.
    pub fn translation(target: NodeId, keys: Vec<Keyframe<Vec3>>) -> Self {
        Self {
            target,
            keyframes: ChannelKeyframes::Translation(keys),
        }
    }

    /// Rotation channel.
    pub fn rotation(target: NodeId, keys: Vec<Keyframe<Quat>>) -> Self {
        Self {
            target,
            keyframes: ChannelKeyframes::Rotation(keys),
        }
    }

    /// Scale channel.
    pub fn scale(target: NodeId, keys: Vec<Keyframe<Vec3>>) -> Self {
        Self {
            target,
            keyframes: ChannelKeyframes::Scale(keys),
        }
    }

    /// Property this channel drives.
    pub fn property(&self) -> ChannelProperty {
        match self.keyframes {
            ChannelKeyframes::Translation(_) => ChannelProperty::Translation,
            ChannelKeyframes::Rotation(_) => ChannelProperty::Rotation,
            ChannelKeyframes::Scale(_) => ChannelProperty::Scale,
        }
    }

    /// Number of keyframes.
    pub fn len(&self) -> usize {
        match &self.keyframes {
            ChannelKeyframes::Translation(k) | ChannelKeyframes::Scale(k) => k.len(),
            ChannelKeyframes::Rotation(k) => k.len(),
        }
    }

    /// `true` when the channel has no keyframes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reject channels that cannot be sampled: no keys, non-finite times or values, or keys
    /// out of time order. Equal times are allowed.
    pub fn validate(&self) -> ModelResult<()> {
        match &self.keyframes {
            ChannelKeyframes::Translation(k) | ChannelKeyframes::Scale(k) => {
                validate_keys(k, |v| v.is_finite())
            }
            ChannelKeyframes::Rotation(k) => validate_keys(k, |q| q.is_finite()),
        }
    }

    /// Largest keyframe time, or `0.0` for an empty channel.
    pub fn max_time(&self) -> f32 {
        fn max<T>(keys: &[Keyframe<T>]) -> f32 {
            keys.iter().map(|k| k.time).fold(0.0, f32::max)
        }
        match &self.keyframes {
            ChannelKeyframes::Translation(k) | ChannelKeyframes::Scale(k) => max(k),
            ChannelKeyframes::Rotation(k) => max(k),
        }
    }

    /// Value of the channel at local time `t`, or `None` for an empty channel.
    pub fn sample(&self, t: f32) -> Option<ChannelSample> {
        match &self.keyframes {
            ChannelKeyframes::Translation(k) => {
                sample_keyframes(k, t).map(ChannelSample::Translation)
            }
            ChannelKeyframes::Rotation(k) => sample_keyframes(k, t).map(ChannelSample::Rotation),
            ChannelKeyframes::Scale(k) => sample_keyframes(k, t).map(ChannelSample::Scale),
        }
    }
}

fn validate_keys<T>(keys: &[Keyframe<T>], finite: impl Fn(&T) -> bool) -> ModelResult<()> {
    if keys.is_empty() {
        return Err(ModelError::animation("channel has no keyframes"));
    }
    if let Some(i) = keys
        .iter()
        .position(|k| !k.time.is_finite() || !finite(&k.value))
    {
        return Err(ModelError::animation(format!(
            "keyframe {i} has a non-finite time or value"
        )));
    }
    if !keys.windows(2).all(|w| w[0].time <= w[1].time) {
        return Err(ModelError::animation("keyframes must be sorted by time"));
    }
    Ok(())
}

/// Sample time-sorted keyframes at `t`.
///
/// The next key is the first one strictly after `t`, wrapping to the first key; the previous
/// key is the last one at or before `t`, wrapping to the last key. Duplicate times therefore
/// resolve to the last of them. When both keys share a time the next value is returned as is;
/// otherwise the factor is clamped to `[0, 1]`, which holds the boundary values outside the
/// keyed range. The wrap segment from the last key back to the first is not interpolated.
pub fn sample_keyframes<T: Lerp + Copy>(keys: &[Keyframe<T>], t: f32) -> Option<T> {
    let first = keys.first()?;
    let last = keys.last()?;
    let idx = keys.partition_point(|k| k.time <= t);
    let next = keys.get(idx).unwrap_or(first);
    let prev = idx.checked_sub(1).map_or(last, |i| &keys[i]);

    let span = next.time - prev.time;
    if span == 0.0 {
        return Some(next.value);
    }
    let f = ((t - prev.time) / span).clamp(0.0, 1.0);
    Some(T::lerp(&prev.value, &next.value, f))
}

/// One named animation of an asset.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationClip {
    /// Clip name as authored.
    pub name: String,
    /// Channels of the clip.
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl AnimationClip {
    /// Build a clip.
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        Self {
            name: name.into(),
            channels,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/channel.rs"]
mod tests;
