use serde::{Deserialize, Serialize};

/// The four player animations a host can be asked to play.
///
/// At most one is active per frame; the host decides how each one is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Animation {
    Idle,
    Jump,
    WalkLeft,
    WalkRight,
}

impl Animation {
    /// Atlas key the host registers this animation under.
    pub fn key(self) -> &'static str {
        match self {
            Animation::Idle => "guy-idle",
            Animation::Jump => "guy-jumping",
            Animation::WalkLeft => "guy-walking-left",
            Animation::WalkRight => "guy-walking-right",
        }
    }
}

/// A named sequence of atlas frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub key: String,
    pub atlas: String,
    pub frames: Vec<String>,
    /// Frames per second. Ignored for single-frame clips.
    pub frame_rate: u32,
    pub looping: bool,
}

impl AnimationClip {
    /// A clip that shows one frame and never advances.
    pub fn still(key: &str, atlas: &str, frame: &str) -> Self {
        Self {
            key: key.to_string(),
            atlas: atlas.to_string(),
            frames: vec![frame.to_string()],
            frame_rate: 0,
            looping: false,
        }
    }

    /// A looping clip over `prefix{start..=end}suffix` frame names.
    pub fn looping(
        key: &str,
        atlas: &str,
        prefix: &str,
        range: std::ops::RangeInclusive<u32>,
        suffix: &str,
        frame_rate: u32,
    ) -> Self {
        Self {
            key: key.to_string(),
            atlas: atlas.to_string(),
            frames: frame_names(prefix, range, suffix),
            frame_rate,
            looping: true,
        }
    }
}

/// Expand a numbered atlas frame range, e.g. `run-1.png` .. `run-12.png`.
pub fn frame_names(
    prefix: &str,
    range: std::ops::RangeInclusive<u32>,
    suffix: &str,
) -> Vec<String> {
    range.map(|i| format!("{prefix}{i}{suffix}")).collect()
}
