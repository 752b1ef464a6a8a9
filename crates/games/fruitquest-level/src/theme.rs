use serde::{Deserialize, Serialize};

use fruitquest_core::animation::{Animation, AnimationClip};

use crate::movement::MovementModel;

/// Atlas holding the player's frames.
pub const PLAYER_ATLAS: &str = "guy";
/// Frame rate of the looping player animations.
pub const PLAYER_FRAME_RATE: u32 = 15;

/// Which fruit a level scatters, and how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectibleTheme {
    Cherry,
    Melon,
}

impl CollectibleTheme {
    /// Name of the map object layer the fruit positions come from.
    pub fn object_layer(self) -> &'static str {
        match self {
            CollectibleTheme::Cherry => "fruit",
            CollectibleTheme::Melon => "foods",
        }
    }

    pub fn atlas(self) -> &'static str {
        match self {
            CollectibleTheme::Cherry => "cherry objects",
            CollectibleTheme::Melon => "melon objects",
        }
    }

    pub fn frame_count(self) -> u32 {
        match self {
            CollectibleTheme::Cherry => 16,
            CollectibleTheme::Melon => 17,
        }
    }

    pub fn frame_rate(self) -> u32 {
        match self {
            CollectibleTheme::Cherry => 10,
            CollectibleTheme::Melon => 5,
        }
    }

    /// The spinning-fruit clip every collectible of this theme loops.
    pub fn clip(self) -> AnimationClip {
        let prefix = match self {
            CollectibleTheme::Cherry => "cherry-",
            CollectibleTheme::Melon => "melon-",
        };
        AnimationClip::looping(
            self.atlas(),
            self.atlas(),
            prefix,
            1..=self.frame_count(),
            ".png",
            self.frame_rate(),
        )
    }
}

/// Player clips for a level. The position-offset level has no idle loop and
/// shows the first run frame instead.
pub fn player_clips(movement: &MovementModel) -> Vec<AnimationClip> {
    let idle = match movement {
        MovementModel::Delta { .. } => {
            AnimationClip::still(Animation::Idle.key(), PLAYER_ATLAS, "run-1.png")
        },
        MovementModel::Velocity { .. } => AnimationClip::looping(
            Animation::Idle.key(),
            PLAYER_ATLAS,
            "idle-",
            1..=11,
            ".png",
            PLAYER_FRAME_RATE,
        ),
    };
    vec![
        idle,
        AnimationClip::looping(
            Animation::WalkRight.key(),
            PLAYER_ATLAS,
            "run-",
            1..=12,
            ".png",
            PLAYER_FRAME_RATE,
        ),
        AnimationClip::looping(
            Animation::WalkLeft.key(),
            PLAYER_ATLAS,
            "run-",
            1..=12,
            "-right.png",
            PLAYER_FRAME_RATE,
        ),
        AnimationClip::still(Animation::Jump.key(), PLAYER_ATLAS, "jump.png"),
    ]
}
