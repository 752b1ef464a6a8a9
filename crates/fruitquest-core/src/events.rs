use serde::{Deserialize, Serialize};

use crate::animation::{Animation, AnimationClip};

/// Identifier of a collectible within one level instance.
pub type CollectibleId = u32;

/// Sound effects a level asks the host to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    /// A fruit was picked up.
    FruitCollected,
    /// The countdown reached zero.
    TimesUp,
}

impl AudioCue {
    /// Asset key the host loaded the cue under.
    pub fn key(self) -> &'static str {
        match self {
            AudioCue::FruitCollected => "fruit collected",
            AudioCue::TimesUp => "times up",
        }
    }
}

/// Screen-fixed HUD text slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HudSlot {
    Timer,
    Score,
}

/// How the host should move the player this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Shift the sprite position directly, in pixels (y grows downward).
    Offset { dx: f32, dy: f32 },
    /// Set body velocity. `vy` is `None` when vertical velocity is left to gravity.
    Velocity { vx: f32, vy: Option<f32> },
}

/// World, camera and physics bounds for a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSetup {
    pub tilemap: String,
    pub width: f32,
    pub height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// `None` when the player is moved by offsets and has no gravity.
    pub gravity_y: Option<f32>,
}

/// A fruit sprite to place. Origin is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleSpawn {
    pub id: CollectibleId,
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Key of the registered clip the sprite loops.
    pub clip: String,
}

/// Commands a level emits for the render/physics host to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LevelEvent {
    /// Load the map and fit the world and camera bounds to it.
    SetupWorld(WorldSetup),
    RegisterClip(AnimationClip),
    SpawnCollectible(CollectibleSpawn),
    PlayAnimation(Animation),
    Move(Motion),
    PlayCue(AudioCue),
    SetHud { slot: HudSlot, text: String },
    /// Hide the collectible and remove its body from the overlap group.
    DisableCollectible(CollectibleId),
    /// Stop the once-per-second countdown schedule.
    StopTimer,
    SessionClosed { final_score: u32 },
}
