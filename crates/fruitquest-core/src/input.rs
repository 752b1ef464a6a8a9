use serde::{Deserialize, Serialize};

/// Directional key states sampled by the host once per frame.
///
/// `jump` is the space bar; `up` is the up arrow. Every level treats
/// either one as a jump request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    pub up: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputSnapshot {
    /// Whether the player is asking to go up this frame.
    pub fn wants_jump(&self) -> bool {
        self.up || self.jump
    }

    /// True when no tracked key is held.
    pub fn is_idle(&self) -> bool {
        !(self.up || self.left || self.right || self.jump)
    }
}
