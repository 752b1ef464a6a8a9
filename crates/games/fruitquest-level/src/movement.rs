use serde::{Deserialize, Serialize};

use fruitquest_core::animation::Animation;
use fruitquest_core::events::Motion;
use fruitquest_core::input::InputSnapshot;

/// Horizontal step per frame in the position-offset model, in pixels.
pub const DELTA_STEP_X: f32 = 5.0;
/// Vertical step per frame while up is held in the position-offset model.
pub const DELTA_JUMP_Y: f32 = 10.0;
/// Horizontal body speed in the velocity model.
pub const RUN_SPEED: f32 = 160.0;
/// Upward velocity applied every frame jump is held in the velocity model.
pub const JUMP_IMPULSE: f32 = 330.0;

/// How a level turns held keys into player movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementModel {
    /// Move the sprite directly by a fixed offset each frame. No physics body velocity.
    Delta { step_x: f32, jump_y: f32 },
    /// Drive the arcade body's velocity and let gravity pull the player down.
    Velocity { run_speed: f32, jump_impulse: f32 },
}

impl MovementModel {
    pub const fn delta() -> Self {
        MovementModel::Delta {
            step_x: DELTA_STEP_X,
            jump_y: DELTA_JUMP_Y,
        }
    }

    pub const fn velocity() -> Self {
        MovementModel::Velocity {
            run_speed: RUN_SPEED,
            jump_impulse: JUMP_IMPULSE,
        }
    }

    /// Motion the host should apply for this frame's input.
    pub fn motion(&self, input: &InputSnapshot) -> Motion {
        match *self {
            MovementModel::Delta { step_x, jump_y } => match choose_animation(input) {
                Animation::Jump => Motion::Offset {
                    dx: 0.0,
                    dy: -jump_y,
                },
                Animation::WalkRight => Motion::Offset { dx: step_x, dy: 0.0 },
                Animation::WalkLeft => Motion::Offset {
                    dx: -step_x,
                    dy: 0.0,
                },
                Animation::Idle => Motion::Offset { dx: 0.0, dy: 0.0 },
            },
            MovementModel::Velocity {
                run_speed,
                jump_impulse,
            } => {
                // Left is checked first here, unlike the animation choice.
                let vx = if input.left {
                    -run_speed
                } else if input.right {
                    run_speed
                } else {
                    0.0
                };
                let vy = input.wants_jump().then_some(-jump_impulse);
                Motion::Velocity { vx, vy }
            },
        }
    }

    /// Reject non-positive or non-finite parameters.
    pub fn validate(&self) -> Result<(), String> {
        let (a, b, names) = match *self {
            MovementModel::Delta { step_x, jump_y } => (step_x, jump_y, ("step_x", "jump_y")),
            MovementModel::Velocity {
                run_speed,
                jump_impulse,
            } => (run_speed, jump_impulse, ("run_speed", "jump_impulse")),
        };
        if !(a.is_finite() && a > 0.0) {
            return Err(format!("{} must be > 0, got {a}", names.0));
        }
        if !(b.is_finite() && b > 0.0) {
            return Err(format!("{} must be > 0, got {b}", names.1));
        }
        Ok(())
    }
}

/// Pick the single animation for this frame.
///
/// Priority: up/jump, then right, then left, then idle. First match wins.
pub fn choose_animation(input: &InputSnapshot) -> Animation {
    if input.wants_jump() {
        Animation::Jump
    } else if input.right {
        Animation::WalkRight
    } else if input.left {
        Animation::WalkLeft
    } else {
        Animation::Idle
    }
}
