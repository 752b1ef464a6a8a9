use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval_at};

use fruitquest_core::events::LevelEvent;
use fruitquest_level::FruitLevel;

use crate::script::ReplayScript;

/// One level behind the single mutex that serialises every mutation.
pub type SharedLevel = Arc<Mutex<FruitLevel>>;

pub fn share(level: FruitLevel) -> SharedLevel {
    Arc::new(Mutex::new(level))
}

/// Lock a level, recovering the guard if a previous holder panicked.
pub fn lock(level: &SharedLevel) -> MutexGuard<'_, FruitLevel> {
    level.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What happened during a driven session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub final_score: u32,
    pub seconds_elapsed: u32,
    /// Every event the level emitted, in order.
    pub events: Vec<LevelEvent>,
}

/// Drive a level to the end of its countdown.
///
/// Every `period` the scripted steps for the current second are applied
/// (input first, then overlaps) and the level is ticked. Stops when the level
/// asks for the timer to be stopped. The lock is never held across an await.
pub async fn run_session(
    level: SharedLevel,
    script: ReplayScript,
    period: Duration,
) -> SessionSummary {
    let mut events = lock(&level).start();
    let mut ticker = interval_at(Instant::now() + period, period);
    // A late tick pushes the schedule back; countdown seconds never arrive early.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut second = 0u32;

    loop {
        ticker.tick().await;

        let (stop, final_score) = {
            let mut level = lock(&level);
            for step in script.steps_at(second) {
                events.extend(level.update(&step.input));
                for &id in &step.collect {
                    events.extend(level.on_overlap(id).events);
                }
            }
            let tick_events = level.on_tick();
            let stop = tick_events.contains(&LevelEvent::StopTimer)
                || !level.session().is_active();
            events.extend(tick_events);
            (stop, level.session().score())
        };
        second += 1;

        if stop {
            tracing::info!(seconds = second, final_score, "Countdown finished");
            return SessionSummary {
                final_score,
                seconds_elapsed: second,
                events,
            };
        }
    }
}

/// One-line log rendering of an event, naming assets by their host keys.
pub fn describe(event: &LevelEvent) -> String {
    match event {
        LevelEvent::SetupWorld(world) => format!(
            "world {} {}x{} spawn ({}, {})",
            world.tilemap, world.width, world.height, world.spawn_x, world.spawn_y
        ),
        LevelEvent::RegisterClip(clip) => {
            format!("clip {} ({} frames)", clip.key, clip.frames.len())
        },
        LevelEvent::SpawnCollectible(spawn) => format!(
            "fruit {} at ({}, {}) x{}",
            spawn.id, spawn.x, spawn.y, spawn.scale_x
        ),
        LevelEvent::PlayAnimation(animation) => format!("animate {}", animation.key()),
        LevelEvent::Move(motion) => format!("move {motion:?}"),
        LevelEvent::PlayCue(cue) => format!("sound {}", cue.key()),
        LevelEvent::SetHud { text, .. } => format!("hud {text}"),
        LevelEvent::DisableCollectible(id) => format!("disable fruit {id}"),
        LevelEvent::StopTimer => "stop timer".to_string(),
        LevelEvent::SessionClosed { final_score } => format!("closed with {final_score}"),
    }
}

/// Spawn [`run_session`] on the current runtime.
pub fn spawn_countdown(
    level: SharedLevel,
    script: ReplayScript,
    period: Duration,
) -> tokio::task::JoinHandle<SessionSummary> {
    tokio::spawn(run_session(level, script, period))
}
