pub mod collectibles;
pub mod config;
pub mod movement;
pub mod session;
pub mod theme;

use std::sync::Arc;

use fruitquest_core::events::{AudioCue, CollectibleId, HudSlot, LevelEvent};
use fruitquest_core::input::InputSnapshot;
use fruitquest_core::score::{ScoreSink, ScoreSubmission, UserId};

use collectibles::Collectible;
use config::LevelConfig;
use movement::choose_animation;
use session::{Collect, LevelSession, SessionError, Tick};
use theme::player_clips;

/// Host response to an overlap callback.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapResponse {
    /// Whether the host should separate the bodies. Fruit never blocks the
    /// player, so this is always false.
    pub separate: bool,
    pub events: Vec<LevelEvent>,
}

pub fn timer_text(seconds_remaining: u32) -> String {
    format!("Time left: {seconds_remaining}")
}

pub fn score_text(score: u32) -> String {
    format!("Fruits: {score}")
}

/// One running level: its session, its fruit and where finished scores go.
pub struct FruitLevel {
    config: LevelConfig,
    session: LevelSession,
    collectibles: Vec<Collectible>,
    user_id: UserId,
    sink: Arc<dyn ScoreSink>,
}

impl FruitLevel {
    pub fn new(
        config: LevelConfig,
        collectibles: Vec<Collectible>,
        user_id: UserId,
        sink: Arc<dyn ScoreSink>,
    ) -> Self {
        let session = LevelSession::new(config.level_id, config.countdown_secs);
        Self {
            config,
            session,
            collectibles,
            user_id,
            sink,
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn session(&self) -> &LevelSession {
        &self.session
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn remaining_collectibles(&self) -> usize {
        self.collectibles.iter().filter(|c| !c.is_consumed()).count()
    }

    /// Level setup: world bounds, clips, fruit sprites, then the initial HUD.
    pub fn start(&self) -> Vec<LevelEvent> {
        let fruit_clip = self.config.theme.clip();
        let spawns: Vec<LevelEvent> = self
            .collectibles
            .iter()
            .filter(|c| !c.is_consumed())
            .map(|c| LevelEvent::SpawnCollectible(c.spawn(&fruit_clip.key)))
            .collect();

        let mut events = vec![
            LevelEvent::SetupWorld(self.config.world_setup()),
            LevelEvent::RegisterClip(fruit_clip),
        ];
        events.extend(
            player_clips(&self.config.movement)
                .into_iter()
                .map(LevelEvent::RegisterClip),
        );
        events.extend(spawns);
        events.push(LevelEvent::SetHud {
            slot: HudSlot::Timer,
            text: timer_text(self.session.seconds_remaining()),
        });
        events.push(LevelEvent::SetHud {
            slot: HudSlot::Score,
            text: score_text(self.session.score()),
        });
        events
    }

    /// Per-frame animation and movement. Runs whether or not the clock is live.
    pub fn update(&self, input: &InputSnapshot) -> Vec<LevelEvent> {
        vec![
            LevelEvent::PlayAnimation(choose_animation(input)),
            LevelEvent::Move(self.config.movement.motion(input)),
        ]
    }

    /// Once-per-second countdown callback.
    pub fn on_tick(&mut self) -> Vec<LevelEvent> {
        match self.session.on_tick() {
            Tick::Counting { seconds_remaining } => vec![LevelEvent::SetHud {
                slot: HudSlot::Timer,
                text: timer_text(seconds_remaining),
            }],
            Tick::Expired { final_score } => {
                tracing::info!(
                    level = %self.config.name,
                    level_id = self.config.level_id,
                    final_score,
                    "Time is up"
                );
                let user_id = self.user_id.clone();
                if let Err(e) = self.submit_score(&user_id) {
                    tracing::warn!(
                        level_id = self.config.level_id,
                        error = %e,
                        "Score not submitted"
                    );
                }
                vec![
                    LevelEvent::SetHud {
                        slot: HudSlot::Timer,
                        text: timer_text(0),
                    },
                    LevelEvent::PlayCue(AudioCue::TimesUp),
                    LevelEvent::StopTimer,
                    LevelEvent::SessionClosed { final_score },
                ]
            },
            Tick::Ignored => {
                tracing::debug!(level_id = self.config.level_id, "Tick after close ignored");
                Vec::new()
            },
        }
    }

    /// Overlap callback from the physics host. Unknown ids are ignored.
    pub fn on_overlap(&mut self, id: CollectibleId) -> OverlapResponse {
        let mut events = Vec::new();
        if let Some(collectible) = self.collectibles.iter_mut().find(|c| c.id == id)
            && let Collect::Collected { score } = self.session.on_overlap(collectible)
        {
            events.push(LevelEvent::DisableCollectible(id));
            events.push(LevelEvent::SetHud {
                slot: HudSlot::Score,
                text: score_text(score),
            });
            events.push(LevelEvent::PlayCue(AudioCue::FruitCollected));
        }
        OverlapResponse {
            separate: false,
            events,
        }
    }

    /// Hand the finished session to the score sink. The sink returns
    /// immediately; network results never reach the level.
    pub fn submit_score(&mut self, user_id: &UserId) -> Result<ScoreSubmission, SessionError> {
        let submission = self.session.take_submission(user_id)?;
        tracing::debug!(
            level_id = submission.level_id,
            score = submission.score,
            "Submitting score"
        );
        self.sink.submit(submission.clone());
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectibles::{ObjectEntry, spawn_collectibles};
    use fruitquest_core::animation::{Animation, AnimationClip};
    use fruitquest_core::events::{CollectibleSpawn, Motion, WorldSetup};
    use fruitquest_core::test_helpers::{RecordingSink, keys, test_user};

    fn level_with(config: LevelConfig, fruit: usize) -> (FruitLevel, RecordingSink) {
        let entries: Vec<ObjectEntry> = (0..fruit)
            .map(|i| ObjectEntry {
                x: 100.0 + i as f32 * 48.0,
                y: 300.0,
                width: 16.0,
                height: 16.0,
            })
            .collect();
        let sink = RecordingSink::new();
        let level = FruitLevel::new(
            config,
            spawn_collectibles(&entries),
            test_user(),
            Arc::new(sink.clone()),
        );
        (level, sink)
    }

    fn run_ticks(level: &mut FruitLevel, n: usize) -> Vec<LevelEvent> {
        (0..n).flat_map(|_| level.on_tick()).collect()
    }

    #[test]
    fn start_shows_full_clock_and_zero_score() {
        let (level, _) = level_with(LevelConfig::cherry_grove(), 3);
        let hud: Vec<LevelEvent> = level
            .start()
            .into_iter()
            .filter(|e| matches!(e, LevelEvent::SetHud { .. }))
            .collect();
        assert_eq!(
            hud,
            vec![
                LevelEvent::SetHud {
                    slot: HudSlot::Timer,
                    text: "Time left: 30".to_string()
                },
                LevelEvent::SetHud {
                    slot: HudSlot::Score,
                    text: "Fruits: 0".to_string()
                },
            ]
        );
    }

    #[test]
    fn start_sets_up_melon_world() {
        let (level, _) = level_with(LevelConfig::melon_canyon(), 2);
        let events = level.start();

        assert_eq!(
            events[0],
            LevelEvent::SetupWorld(WorldSetup {
                tilemap: "level-3.json".to_string(),
                width: 1984.0,
                height: 608.0,
                spawn_x: 20.0,
                spawn_y: 350.0,
                gravity_y: Some(1000.0),
            })
        );

        let clips: Vec<&AnimationClip> = events
            .iter()
            .filter_map(|e| match e {
                LevelEvent::RegisterClip(clip) => Some(clip),
                _ => None,
            })
            .collect();
        assert_eq!(clips.len(), 5);
        assert_eq!(clips[0].key, "melon objects");
        assert_eq!(clips[0].frames.len(), 17);
        assert!(clips.iter().any(|c| c.key == Animation::Idle.key()));

        let spawns: Vec<&CollectibleSpawn> = events
            .iter()
            .filter_map(|e| match e {
                LevelEvent::SpawnCollectible(spawn) => Some(spawn),
                _ => None,
            })
            .collect();
        assert_eq!(spawns.len(), 2);
        assert_eq!(spawns[1].x, 148.0);
        assert_eq!((spawns[1].scale_x, spawns[1].scale_y), (1.0, 1.0));
        assert_eq!(spawns[1].clip, "melon objects");
    }

    #[test]
    fn training_world_has_no_gravity() {
        let (level, _) = level_with(LevelConfig::training(), 0);
        match &level.start()[0] {
            LevelEvent::SetupWorld(world) => assert_eq!(world.gravity_y, None),
            other => panic!("expected world setup, got {other:?}"),
        }
    }

    #[test]
    fn collecting_emits_hud_cue_and_disable() {
        let (mut level, _) = level_with(LevelConfig::cherry_grove(), 2);
        let resp = level.on_overlap(1);
        assert!(!resp.separate);
        assert_eq!(
            resp.events,
            vec![
                LevelEvent::DisableCollectible(1),
                LevelEvent::SetHud {
                    slot: HudSlot::Score,
                    text: "Fruits: 1".to_string()
                },
                LevelEvent::PlayCue(AudioCue::FruitCollected),
            ]
        );
        assert_eq!(level.remaining_collectibles(), 1);

        let again = level.on_overlap(1);
        assert!(again.events.is_empty());
        assert!(!again.separate);
        assert_eq!(level.session().score(), 1);
    }

    #[test]
    fn unknown_collectible_is_ignored() {
        let (mut level, _) = level_with(LevelConfig::cherry_grove(), 1);
        assert!(level.on_overlap(99).events.is_empty());
        assert_eq!(level.session().score(), 0);
    }

    #[test]
    fn expiry_submits_exactly_once() {
        let (mut level, sink) = level_with(LevelConfig::melon_canyon(), 6);
        for id in 0..5 {
            level.on_overlap(id);
        }
        let events = run_ticks(&mut level, 30);
        assert!(events.contains(&LevelEvent::PlayCue(AudioCue::TimesUp)));
        assert!(events.contains(&LevelEvent::StopTimer));
        assert!(events.contains(&LevelEvent::SessionClosed { final_score: 5 }));
        assert!(!level.session().is_active());

        // Late ticks and overlaps change nothing.
        assert!(run_ticks(&mut level, 5).is_empty());
        assert!(level.on_overlap(5).events.is_empty());

        assert_eq!(
            sink.submissions(),
            vec![ScoreSubmission {
                score: 5,
                user_id: test_user(),
                level_id: 6,
            }]
        );
    }

    #[test]
    fn manual_submit_after_expiry_is_refused() {
        let (mut level, sink) = level_with(LevelConfig::cherry_grove(), 0);
        assert!(matches!(
            level.submit_score(&test_user()),
            Err(SessionError::StillActive { .. })
        ));
        run_ticks(&mut level, 30);
        assert_eq!(
            level.submit_score(&test_user()),
            Err(SessionError::AlreadySubmitted)
        );
        assert_eq!(sink.submissions().len(), 1);
    }

    #[test]
    fn update_follows_level_movement_model() {
        let (training, _) = level_with(LevelConfig::training(), 0);
        assert_eq!(
            training.update(&keys(true, true, false, false)),
            vec![
                LevelEvent::PlayAnimation(Animation::Jump),
                LevelEvent::Move(Motion::Offset { dx: 0.0, dy: -10.0 }),
            ]
        );

        let (grove, _) = level_with(LevelConfig::cherry_grove(), 0);
        assert_eq!(
            grove.update(&keys(false, false, true, false)),
            vec![
                LevelEvent::PlayAnimation(Animation::WalkLeft),
                LevelEvent::Move(Motion::Velocity {
                    vx: -160.0,
                    vy: None
                }),
            ]
        );
    }

    #[test]
    fn countdown_text_tracks_clock() {
        let (mut level, _) = level_with(LevelConfig::cherry_grove(), 0);
        assert_eq!(
            level.on_tick(),
            vec![LevelEvent::SetHud {
                slot: HudSlot::Timer,
                text: "Time left: 29".to_string()
            }]
        );
    }
}
