//! Shape Grazer headless runner
//!
//! Drives the simulation with a simple food-seeking player, turns overlaps
//! into eat/collision input and logs the score board. An optional first
//! argument names a JSON settings file.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use glam::Vec2;

    use shape_grazer::consts::FRAME_DT;
    use shape_grazer::sim::{EntityKind, FoodRef, GamePhase, SimulationController, TickInput, tick};
    use shape_grazer::{ScoreBoard, Settings};

    /// Two minutes at the nominal frame rate
    const FRAMES: u64 = 60 * 120;
    /// Frames spent on the game over screen before respawning
    const RESPAWN_DELAY_FRAMES: u64 = 90;
    /// Player speed in cells per second
    const PLAYER_SPEED: f32 = 4.0;

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let settings = match std::env::args().nth(1) {
            Some(path) => {
                log::info!("Loading settings from {}", path);
                Settings::from_json(&std::fs::read_to_string(path)?)?
            }
            None => Settings::default(),
        };

        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let mut sim = SimulationController::builder()
            .settings(settings)
            .seed(seed)
            .score_sink(ScoreBoard::new())
            .build()?;

        let mut dead_since = None;
        for frame in 0..FRAMES {
            if sim.phase() == GamePhase::GameOver {
                let since = *dead_since.get_or_insert(frame);
                if frame - since >= RESPAWN_DELAY_FRAMES {
                    sim.respawn();
                    dead_since = None;
                }
            }

            let input = plan_input(&sim, frame);
            tick(&mut sim, &input, FRAME_DT);

            for event in sim.drain_events() {
                log::trace!("{:?}", event);
            }
            if frame % 600 == 0 {
                log::info!(
                    "t={:.0}s score={} {} entities={} {} {}",
                    sim.time_secs(),
                    sim.current_score_display(),
                    sim.multiplier_display(),
                    sim.entities().len(),
                    sim.high_score_display(),
                    sim.last_score_display()
                );
            }
        }

        log::info!("Finished: {} {}", sim.high_score_display(), sim.last_score_display());
        Ok(())
    }

    /// Head for the nearest food, report whatever the player overlaps
    fn plan_input(sim: &SimulationController, frame: u64) -> TickInput {
        let Some(player) = sim.player() else {
            return TickInput::default();
        };

        let mut input = TickInput {
            // Pulse the boost now and then
            boost: (frame / 120) % 4 == 3,
            ..Default::default()
        };

        for contact in sim.contacts() {
            match contact.kind {
                EntityKind::Food => input.ate_food.push(FoodRef::Id(contact.id)),
                EntityKind::Enemy => input.collided_with_enemy = true,
                EntityKind::Player => {}
            }
        }

        let target = sim
            .entities()
            .iter()
            .filter(|e| e.kind == EntityKind::Food)
            .min_by(|a, b| {
                a.pos
                    .distance_squared(player.pos)
                    .partial_cmp(&b.pos.distance_squared(player.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| e.pos);

        if let Some(target) = target {
            let step = PLAYER_SPEED * FRAME_DT;
            let delta = target - player.pos;
            let next = if delta.length() <= step {
                target
            } else {
                player.pos + delta.normalize_or_zero() * step
            };
            input.move_to = Some(next);
        } else {
            // Nothing nearby, drift to find more
            input.move_to = Some(player.pos + Vec2::X * PLAYER_SPEED * FRAME_DT);
        }

        input
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
