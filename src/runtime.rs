//! Fixed-Rate Runner
//!
//! Drives the simulation at a fixed tick rate on the calling thread.
//! Pacing sleeps only for whatever is left of the frame budget after the
//! tick's work, never longer.

use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use crate::core::heading::Heading;
use crate::core::rect::Rect;
use crate::game::actor::PlayerSlot;
use crate::game::events::GameEvent;
use crate::game::input::{InputFrame, PlayerInputBuffer, TickInputs};
use crate::game::state::World;
use crate::game::tick::tick;

/// Simulation time between progress log lines (ms).
const REPORT_INTERVAL_MS: u64 = 10_000;

// =============================================================================
// PACING
// =============================================================================

/// End-of-frame delay calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramePacer {
    budget: Duration,
    enabled: bool,
}

impl FramePacer {
    /// Pacer whose frame budget is one simulation tick.
    pub fn from_tick_ms(tick_ms: u64) -> Self {
        Self { budget: Duration::from_millis(tick_ms), enabled: true }
    }

    /// Never sleeps. Runs the simulation as fast as it goes.
    pub fn unpaced() -> Self {
        Self { budget: Duration::ZERO, enabled: false }
    }

    /// Length of one frame.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left in the frame after `work`, or `None` if nothing is left.
    pub fn remaining(&self, work: Duration) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        self.budget.checked_sub(work).filter(|d| !d.is_zero())
    }

    /// Sleep out the rest of a frame that began at `started`.
    pub fn pace(&self, started: Instant) {
        if let Some(delay) = self.remaining(started.elapsed()) {
            thread::sleep(delay);
        }
    }
}

// =============================================================================
// INPUT SOURCES
// =============================================================================

/// Supplies the inputs for the next tick.
pub trait InputSource {
    /// Inputs for the tick about to run against `world`.
    fn next_inputs(&mut self, world: &World) -> TickInputs;
}

impl<F> InputSource for F
where
    F: FnMut(&World) -> TickInputs,
{
    fn next_inputs(&mut self, world: &World) -> TickInputs {
        self(world)
    }
}

/// Deterministic autopilot: line up with the nearest enemy, face it and
/// fire. Sidesteps when stuck against an obstacle.
#[derive(Clone, Debug)]
pub struct ScriptedPilot {
    /// Ticks between fire presses
    fire_every: u32,
    last_rect: [Option<Rect>; 2],
    stuck_ticks: [u32; 2],
    detour: [Option<(Heading, u32)>; 2],
}

impl ScriptedPilot {
    /// Ticks without progress before a detour starts.
    const STUCK_LIMIT: u32 = 8;
    /// Detour length in ticks.
    const DETOUR_TICKS: u32 = 20;
    /// Offset under which a target counts as lined up (units).
    const ALIGN_TOLERANCE: i32 = 15;

    /// Pilot that presses fire at most once every `fire_every` ticks.
    pub fn new(fire_every: u32) -> Self {
        Self {
            fire_every: fire_every.max(1),
            last_rect: [None; 2],
            stuck_ticks: [0; 2],
            detour: [None; 2],
        }
    }

    fn steer(&mut self, world: &World, slot: PlayerSlot) -> InputFrame {
        let i = slot.index();
        let Some(me) = world.live_player_rect(slot) else {
            return InputFrame::new();
        };

        let Some(target) = nearest_enemy(world, &me) else {
            self.last_rect[i] = Some(me);
            return InputFrame::new();
        };

        if self.last_rect[i] == Some(me) {
            self.stuck_ticks[i] += 1;
        } else {
            self.stuck_ticks[i] = 0;
        }
        self.last_rect[i] = Some(me);

        if let Some((heading, left)) = self.detour[i] {
            self.detour[i] = (left > 1).then(|| (heading, left - 1));
            return InputFrame::holding(heading);
        }

        let dx = target.x - me.x;
        let dy = target.y - me.y;
        let (heading, lined_up) = if dx.abs() <= Self::ALIGN_TOLERANCE {
            (if dy < 0 { Heading::Up } else { Heading::Down }, true)
        } else if dy.abs() <= Self::ALIGN_TOLERANCE {
            (if dx < 0 { Heading::Left } else { Heading::Right }, true)
        } else if dx.abs() < dy.abs() {
            (if dx < 0 { Heading::Left } else { Heading::Right }, false)
        } else {
            (if dy < 0 { Heading::Up } else { Heading::Down }, false)
        };

        if self.stuck_ticks[i] >= Self::STUCK_LIMIT {
            self.stuck_ticks[i] = 0;
            let sidestep = Heading::from_index(heading as u32 + 1 + (world.tick / 64) % 2 * 2);
            self.detour[i] = Some((sidestep, Self::DETOUR_TICKS));
            return InputFrame::holding(sidestep);
        }

        let frame = InputFrame::holding(heading);
        if lined_up && (world.tick + 1) % self.fire_every == 0 {
            frame.with_fire()
        } else {
            frame
        }
    }
}

impl Default for ScriptedPilot {
    fn default() -> Self {
        Self::new(12)
    }
}

impl InputSource for ScriptedPilot {
    fn next_inputs(&mut self, world: &World) -> TickInputs {
        TickInputs::pair(
            self.steer(world, PlayerSlot::One),
            self.steer(world, PlayerSlot::Two),
        )
    }
}

/// Closest live enemy by Manhattan distance; first in list order on ties.
fn nearest_enemy(world: &World, from: &Rect) -> Option<Rect> {
    world
        .enemies
        .iter()
        .filter(|e| e.is_alive())
        .map(|e| e.rect())
        .min_by_key(|r| (r.x - from.x).abs() + (r.y - from.y).abs())
}

// =============================================================================
// RUNNER
// =============================================================================

/// Outcome of a run.
#[derive(Debug)]
pub struct RunSummary {
    /// Ticks actually simulated
    pub ticks: u32,
    /// Whether the run ended on game over rather than `max_ticks`
    pub game_over: bool,
    /// Every event produced, in order
    pub events: Vec<GameEvent>,
    /// Inputs fed to each player slot
    pub recordings: Vec<PlayerInputBuffer>,
}

/// Tick `world` until game over or `max_ticks`, pacing each frame.
///
/// Inputs for every player slot in the game are recorded so the run can
/// be replayed.
pub fn run_fixed_rate<S>(
    world: &mut World,
    source: &mut S,
    max_ticks: u32,
    pacer: &FramePacer,
) -> RunSummary
where
    S: InputSource + ?Sized,
{
    let mut recordings: Vec<PlayerInputBuffer> = PlayerSlot::ALL
        .into_iter()
        .filter(|slot| world.player(*slot).is_some())
        .map(|slot| PlayerInputBuffer::new(slot, world.seed))
        .collect();

    let mut events = world.take_events();
    let mut ticks = 0;
    let mut game_over = world.is_game_over();
    let mut next_report = world.clock_ms + REPORT_INTERVAL_MS;

    while !game_over && ticks < max_ticks {
        let started = Instant::now();

        let inputs = source.next_inputs(world);
        let next_tick = world.tick + 1;
        for recording in &mut recordings {
            recording.record(next_tick, inputs.get(recording.slot));
        }

        let result = tick(world, &inputs);
        ticks += 1;
        game_over = result.game_over;
        events.extend(result.events);

        if world.clock_ms >= next_report {
            info!(
                tick = world.tick,
                seconds = world.clock_ms / 1000,
                wave = world.wave_number(),
                score = world.score(),
                enemies = world.enemies.len(),
                "progress"
            );
            next_report += REPORT_INTERVAL_MS;
        }

        pacer.pace(started);
    }

    RunSummary { ticks, game_over, events, recordings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::state::GameMode;
    use crate::game::tick::replay;

    #[test]
    fn test_remaining_budget() {
        let pacer = FramePacer::from_tick_ms(16);
        assert_eq!(pacer.remaining(Duration::from_millis(10)), Some(Duration::from_millis(6)));
        assert_eq!(pacer.remaining(Duration::ZERO), Some(Duration::from_millis(16)));
        assert_eq!(pacer.remaining(Duration::from_millis(16)), None);
        assert_eq!(pacer.remaining(Duration::from_millis(40)), None);
    }

    #[test]
    fn test_budget_is_one_tick() {
        assert_eq!(FramePacer::from_tick_ms(16).budget(), Duration::from_millis(16));
        assert_eq!(FramePacer::unpaced().budget(), Duration::ZERO);
    }

    #[test]
    fn test_unpaced_never_sleeps() {
        let pacer = FramePacer::unpaced();
        assert_eq!(pacer.remaining(Duration::ZERO), None);
    }

    #[test]
    fn test_run_stops_at_max_ticks() {
        let mut world = World::new(GameMode::SinglePlayer, 3, GameConfig::default());
        let mut idle = |_: &World| TickInputs::idle();

        let summary = run_fixed_rate(&mut world, &mut idle, 120, &FramePacer::unpaced());
        assert_eq!(summary.ticks, 120);
        assert_eq!(world.tick, 120);
        assert_eq!(summary.recordings.len(), 1);
        assert_eq!(summary.recordings[0].slot, PlayerSlot::One);
    }

    #[test]
    fn test_run_stops_on_game_over() {
        let mut world = World::new(GameMode::SinglePlayer, 3, GameConfig::default());
        world.player_mut(PlayerSlot::One).unwrap().actor.kill();

        let summary = run_fixed_rate(&mut world, &mut ScriptedPilot::default(), 500, &FramePacer::unpaced());
        assert!(summary.game_over);
        assert_eq!(summary.ticks, 1);

        // Already over: nothing to run
        let summary = run_fixed_rate(&mut world, &mut ScriptedPilot::default(), 500, &FramePacer::unpaced());
        assert_eq!(summary.ticks, 0);
    }

    #[test]
    fn test_pilot_faces_lined_up_enemy() {
        let mut world = World::new(GameMode::SinglePlayer, 3, GameConfig::default());
        for enemy in &mut world.enemies {
            enemy.actor.position = crate::core::vec2::FixedVec2::from_ints(40, 400);
        }

        let mut pilot = ScriptedPilot::new(1);
        let inputs = pilot.next_inputs(&world);
        let frame = inputs.get(PlayerSlot::One);
        assert!(frame.is_held(Heading::Up));
        assert!(frame.fire_pressed());
        assert!(inputs.get(PlayerSlot::Two).is_idle());
    }

    #[test]
    fn test_scripted_run_replays_exactly() {
        let initial = World::new(GameMode::TwoPlayer, 2024, GameConfig::default());
        let mut world = initial.clone();

        let summary = run_fixed_rate(&mut world, &mut ScriptedPilot::default(), 900, &FramePacer::unpaced());
        assert_eq!(summary.recordings.len(), 2);

        let (replayed, events) = replay(initial, &summary.recordings, summary.ticks);
        assert_eq!(replayed.compute_hash(), world.compute_hash());
        assert_eq!(events.len(), summary.events.len());
    }
}
