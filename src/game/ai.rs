//! Enemy AI Director
//!
//! Per-enemy state machine. An enemy whose target player is alive seeks
//! it; otherwise it wanders. Headings are re-evaluated on a timer or
//! immediately when a move is blocked. Only seeking enemies fire.

use serde::{Serialize, Deserialize};

use crate::config::EnemyConfig;
use crate::core::heading::Heading;
use crate::core::rect::Rect;
use crate::core::rng::DeterministicRng;
use crate::core::vec2::FixedVec2;
use crate::game::actor::{EnemyActor, PlayerSlot};
use crate::game::map::ObstacleField;
use crate::game::projectile::Projectile;

/// What the enemy did on its latest update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiMode {
    /// No live target: random headings, no firing
    #[default]
    Wandering,
    /// Target alive: steer toward it and fire when close
    Seeking,
}

/// Per-enemy director state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyAi {
    /// Assigned target. Never reassigned while the enemy lives.
    pub target: Option<PlayerSlot>,
    /// Mode used on the most recent update
    pub mode: AiMode,
    /// Ticks since the last timed heading change
    pub move_timer: u32,
    /// Ticks between timed heading changes
    pub move_duration: u32,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
}

impl EnemyAi {
    /// Fresh state: wandering, timer and cooldown at zero.
    pub fn new(target: Option<PlayerSlot>, move_duration: u32) -> Self {
        Self {
            target,
            mode: AiMode::Wandering,
            move_timer: 0,
            move_duration,
            fire_cooldown: 0,
        }
    }
}

/// World data an enemy reads while deciding.
pub struct AiContext<'a> {
    /// Arena layout
    pub obstacles: &'a ObstacleField,
    /// Enemy tunables
    pub config: &'a EnemyConfig,
    /// Speed given to enemy shots (units per tick)
    pub projectile_speed: i32,
    /// Simulation clock (ms)
    pub now: u64,
}

/// Uniformly random heading.
#[inline]
pub fn wander_heading(rng: &mut DeterministicRng) -> Heading {
    Heading::from_index(rng.next_int(4))
}

/// Face the target along the axis with the larger separation, then with
/// `noise_percent` chance replace that with a random heading.
///
/// Ties on the axes go vertical.
pub fn seek_heading(
    from: &Rect,
    target: &Rect,
    rng: &mut DeterministicRng,
    noise_percent: u32,
) -> Heading {
    let dx = from.x - target.x;
    let dy = from.y - target.y;

    let heading = if dx.abs() > dy.abs() {
        if dx > 0 { Heading::Left } else { Heading::Right }
    } else if dy > 0 {
        Heading::Up
    } else {
        Heading::Down
    };

    if rng.roll_percent(noise_percent) {
        wander_heading(rng)
    } else {
        heading
    }
}

fn choose_heading(
    from: &Rect,
    target: Option<&Rect>,
    rng: &mut DeterministicRng,
    config: &EnemyConfig,
) -> Heading {
    match target {
        Some(t) => seek_heading(from, t, rng, config.seek_noise_percent),
        None => wander_heading(rng),
    }
}

/// Run one tick of AI for `enemy`. Returns the shot fired, if any.
///
/// `target` is the target's hit-box, and is `None` whenever the target
/// slot is unset, absent or dead. Frozen enemies neither move nor fire,
/// but their status timers still run.
pub fn update_enemy(
    enemy: &mut EnemyActor,
    target: Option<Rect>,
    rng: &mut DeterministicRng,
    ctx: &AiContext<'_>,
) -> Option<Projectile> {
    if !enemy.actor.alive {
        return None;
    }
    if enemy.actor.is_frozen() {
        enemy.actor.update_status(ctx.now);
        return None;
    }

    enemy.ai.mode = if target.is_some() { AiMode::Seeking } else { AiMode::Wandering };
    let config = ctx.config;

    // Timed re-evaluation
    enemy.ai.move_timer += 1;
    if enemy.ai.move_timer >= enemy.ai.move_duration {
        enemy.actor.heading = choose_heading(&enemy.rect(), target.as_ref(), rng, config);
        enemy.ai.move_timer = 0;
    }

    // Single-axis step; anything in the way forces a new heading now
    let (dx, dy) = enemy.actor.heading.step(config.speed);
    let delta = FixedVec2::from_ints(dx, dy);
    let next = enemy.actor.tentative_rect(delta);
    let moved = Rect::ARENA.contains_rect(&next) && enemy.actor.try_move(delta, ctx.obstacles, None);
    if !moved {
        enemy.actor.heading = choose_heading(&enemy.rect(), target.as_ref(), rng, config);
    }

    let shot = target.and_then(|t| try_fire(enemy, &t, rng, ctx));

    enemy.actor.update_status(ctx.now);
    shot
}

fn try_fire(
    enemy: &mut EnemyActor,
    target: &Rect,
    rng: &mut DeterministicRng,
    ctx: &AiContext<'_>,
) -> Option<Projectile> {
    let config = ctx.config;

    if enemy.ai.fire_cooldown > 0 {
        enemy.ai.fire_cooldown -= 1;
    }
    if enemy.ai.fire_cooldown > 0 {
        return None;
    }

    let me = enemy.rect();
    let distance = (me.x - target.x).abs() + (me.y - target.y).abs();
    if distance >= config.fire_range || !rng.roll_percent(config.fire_chance_percent) {
        return None;
    }

    enemy.ai.fire_cooldown = config.fire_cooldown_ticks;
    let owner = enemy.shooter();
    Some(enemy.actor.fire(owner, ctx.projectile_speed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> EnemyConfig {
        EnemyConfig {
            seek_noise_percent: 0,
            ..EnemyConfig::default()
        }
    }

    fn enemy_at(x: i32, y: i32, heading: Heading, target: Option<PlayerSlot>) -> EnemyActor {
        EnemyActor::new(0, Rect::new(x, y, 40, 40), heading, EnemyAi::new(target, 50))
    }

    #[test]
    fn test_seek_heading_axes() {
        let mut rng = DeterministicRng::new(1);
        let me = Rect::new(400, 400, 40, 40);

        assert_eq!(seek_heading(&me, &Rect::new(100, 380, 40, 40), &mut rng, 0), Heading::Left);
        assert_eq!(seek_heading(&me, &Rect::new(700, 420, 40, 40), &mut rng, 0), Heading::Right);
        assert_eq!(seek_heading(&me, &Rect::new(390, 100, 40, 40), &mut rng, 0), Heading::Up);
        assert_eq!(seek_heading(&me, &Rect::new(410, 700, 40, 40), &mut rng, 0), Heading::Down);
        // Equal separation goes vertical
        assert_eq!(seek_heading(&me, &Rect::new(300, 300, 40, 40), &mut rng, 0), Heading::Up);
    }

    #[test]
    fn test_seek_noise_overrides_one_in_five() {
        let mut rng = DeterministicRng::new(2024);
        let me = Rect::new(400, 400, 40, 40);
        let target = Rect::new(400, 100, 40, 40);

        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            counts[seek_heading(&me, &target, &mut rng, 20) as usize] += 1;
        }

        // 20% replaced by a uniform heading: 85% Up, 5% each other way
        assert!((8_300..=8_700).contains(&counts[Heading::Up as usize]), "{counts:?}");
        for heading in [Heading::Left, Heading::Down, Heading::Right] {
            assert!((380..=620).contains(&counts[heading as usize]), "{counts:?}");
        }
    }

    #[test]
    fn test_heading_reevaluated_every_fifty_ticks() {
        let field = ObstacleField::from_obstacles(Vec::new());
        let config = quiet_config();
        let ctx = AiContext { obstacles: &field, config: &config, projectile_speed: 5, now: 0 };
        let mut rng = DeterministicRng::new(11);

        // Target straight above and out of fire range; enemy starts facing right
        let mut enemy = enemy_at(200, 400, Heading::Right, Some(PlayerSlot::One));
        let target = Rect::new(300, 40, 40, 40);

        for tick in 1..50 {
            update_enemy(&mut enemy, Some(target), &mut rng, &ctx);
            assert_eq!(enemy.actor.heading, Heading::Right, "tick {tick}");
            assert_eq!(enemy.ai.move_timer, tick);
        }
        assert_eq!(enemy.rect(), Rect::new(298, 400, 40, 40));

        update_enemy(&mut enemy, Some(target), &mut rng, &ctx);
        assert_eq!(enemy.actor.heading, Heading::Up);
        assert_eq!(enemy.ai.move_timer, 0);
        assert_eq!(enemy.rect(), Rect::new(298, 398, 40, 40));
    }

    #[test]
    fn test_wandering_enemies_never_seek_or_fire() {
        let field = ObstacleField::new();
        let config = EnemyConfig {
            fire_chance_percent: 100,
            ..EnemyConfig::default()
        };
        let ctx = AiContext { obstacles: &field, config: &config, projectile_speed: 5, now: 0 };
        let mut rng = DeterministicRng::new(77);

        let mut enemies = [
            enemy_at(200, 200, Heading::Right, None),
            enemy_at(400, 600, Heading::Up, None),
        ];

        for _ in 0..600 {
            for enemy in &mut enemies {
                assert!(update_enemy(enemy, None, &mut rng, &ctx).is_none());
                assert_eq!(enemy.ai.mode, AiMode::Wandering);
                assert_eq!(enemy.ai.fire_cooldown, 0);
                assert!(Rect::ARENA.contains_rect(&enemy.rect()));
                assert!(!field.blocks(&enemy.rect()));
            }
        }
        assert!(enemies.iter().all(|e| e.actor.projectiles.is_empty()));
    }

    #[test]
    fn test_blocked_move_rechooses_heading() {
        let field = ObstacleField::new();
        let config = quiet_config();
        let ctx = AiContext { obstacles: &field, config: &config, projectile_speed: 5, now: 0 };
        let mut rng = DeterministicRng::new(5);

        // Heading straight into the top border, target far below
        let mut enemy = enemy_at(40, 40, Heading::Up, Some(PlayerSlot::One));
        let target = Rect::new(40, 600, 40, 40);
        update_enemy(&mut enemy, Some(target), &mut rng, &ctx);

        assert_eq!(enemy.rect(), Rect::new(40, 40, 40, 40));
        assert_eq!(enemy.actor.heading, Heading::Down);
        assert_eq!(enemy.ai.mode, AiMode::Seeking);
    }

    #[test]
    fn test_fire_cooldown() {
        let field = ObstacleField::from_obstacles(Vec::new());
        let config = EnemyConfig {
            fire_chance_percent: 100,
            seek_noise_percent: 0,
            ..EnemyConfig::default()
        };
        let ctx = AiContext { obstacles: &field, config: &config, projectile_speed: 5, now: 0 };
        let mut rng = DeterministicRng::new(9);
        let mut enemy = enemy_at(200, 200, Heading::Right, Some(PlayerSlot::One));
        let target = Rect::new(240, 200, 40, 40);

        let fired: Vec<u32> = (1..=61)
            .filter(|_| update_enemy(&mut enemy, Some(target), &mut rng, &ctx).is_some())
            .collect();
        assert_eq!(fired, vec![1, 61]);
        assert_eq!(enemy.ai.fire_cooldown, 60);
    }

    #[test]
    fn test_out_of_range_never_fires() {
        let field = ObstacleField::from_obstacles(Vec::new());
        let config = EnemyConfig {
            fire_chance_percent: 100,
            ..quiet_config()
        };
        let ctx = AiContext { obstacles: &field, config: &config, projectile_speed: 5, now: 0 };
        let mut rng = DeterministicRng::new(9);
        let mut enemy = enemy_at(40, 40, Heading::Left, Some(PlayerSlot::One));
        let target = Rect::new(700, 700, 40, 40);

        for _ in 0..10 {
            assert!(update_enemy(&mut enemy, Some(target), &mut rng, &ctx).is_none());
        }
    }

    #[test]
    fn test_frozen_enemy_holds_still() {
        let field = ObstacleField::from_obstacles(Vec::new());
        let config = EnemyConfig {
            fire_chance_percent: 100,
            ..quiet_config()
        };
        let mut rng = DeterministicRng::new(2);
        let mut enemy = enemy_at(300, 300, Heading::Right, Some(PlayerSlot::One));
        let target = Rect::new(340, 300, 40, 40);
        enemy.actor.freeze(0, 5000);

        for now in (0..=5000).step_by(16) {
            let ctx = AiContext { obstacles: &field, config: &config, projectile_speed: 5, now };
            assert!(update_enemy(&mut enemy, Some(target), &mut rng, &ctx).is_none());
        }
        assert_eq!(enemy.rect(), Rect::new(300, 300, 40, 40));
        assert_eq!(enemy.ai.move_timer, 0);

        let ctx = AiContext { obstacles: &field, config: &config, projectile_speed: 5, now: 5001 };
        update_enemy(&mut enemy, Some(target), &mut rng, &ctx);
        assert!(!enemy.actor.is_frozen());

        let ctx = AiContext { obstacles: &field, config: &config, projectile_speed: 5, now: 5017 };
        assert!(update_enemy(&mut enemy, Some(target), &mut rng, &ctx).is_some());
        assert_eq!(enemy.rect().x, 302);
    }
}
