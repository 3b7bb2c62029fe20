//! Collision Detection
//!
//! Projectile-vs-tank hit detection. Detection only collects candidate
//! hits in deterministic order; the tick applies them and re-checks
//! eligibility as it goes.

use crate::core::rect::Rect;
use crate::game::actor::{EnemyId, PlayerSlot};
use crate::game::state::World;

/// AABB overlap. Touching edges do not count.
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// An enemy shot overlapping a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerHit {
    /// Index into `world.enemies`
    pub enemy_index: usize,
    /// Index into that enemy's projectiles
    pub shot_index: usize,
    /// Player that was hit
    pub victim: PlayerSlot,
}

/// A player shot overlapping an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyHit {
    /// Player whose shot landed
    pub shooter: PlayerSlot,
    /// Index into the shooter's projectiles
    pub shot_index: usize,
    /// Index into `world.enemies`
    pub enemy_index: usize,
    /// Id of the enemy at `enemy_index`
    pub enemy_id: EnemyId,
}

/// Every (enemy shot, alive player) overlap.
///
/// Order: enemies in list order, then players in slot order, then shots.
pub fn check_enemy_shots_on_players(world: &World) -> Vec<PlayerHit> {
    let mut hits = Vec::new();

    for (enemy_index, enemy) in world.enemies.iter().enumerate() {
        for player in world.players.iter().flatten().filter(|p| p.is_alive()) {
            let target = player.rect();
            for (shot_index, shot) in enemy.actor.projectiles.iter().enumerate() {
                if shot.active && intersects(&shot.rect, &target) {
                    hits.push(PlayerHit { enemy_index, shot_index, victim: player.slot });
                }
            }
        }
    }

    hits
}

/// Every (player shot, alive enemy) overlap.
///
/// Order: enemies in list order, then players in slot order, then shots.
pub fn check_player_shots_on_enemies(world: &World) -> Vec<EnemyHit> {
    let mut hits = Vec::new();

    for (enemy_index, enemy) in world.enemies.iter().enumerate() {
        if !enemy.is_alive() {
            continue;
        }
        let target = enemy.rect();
        for player in world.players.iter().flatten() {
            for (shot_index, shot) in player.actor.projectiles.iter().enumerate() {
                if shot.active && intersects(&shot.rect, &target) {
                    hits.push(EnemyHit {
                        shooter: player.slot,
                        shot_index,
                        enemy_index,
                        enemy_id: enemy.id,
                    });
                }
            }
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::core::heading::Heading;
    use crate::game::actor::EnemyActor;
    use crate::game::ai::EnemyAi;
    use crate::game::projectile::{Projectile, Shooter};
    use crate::game::state::GameMode;

    fn bare_world(mode: GameMode) -> World {
        let mut world = World::new(mode, 1, GameConfig::default());
        world.enemies.clear();
        world
    }

    #[test]
    fn test_intersects_is_strict() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(intersects(&a, &Rect::new(5, 5, 10, 10)));
        assert!(!intersects(&a, &Rect::new(10, 0, 10, 10)));
    }

    #[test]
    fn test_enemy_shot_on_player() {
        let mut world = bare_world(GameMode::SinglePlayer);
        let player_rect = world.players[0].as_ref().unwrap().rect();

        let mut enemy = EnemyActor::new(0, Rect::new(400, 400, 40, 40), Heading::Up, EnemyAi::new(None, 50));
        enemy.actor.projectiles.push(Projectile::spawn(
            player_rect.x + 5,
            player_rect.y + 5,
            Heading::Down,
            Shooter::Enemy(0),
            5,
        ));
        world.enemies.push(enemy);

        let hits = check_enemy_shots_on_players(&world);
        assert_eq!(hits, vec![PlayerHit { enemy_index: 0, shot_index: 0, victim: PlayerSlot::One }]);

        // Dead players are not hit
        world.players[0].as_mut().unwrap().actor.kill();
        assert!(check_enemy_shots_on_players(&world).is_empty());
    }

    #[test]
    fn test_player_shot_on_enemy() {
        let mut world = bare_world(GameMode::TwoPlayer);
        world.enemies.push(EnemyActor::new(7, Rect::new(400, 400, 40, 40), Heading::Up, EnemyAi::new(None, 50)));

        let shot = Projectile::spawn(415, 435, Heading::Up, Shooter::Player(PlayerSlot::Two), 5);
        world.players[1].as_mut().unwrap().actor.projectiles.push(shot);

        let mut spent = shot;
        spent.deactivate();
        world.players[0].as_mut().unwrap().actor.projectiles.push(spent);

        let hits = check_player_shots_on_enemies(&world);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].shooter, PlayerSlot::Two);
        assert_eq!(hits[0].enemy_id, 7);
    }
}
