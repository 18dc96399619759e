use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Hitbox, LocalTransform, Player, SphereCollider, Tag};
use crate::config::{EnemyConfig, PlayerConfig};
use crate::enemy::EnemyBuilder;
use crate::error::SceneError;

pub const PLAYER_TAG: &str = "Player";
pub const ENEMY_TAG: &str = "Enemy";

/// Find the entity enemies should chase.
pub fn resolve_target(world: &World) -> Result<Entity, SceneError> {
    world
        .query::<&Player>()
        .iter()
        .next()
        .map(|(entity, _)| entity)
        .ok_or(SceneError::TargetUnresolved)
}

pub fn spawn_player(world: &mut World, config: &PlayerConfig) -> Entity {
    world.spawn((
        Player,
        LocalTransform::new(config.position),
        SphereCollider {
            radius: config.radius,
        },
        Tag(PLAYER_TAG.to_string()),
    ))
}

/// Spawn an initialised enemy at `position`, chasing the player.
///
/// A missing player is not fatal: the enemy spawns without a target and the
/// tick system keeps retrying.
pub fn spawn_enemy(
    world: &mut World,
    config: &EnemyConfig,
    hitbox_tag: &str,
    position: Vec3,
) -> Result<Entity, SceneError> {
    let target = match resolve_target(world) {
        Ok(player) => Some(player),
        Err(SceneError::TargetUnresolved) => {
            log::warn!("enemy at {:?} spawned before the player; deferring target", position);
            None
        }
        Err(err) => return Err(err),
    };

    let mut enemy = EnemyBuilder::new(config, hitbox_tag).build(position, target)?;
    enemy.on_init()?;

    Ok(world.spawn((
        enemy,
        LocalTransform::new(position),
        SphereCollider {
            radius: config.radius,
        },
        Tag(ENEMY_TAG.to_string()),
    )))
}

pub fn spawn_attack_hitbox(
    world: &mut World,
    owner: Entity,
    position: Vec3,
    radius: f32,
    lifetime: f32,
    tag: &str,
) -> Entity {
    world.spawn((
        Hitbox {
            remaining: lifetime,
            owner,
        },
        LocalTransform::new(position),
        SphereCollider { radius },
        Tag(tag.to_string()),
    ))
}
