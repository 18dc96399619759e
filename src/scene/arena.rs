use hecs::{Entity, World};

use crate::config::SimConfig;
use crate::error::SceneError;
use crate::scene::prefabs::{spawn_enemy, spawn_player};

/// Populate the arena: the player first, then every configured enemy spawn.
/// Returns the player entity.
pub fn load_arena(world: &mut World, config: &SimConfig) -> Result<Entity, SceneError> {
    let player = spawn_player(world, &config.player);

    for spawn in &config.spawns {
        spawn_enemy(world, &config.enemy, &config.world.hitbox_tag, spawn.position)?;
    }
    log::info!("arena loaded with {} enemies", config.spawns.len());

    Ok(player)
}
