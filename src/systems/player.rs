use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{LocalTransform, Player};
use crate::config::PlayerConfig;
use crate::engine::input::InputState;
use crate::input_actions::{InputActionAsset, ATTACK, MOVE};
use crate::scene::prefabs::spawn_attack_hitbox;

/// Move the player by the Move action and spawn an attack hitbox on Attack.
///
/// The Move vector's `y` maps to world `z`. Returns the hitbox spawned this
/// frame, if any.
pub fn player_control_system(
    world: &mut World,
    actions: &InputActionAsset,
    input: &InputState,
    config: &PlayerConfig,
    hitbox_tag: &str,
    dt: f32,
) -> Option<Entity> {
    let stick = actions.read_vector(MOVE, input);
    let step = Vec3::new(stick.x, 0.0, stick.y) * config.speed * dt;
    let attacking = actions.was_pressed(ATTACK, input);

    let mut attack_origin = None;
    for (entity, (local, _player)) in world.query_mut::<(&mut LocalTransform, &Player)>() {
        local.position += step;
        if attacking {
            attack_origin = Some((entity, local.position));
        }
    }

    let (owner, position) = attack_origin?;
    log::debug!("player attacks at {:?}", position);
    Some(spawn_attack_hitbox(
        world,
        owner,
        position,
        config.attack_radius,
        config.attack_lifetime,
        hitbox_tag,
    ))
}
