use hecs::{Entity, World};

use crate::components::Hitbox;

/// Count down hitbox lifetimes and despawn the expired ones.
pub fn hitbox_lifetime_system(world: &mut World, dt: f32) {
    let expired: Vec<(Entity, Entity)> = world
        .query_mut::<&mut Hitbox>()
        .into_iter()
        .filter_map(|(entity, hitbox)| {
            hitbox.remaining -= dt;
            (hitbox.remaining <= 0.0).then_some((entity, hitbox.owner))
        })
        .collect();

    for (entity, owner) in expired {
        log::trace!("hitbox {:?} of {:?} expired", entity, owner);
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::components::Player;
    use crate::scene::prefabs::spawn_attack_hitbox;

    #[test]
    fn hitbox_expires_after_lifetime() {
        let mut world = World::new();
        let owner = world.spawn((Player,));
        let hitbox = spawn_attack_hitbox(&mut world, owner, Vec3::ZERO, 1.0, 0.25, "AttackHitbox");

        hitbox_lifetime_system(&mut world, 0.125);
        assert!(world.contains(hitbox));
        hitbox_lifetime_system(&mut world, 0.125);
        assert!(!world.contains(hitbox));
        assert!(world.contains(owner));
    }
}
