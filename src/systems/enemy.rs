use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{LocalTransform, TriggerEvent};
use crate::enemy::Enemy;
use crate::scene::prefabs::resolve_target;

/// Per-frame enemy update: hand every enemy its target's position, then let
/// its state machine run. Enemies spawned before the player pick it up here.
///
/// A state machine error is logged against its enemy and does not stop the
/// others from ticking.
pub fn enemy_tick_system(world: &mut World, dt: f32) {
    let player = resolve_target(world).ok();

    let mut lookups: Vec<(Entity, Option<Entity>)> = Vec::new();
    for (entity, enemy) in world.query_mut::<&mut Enemy>() {
        if enemy.target().is_none() {
            if let Some(player) = player {
                log::info!("enemy {:?} resolved its target", entity);
                enemy.set_target(player);
            }
        }
        lookups.push((entity, enemy.target()));
    }

    // Collect first (drops the borrow), then dispatch.
    let ticks: Vec<(Entity, Option<Vec3>)> = lookups
        .into_iter()
        .map(|(entity, target)| {
            let position = target.and_then(|t| {
                world
                    .get::<&LocalTransform>(t)
                    .ok()
                    .map(|local| local.position)
            });
            (entity, position)
        })
        .collect();

    for (entity, target_position) in ticks {
        if let Ok(mut enemy) = world.get::<&mut Enemy>(entity) {
            if let Err(err) = enemy.on_tick(dt, target_position) {
                log::error!("enemy {:?} tick failed: {}", entity, err);
            }
        }
    }
}

/// Per-physics-step enemy update.
pub fn enemy_fixed_system(world: &mut World, dt: f32) {
    for (entity, enemy) in world.query_mut::<&mut Enemy>() {
        if let Err(err) = enemy.on_fixed_tick(dt) {
            log::error!("enemy {:?} fixed tick failed: {}", entity, err);
        }
    }
    enemy_transform_sync_system(world);
}

/// Copy each enemy's own transform onto its entity so colliders see it.
pub fn enemy_transform_sync_system(world: &mut World) {
    for (_entity, (enemy, local)) in world.query_mut::<(&Enemy, &mut LocalTransform)>() {
        *local = enemy.data.transform;
    }
}

/// Route trigger events to the enemies that received them. Returns the number
/// of hits taken.
pub fn enemy_trigger_system(world: &mut World, events: &[TriggerEvent]) -> usize {
    let mut hits = 0;
    for event in events {
        let Ok(mut enemy) = world.get::<&mut Enemy>(event.entity) else {
            continue;
        };
        match enemy.on_collision(&event.other_tag) {
            Ok(true) => {
                log::debug!("enemy {:?} hit by {:?}", event.entity, event.other);
                hits += 1;
            }
            Ok(false) => {}
            Err(err) => log::error!("enemy {:?} collision failed: {}", event.entity, err),
        }
    }
    hits
}

/// Remove destroyed enemies from the world. Returns the removed entities.
pub fn despawn_destroyed_system(world: &mut World) -> Vec<Entity> {
    let destroyed: Vec<Entity> = world
        .query_mut::<&Enemy>()
        .into_iter()
        .filter(|(_entity, enemy)| enemy.is_destroyed())
        .map(|(entity, _enemy)| entity)
        .collect();

    for entity in &destroyed {
        let _ = world.despawn(*entity);
    }
    destroyed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnemyConfig, PlayerConfig};
    use crate::enemy::{EnemyBuilder, EnemyData, EnemyState};
    use crate::fsm::{State, Transition};
    use crate::scene::prefabs::{spawn_enemy, spawn_player};

    const HITBOX: &str = "AttackHitbox";

    fn hit(entity: Entity) -> TriggerEvent {
        TriggerEvent {
            entity,
            other: entity,
            other_tag: HITBOX.to_string(),
        }
    }

    #[test]
    fn enemies_chase_the_player() {
        let mut world = World::new();
        spawn_player(&mut world, &PlayerConfig::default());
        let e = spawn_enemy(&mut world, &EnemyConfig::default(), HITBOX, Vec3::new(10.0, 0.0, 0.0))
            .unwrap();

        for _ in 0..10 {
            enemy_tick_system(&mut world, 0.1);
            enemy_fixed_system(&mut world, 0.1);
        }

        // move_speed 2.0 for 1 s of fixed steps
        let local = *world.get::<&LocalTransform>(e).unwrap();
        assert!(local.position.abs_diff_eq(Vec3::new(8.0, 0.0, 0.0), 1e-4));
        assert!(local.forward().abs_diff_eq(Vec3::NEG_X, 1e-5));
    }

    #[test]
    fn late_player_is_picked_up() {
        let mut world = World::new();
        let e = spawn_enemy(&mut world, &EnemyConfig::default(), HITBOX, Vec3::ZERO).unwrap();
        enemy_tick_system(&mut world, 0.1);
        assert_eq!(world.get::<&Enemy>(e).unwrap().target(), None);

        let player = spawn_player(&mut world, &PlayerConfig::default());
        enemy_tick_system(&mut world, 0.1);
        assert_eq!(world.get::<&Enemy>(e).unwrap().target(), Some(player));
    }

    #[test]
    fn lethal_hits_despawn_exactly_once() {
        let mut world = World::new();
        spawn_player(&mut world, &PlayerConfig::default());
        let config = EnemyConfig {
            health: 20,
            ..EnemyConfig::default()
        };
        let e = spawn_enemy(&mut world, &config, HITBOX, Vec3::ONE).unwrap();

        assert_eq!(enemy_trigger_system(&mut world, &[hit(e)]), 1);
        assert!(despawn_destroyed_system(&mut world).is_empty());
        assert_eq!(
            world.get::<&Enemy>(e).unwrap().current_state(),
            Some(EnemyState::Movement)
        );

        assert_eq!(enemy_trigger_system(&mut world, &[hit(e)]), 1);
        assert_eq!(despawn_destroyed_system(&mut world), vec![e]);
        assert!(!world.contains(e));

        // Late events for the removed entity go nowhere.
        assert_eq!(enemy_trigger_system(&mut world, &[hit(e)]), 0);
        assert!(despawn_destroyed_system(&mut world).is_empty());
        enemy_tick_system(&mut world, 0.1);
        enemy_fixed_system(&mut world, 0.1);
    }

    #[test]
    fn non_hitbox_events_do_nothing() {
        let mut world = World::new();
        let e = spawn_enemy(&mut world, &EnemyConfig::default(), HITBOX, Vec3::ZERO).unwrap();
        let event = TriggerEvent {
            entity: e,
            other: e,
            other_tag: "Player".to_string(),
        };
        assert_eq!(enemy_trigger_system(&mut world, &[event]), 0);
        assert_eq!(world.get::<&Enemy>(e).unwrap().health(), 100);
    }

    /// Movement that heads straight for Attack.
    struct Restless;

    impl State<EnemyState, EnemyData> for Restless {
        fn id(&self) -> EnemyState {
            EnemyState::Movement
        }

        fn update(&mut self, _data: &mut EnemyData, _dt: f32) -> Transition<EnemyState> {
            Transition::Go(EnemyState::Attack)
        }
    }

    /// Attack that keeps re-entering itself.
    struct Recursing;

    impl State<EnemyState, EnemyData> for Recursing {
        fn id(&self) -> EnemyState {
            EnemyState::Attack
        }

        fn enter(&mut self, _data: &mut EnemyData) -> Transition<EnemyState> {
            Transition::Go(EnemyState::Attack)
        }
    }

    #[test]
    fn one_failing_enemy_does_not_stall_the_rest() {
        let mut world = World::new();
        spawn_player(&mut world, &PlayerConfig::default());

        let mut broken = EnemyBuilder::new(&EnemyConfig::default(), HITBOX)
            .with_state(Box::new(Restless))
            .with_state(Box::new(Recursing))
            .build(Vec3::new(-10.0, 0.0, 0.0), None)
            .unwrap();
        broken.on_init().unwrap();
        let broken = world.spawn((broken, LocalTransform::new(Vec3::new(-10.0, 0.0, 0.0))));
        let healthy =
            spawn_enemy(&mut world, &EnemyConfig::default(), HITBOX, Vec3::new(10.0, 0.0, 0.0))
                .unwrap();

        enemy_tick_system(&mut world, 0.5);
        enemy_fixed_system(&mut world, 0.5);

        assert_eq!(
            world.get::<&Enemy>(broken).unwrap().current_state(),
            Some(EnemyState::Attack)
        );
        // move_speed 2.0 * 0.5 s toward the origin
        let local = *world.get::<&LocalTransform>(healthy).unwrap();
        assert!(local.position.abs_diff_eq(Vec3::new(9.0, 0.0, 0.0), 1e-4));
    }
}
