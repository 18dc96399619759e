use hecs::{Entity, World};

use crate::config::SimConfig;
use crate::engine::input::InputState;
use crate::engine::time::FrameTimer;
use crate::enemy::Enemy;
use crate::input_actions::InputActionAsset;
use crate::scene::script::InputScript;
use crate::systems::{
    despawn_destroyed_system, enemy_fixed_system, enemy_tick_system, enemy_trigger_system,
    hitbox_lifetime_system, player_control_system, trigger_system, ContactTracker,
};

/// Running totals for one simulation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SimStats {
    pub frames: u32,
    pub fixed_steps: u32,
    pub attacks: u32,
    pub hits: u32,
    pub kills: u32,
}

/// Host loop: per-frame ticks, a fixed-step accumulator for physics, trigger
/// detection and despawning.
pub struct SimApp {
    world: World,
    player: Entity,
    config: SimConfig,
    actions: InputActionAsset,
    input: InputState,
    script: Option<InputScript>,
    contacts: ContactTracker,
    physics_accum: f32,
    stats: SimStats,
}

impl SimApp {
    pub fn new(world: World, player: Entity, config: SimConfig, actions: InputActionAsset) -> Self {
        let script = Some(InputScript::new(config.player.attack_interval));
        Self {
            world,
            player,
            config,
            actions,
            input: InputState::new(),
            script,
            contacts: ContactTracker::new(),
            physics_accum: 0.0,
            stats: SimStats::default(),
        }
    }

    /// Run until `frames` frames have elapsed or every enemy is gone.
    pub fn run(&mut self, timer: &mut FrameTimer, frames: u32) -> SimStats {
        for _ in 0..frames {
            let dt = timer.tick();
            self.frame(dt);
            if self.enemies_alive() == 0 {
                log::info!("all enemies down after {} frames", self.stats.frames);
                break;
            }
        }
        self.stats.clone()
    }

    pub fn frame(&mut self, dt: f32) {
        self.input.begin_frame();
        if let Some(script) = self.script.as_mut() {
            script.drive(&mut self.input, dt);
        }

        let spawned = player_control_system(
            &mut self.world,
            &self.actions,
            &self.input,
            &self.config.player,
            &self.config.world.hitbox_tag,
            dt,
        );
        if spawned.is_some() {
            self.stats.attacks += 1;
        }

        enemy_tick_system(&mut self.world, dt);

        let fixed_dt = self.config.world.fixed_dt;
        self.physics_accum += dt;
        while self.physics_accum >= fixed_dt {
            self.fixed_step(fixed_dt);
            self.physics_accum -= fixed_dt;
        }

        self.stats.frames += 1;
    }

    fn fixed_step(&mut self, dt: f32) {
        enemy_fixed_system(&mut self.world, dt);
        let events = trigger_system(&mut self.world, &mut self.contacts);
        self.stats.hits += enemy_trigger_system(&mut self.world, &events) as u32;
        // Expire after detection so a hitbox lives for at least one step.
        hitbox_lifetime_system(&mut self.world, dt);

        let removed = despawn_destroyed_system(&mut self.world);
        self.stats.kills += removed.len() as u32;
        self.stats.fixed_steps += 1;
    }

    pub fn enemies_alive(&self) -> usize {
        self.world.query::<&Enemy>().iter().count()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::components::LocalTransform;
    use crate::config::SpawnPoint;
    use crate::scene::arena::load_arena;

    fn app(config: SimConfig) -> SimApp {
        let mut world = World::new();
        let player = load_arena(&mut world, &config).unwrap();
        SimApp::new(world, player, config, InputActionAsset::default_player())
    }

    /// No scripted attacks; input only changes when a test presses something.
    fn unscripted(config: SimConfig) -> SimApp {
        let mut app = app(config);
        app.script = None;
        app
    }

    fn config_with_spawns(positions: &[Vec3]) -> SimConfig {
        let mut config = SimConfig::default();
        config.world.fixed_dt = 0.0625;
        config.world.frame_dt = 0.0625;
        config.spawns = positions
            .iter()
            .map(|&position| SpawnPoint { position })
            .collect();
        config
    }

    #[test]
    fn fixed_steps_follow_the_accumulator() {
        let mut app = unscripted(config_with_spawns(&[Vec3::new(50.0, 0.0, 0.0)]));
        app.frame(0.125);
        app.frame(0.03125);
        app.frame(0.03125);

        assert_eq!(app.stats().frames, 3);
        assert_eq!(app.stats().fixed_steps, 3);
    }

    #[test]
    fn enemies_close_in_on_an_idle_player() {
        let mut app = unscripted(config_with_spawns(&[Vec3::new(20.0, 0.0, 0.0)]));
        for _ in 0..16 {
            app.frame(0.0625);
        }

        // 1 s at move_speed 2.0
        let positions: Vec<Vec3> = app
            .world()
            .query::<(&Enemy, &LocalTransform)>()
            .iter()
            .map(|(_, (_, local))| local.position)
            .collect();
        assert_eq!(positions.len(), 1);
        assert!(positions[0].abs_diff_eq(Vec3::new(18.0, 0.0, 0.0), 1e-3));
    }

    #[test]
    fn scripted_attacks_kill_adjacent_enemy() {
        let mut config = config_with_spawns(&[Vec3::new(1.0, 0.0, 0.0)]);
        config.enemy.health = 20;
        config.enemy.move_speed = 0.0;
        config.player.attack_interval = 0.25;
        let mut app = app(config);

        let mut timer = FrameTimer::fixed(0.0625);
        let stats = app.run(&mut timer, 64);

        assert_eq!(stats.hits, 2);
        assert_eq!(stats.kills, 1);
        assert_eq!(app.enemies_alive(), 0);
        assert!(stats.attacks >= 2);
        // run stops as soon as the arena is clear
        assert!(stats.frames < 64);
    }

    #[test]
    fn player_walks_away_from_hitbox_range() {
        let mut config = config_with_spawns(&[Vec3::new(40.0, 0.0, 0.0)]);
        config.enemy.move_speed = 0.0;
        let mut app = unscripted(config);
        app.input.press("<Keyboard>/a");
        for _ in 0..16 {
            app.frame(0.0625);
        }

        let player = app.player();
        let position = app.world().get::<&LocalTransform>(player).unwrap().position;
        // speed 5.0 for 1 s toward -x
        assert!(position.abs_diff_eq(Vec3::new(-5.0, 0.0, 0.0), 1e-3));
        assert_eq!(app.stats().hits, 0);
    }
}
