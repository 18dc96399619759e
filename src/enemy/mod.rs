pub mod states;

use glam::{Quat, Vec3};
use hecs::Entity;

use crate::components::LocalTransform;
use crate::config::EnemyConfig;
use crate::error::FsmError;
use crate::fsm::{State, StateMachine};

/// Keys of the enemy state machine. `Movement` is the initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyState {
    Movement,
    Idle,
    Attack,
    TakeDamage,
    Dead,
}

impl EnemyState {
    pub const ALL: [EnemyState; 5] = [
        EnemyState::Movement,
        EnemyState::Idle,
        EnemyState::Attack,
        EnemyState::TakeDamage,
        EnemyState::Dead,
    ];
}

pub type EnemyFsm = StateMachine<EnemyState, EnemyData>;
pub type BoxedEnemyState = Box<dyn State<EnemyState, EnemyData>>;

/// Everything the enemy states read and mutate.
#[derive(Debug, Clone)]
pub struct EnemyData {
    pub transform: LocalTransform,
    /// Target position minus own position, recomputed every frame.
    #[allow(dead_code)]
    pub direction: Vec3,
    /// `direction` normalized (zero when standing on the target).
    pub movement: Vec3,
    pub health: i32,
    pub damage_per_hit: i32,
    pub move_speed: f32,
    // Timers reserved for stop-and-go movement; no state reads them yet.
    #[allow(dead_code)]
    pub move_delay: f32,
    #[allow(dead_code)]
    pub move_length: f32,
    /// Only consulted by Idle.
    pub is_moving: bool,
    destroyed: bool,
}

impl EnemyData {
    pub fn new(config: &EnemyConfig, position: Vec3) -> Self {
        Self {
            transform: LocalTransform::new(position),
            direction: Vec3::ZERO,
            movement: Vec3::ZERO,
            health: config.health,
            damage_per_hit: config.damage_per_hit,
            move_speed: config.move_speed,
            move_delay: config.move_delay,
            move_length: config.move_length,
            is_moving: config.is_moving,
            destroyed: false,
        }
    }

    /// Store a new heading, face it, and refresh the movement vector.
    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction;
        self.movement = direction.normalize_or_zero();
        if self.movement != Vec3::ZERO {
            self.transform.rotation = Quat::from_rotation_arc(Vec3::Z, self.movement);
        }
    }

    pub fn destroy(&mut self) {
        if !self.destroyed {
            log::info!("enemy destroyed at {:?}", self.transform.position);
        }
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// Builds an [`Enemy`] from its config plus optional replacement states.
///
/// Replacements are keyed by their `id()`: a custom `Attack` swaps out the
/// default one, everything else keeps the stock behavior.
pub struct EnemyBuilder {
    config: EnemyConfig,
    hitbox_tag: String,
    overrides: Vec<BoxedEnemyState>,
}

impl EnemyBuilder {
    pub fn new(config: &EnemyConfig, hitbox_tag: impl Into<String>) -> Self {
        Self {
            config: config.clone(),
            hitbox_tag: hitbox_tag.into(),
            overrides: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn with_state(mut self, state: BoxedEnemyState) -> Self {
        self.overrides.push(state);
        self
    }

    /// Register all five states. Fails if two replacements share a key.
    pub fn build(self, position: Vec3, target: Option<Entity>) -> Result<Enemy, FsmError> {
        let mut fsm = EnemyFsm::new();
        for state in self.overrides {
            fsm.add(state)?;
        }
        for key in EnemyState::ALL {
            if !fsm.contains(key) {
                fsm.add(default_state(key))?;
            }
        }

        Ok(Enemy {
            fsm,
            data: EnemyData::new(&self.config, position),
            target,
            hitbox_tag: self.hitbox_tag,
            warned_unresolved: false,
        })
    }
}

fn default_state(key: EnemyState) -> BoxedEnemyState {
    match key {
        EnemyState::Movement => Box::new(states::Movement),
        EnemyState::Idle => Box::new(states::Idle),
        EnemyState::Attack => Box::new(states::Attack),
        EnemyState::TakeDamage => Box::new(states::TakeDamage),
        EnemyState::Dead => Box::new(states::Dead),
    }
}

/// An enemy: one state machine plus the data its states drive.
///
/// The host calls `on_init` once, then `on_tick` every frame,
/// `on_fixed_tick` every physics step and `on_collision` for each trigger
/// contact. Once destroyed, every callback is a no-op.
pub struct Enemy {
    fsm: EnemyFsm,
    pub data: EnemyData,
    target: Option<Entity>,
    hitbox_tag: String,
    warned_unresolved: bool,
}

impl Enemy {
    pub fn on_init(&mut self) -> Result<(), FsmError> {
        self.fsm.set_current_state(EnemyState::Movement, &mut self.data)
    }

    /// `target_position` is `None` while the target cannot be resolved; the
    /// enemy then keeps its last heading.
    pub fn on_tick(&mut self, dt: f32, target_position: Option<Vec3>) -> Result<(), FsmError> {
        if self.is_destroyed() {
            return Ok(());
        }
        match target_position {
            Some(target) => {
                self.warned_unresolved = false;
                let direction = target - self.data.transform.position;
                self.data.set_direction(direction);
            }
            None if !self.warned_unresolved => {
                log::warn!("enemy has no target, keeping last heading");
                self.warned_unresolved = true;
            }
            None => {}
        }
        self.fsm.update(&mut self.data, dt)
    }

    pub fn on_fixed_tick(&mut self, dt: f32) -> Result<(), FsmError> {
        if self.is_destroyed() {
            return Ok(());
        }
        self.fsm.fixed_update(&mut self.data, dt)
    }

    /// React to a trigger contact. Returns `true` if the contact was a hit.
    pub fn on_collision(&mut self, other_tag: &str) -> Result<bool, FsmError> {
        if self.is_destroyed() || other_tag != self.hitbox_tag {
            return Ok(false);
        }
        self.fsm.set_current_state(EnemyState::TakeDamage, &mut self.data)?;
        Ok(true)
    }

    /// Force a state from outside (host scripting, tests).
    #[allow(dead_code)]
    pub fn set_state(&mut self, key: EnemyState) -> Result<(), FsmError> {
        self.fsm.set_current_state(key, &mut self.data)
    }

    pub fn current_state(&self) -> Option<EnemyState> {
        self.fsm.current()
    }

    pub fn fsm(&self) -> &EnemyFsm {
        &self.fsm
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn set_target(&mut self, target: Entity) {
        self.target = Some(target);
    }

    pub fn health(&self) -> i32 {
        self.data.health
    }

    pub fn is_destroyed(&self) -> bool {
        self.data.is_destroyed() || self.fsm.is_halted()
    }
}
