mod enemy;
mod hitbox;
mod player;
mod trigger;

pub use enemy::{
    despawn_destroyed_system, enemy_fixed_system, enemy_tick_system, enemy_trigger_system,
};
pub use hitbox::hitbox_lifetime_system;
pub use player::player_control_system;
pub use trigger::{trigger_system, ContactTracker};
