use crate::fsm::{State, Transition};

use super::{EnemyData, EnemyState};

/// Waits until the moving flag is raised.
pub struct Idle;

impl State<EnemyState, EnemyData> for Idle {
    fn id(&self) -> EnemyState {
        EnemyState::Idle
    }

    fn update(&mut self, data: &mut EnemyData, _dt: f32) -> Transition<EnemyState> {
        if data.is_moving {
            Transition::Go(EnemyState::Movement)
        } else {
            Transition::Stay
        }
    }
}

/// Walks along the normalized movement vector every physics step.
pub struct Movement;

impl State<EnemyState, EnemyData> for Movement {
    fn id(&self) -> EnemyState {
        EnemyState::Movement
    }

    fn fixed_update(&mut self, data: &mut EnemyData, dt: f32) -> Transition<EnemyState> {
        data.transform.position += data.movement * data.move_speed * dt;
        Transition::Stay
    }
}

/// Does nothing on its own. Enemy kinds that attack replace it through
/// [`super::EnemyBuilder::with_state`].
pub struct Attack;

impl State<EnemyState, EnemyData> for Attack {
    fn id(&self) -> EnemyState {
        EnemyState::Attack
    }
}

/// Applies one hit, then either dies or goes back to moving.
pub struct TakeDamage;

impl State<EnemyState, EnemyData> for TakeDamage {
    fn id(&self) -> EnemyState {
        EnemyState::TakeDamage
    }

    fn enter(&mut self, data: &mut EnemyData) -> Transition<EnemyState> {
        data.health = data.health.saturating_sub(data.damage_per_hit);
        log::debug!("enemy hit, health now {}", data.health);
        if data.health <= 0 {
            Transition::Go(EnemyState::Dead)
        } else {
            Transition::Go(EnemyState::Movement)
        }
    }
}

/// Terminal. Marks the enemy for removal and halts its machine.
pub struct Dead;

impl State<EnemyState, EnemyData> for Dead {
    fn id(&self) -> EnemyState {
        EnemyState::Dead
    }

    fn enter(&mut self, data: &mut EnemyData) -> Transition<EnemyState> {
        data.destroy();
        Transition::Halt
    }
}
