use glam::{Quat, Vec3};
use hecs::Entity;

/// Spatial transform with position and rotation (world space; the arena has
/// no hierarchy).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl LocalTransform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Unit vector the transform is facing.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Marker: this entity is the player (the enemies' target).
pub struct Player;

/// Sphere trigger volume. Triggers report overlaps; they never push bodies apart.
#[derive(Debug, Clone, Copy)]
pub struct SphereCollider {
    pub radius: f32,
}

/// Identifies what kind of collider this is to whoever it touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag(pub String);

/// A short-lived attack volume. Despawned once `remaining` runs out.
pub struct Hitbox {
    pub remaining: f32,
    pub owner: Entity,
}

/// Trigger contact produced by the detection phase. Only emitted on the step
/// the contact begins.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    /// The entity that received the contact.
    pub entity: Entity,
    pub other: Entity,
    /// Tag of `other`.
    pub other_tag: String,
}
