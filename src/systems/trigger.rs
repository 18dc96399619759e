use std::collections::HashSet;

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{LocalTransform, SphereCollider, Tag, TriggerEvent};

struct TriggerEntry {
    entity: Entity,
    position: Vec3,
    radius: f32,
    tag: String,
}

/// Contacts that were overlapping at the end of the last step. Keys are
/// ordered so `(a, b)` and `(b, a)` are the same contact.
#[derive(Default)]
pub struct ContactTracker {
    active: HashSet<(Entity, Entity)>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contact_key(a: Entity, b: Entity) -> (Entity, Entity) {
    if a.to_bits() <= b.to_bits() {
        (a, b)
    } else {
        (b, a)
    }
}

fn overlaps(a: &TriggerEntry, b: &TriggerEntry) -> bool {
    let reach = a.radius + b.radius;
    (b.position - a.position).length_squared() < reach * reach
}

/// Detect sphere-sphere overlaps between tagged colliders.
///
/// Emits one event per side, and only on the step a contact begins; a pair that
/// stays overlapping is reported once until it separates.
pub fn trigger_system(world: &mut World, contacts: &mut ContactTracker) -> Vec<TriggerEvent> {
    let entries: Vec<TriggerEntry> = world
        .query_mut::<(&LocalTransform, &SphereCollider, &Tag)>()
        .into_iter()
        .map(|(entity, (local, collider, tag))| TriggerEntry {
            entity,
            position: local.position,
            radius: collider.radius,
            tag: tag.0.clone(),
        })
        .collect();

    // Broadphase: brute force O(n²)
    let mut current = HashSet::new();
    let mut events = Vec::new();
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let (a, b) = (&entries[i], &entries[j]);
            if !overlaps(a, b) {
                continue;
            }
            let key = contact_key(a.entity, b.entity);
            current.insert(key);
            if contacts.active.contains(&key) {
                continue;
            }
            events.push(TriggerEvent {
                entity: a.entity,
                other: b.entity,
                other_tag: b.tag.clone(),
            });
            events.push(TriggerEvent {
                entity: b.entity,
                other: a.entity,
                other_tag: a.tag.clone(),
            });
        }
    }

    contacts.active = current;
    events
}
