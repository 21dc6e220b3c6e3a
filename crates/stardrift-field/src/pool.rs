//! Insertion-ordered entity pool with a hard capacity.
//!
//! Eviction is oldest-first and chunked: when an insert pushes the pool
//! over capacity, at least the overflow and up to `evict_chunk` entities
//! are deleted immediately. Forced eviction never routes through the
//! fade-out path; the hard cap must bite instantly.

use crate::entity::{Entity, EntitySnapshot};
use stardrift_core::EntityId;

pub struct EntityPool {
    entities: Vec<Entity>,
    capacity: usize,
    evict_chunk: usize,
}

impl EntityPool {
    /// `capacity` is clamped to at least 1: the pool must always be able to
    /// hold the entity whose insertion triggered the eviction.
    pub fn new(capacity: usize, evict_chunk: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entities: Vec::with_capacity(capacity.saturating_add(1)),
            capacity,
            evict_chunk: evict_chunk.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an entity; if the pool overflows, evict oldest-first and
    /// return the evicted ids so callers can drop their pending work.
    pub fn insert(&mut self, entity: Entity) -> Vec<EntityId> {
        self.entities.push(entity);
        let overflow = self.entities.len().saturating_sub(self.capacity);
        if overflow == 0 {
            return Vec::new();
        }
        // Never evict the entity that was just inserted
        let count = overflow
            .max(self.evict_chunk)
            .min(self.entities.len().saturating_sub(1));
        self.entities.drain(..count).map(|e| e.id).collect()
    }

    /// Delete by identity. Idempotent: removing an absent id is a no-op.
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.entities.iter().position(|e| e.id == id) {
            Some(idx) => {
                self.entities.remove(idx);
                true
            }
            None => false,
        }
    }

    /// The stale-handle check: deferred commands must look their target up
    /// before mutating it.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Live entities in insertion order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Immutable render view, ordered by insertion
    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.entities.iter().map(EntitySnapshot::of).collect()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::LifecycleState;
    use stardrift_core::Vec2;

    fn entity_at(born_at: f64) -> Entity {
        Entity {
            id: EntityId::next(),
            origin: Vec2::ZERO,
            position: Vec2::ZERO,
            base_size: 1.0,
            size: 1.0,
            category: 1,
            max_opacity: 1.0,
            opacity: 0.0,
            scale: 1.0,
            glitter: 1.0,
            born_at,
            lifespan: 10.0,
            fade_in: 0.5,
            drift: Vec2::ZERO,
            state: LifecycleState::Spawning,
            state_since: born_at,
            pulse: None,
            fade_from_opacity: 1.0,
            fade_from_scale: 1.0,
        }
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let mut pool = EntityPool::new(10, 1);
        for i in 0..25 {
            pool.insert(entity_at(i as f64));
            assert!(pool.len() <= 10);
        }
    }

    #[test]
    fn zero_capacity_behaves_as_capacity_one() {
        let mut pool = EntityPool::new(0, 8);
        assert_eq!(pool.capacity(), 1);
        for i in 0..5 {
            pool.insert(entity_at(i as f64));
            assert!(pool.len() <= 1, "capped pool retained extra entities");
        }
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn eviction_is_oldest_first() {
        let mut pool = EntityPool::new(3, 1);
        let a = pool_insert(&mut pool, 0.0);
        let _b = pool_insert(&mut pool, 1.0);
        let _c = pool_insert(&mut pool, 2.0);
        let evicted = pool.insert(entity_at(3.0));
        assert_eq!(evicted, vec![a]);
        assert!(pool.get(a).is_none());
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn chunked_eviction_takes_the_chunk() {
        let mut pool = EntityPool::new(4, 3);
        for i in 0..4 {
            pool.insert(entity_at(i as f64));
        }
        let evicted = pool.insert(entity_at(4.0));
        // Overflow of 1, chunk of 3: the three oldest go at once
        assert_eq!(evicted.len(), 3);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut pool = EntityPool::new(4, 1);
        let id = pool_insert(&mut pool, 0.0);
        assert!(pool.remove(id));
        assert!(!pool.remove(id));
        assert!(!pool.remove(EntityId::from_raw(u64::MAX)));
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut pool = EntityPool::new(8, 1);
        let a = pool_insert(&mut pool, 0.0);
        let b = pool_insert(&mut pool, 1.0);
        let snap = pool.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].id, a);
        assert_eq!(snap[1].id, b);
    }

    fn pool_insert(pool: &mut EntityPool, born_at: f64) -> EntityId {
        let e = entity_at(born_at);
        let id = e.id;
        pool.insert(e);
        id
    }
}
