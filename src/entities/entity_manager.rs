//! Authoritative entity storage with deferred add/remove.
//!
//! Additions and removals are queued and only applied after the update pass,
//! so a manager can spawn or retire entities while the world is iterating
//! without invalidating anything. An entity queued for removal is skipped by
//! the update pass of the same tick.

use super::{Drawable, EntityEvent, EntityVariant, GameEntity, WorldContext};
use crate::graphics::{Canvas, Palette};
use std::collections::HashSet;

/// Stable handle to an entity owned by an [`EntityManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

#[derive(Debug)]
pub struct EntityManager<E> {
    entities: Vec<(EntityId, E)>,
    to_add: Vec<(EntityId, E)>,
    to_remove: HashSet<EntityId>,
    next_id: u64,
}

impl<E> Default for EntityManager<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EntityManager<E> {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            to_add: Vec::new(),
            to_remove: HashSet::new(),
            next_id: 0,
        }
    }

    /// Queue an entity for inclusion at the end of the next update pass.
    pub fn add(&mut self, entity: impl Into<E>) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.to_add.push((id, entity.into()));
        id
    }

    /// Queue an entity for removal at the end of the next update pass.
    ///
    /// Removing an unknown id is a programming error: it panics in debug
    /// builds and is ignored (returning false) in release builds.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let known = self.contains(id) || self.to_add.iter().any(|(pending, _)| *pending == id);
        debug_assert!(known, "Can't remove unknown entity {:?}", id);
        if !known {
            return false;
        }
        self.to_remove.insert(id);
        true
    }

    /// Queue every live entity for removal.
    pub fn clear(&mut self) {
        self.to_remove
            .extend(self.entities.iter().map(|(id, _)| *id));
    }

    /// Apply queued additions, then queued removals.
    pub fn flush(&mut self) {
        self.entities.append(&mut self.to_add);
        if !self.to_remove.is_empty() {
            let to_remove = std::mem::take(&mut self.to_remove);
            self.entities.retain(|(id, _)| !to_remove.contains(id));
        }
    }

    /// True if `id` is in the live set (pending additions are not live yet).
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.iter().any(|(live, _)| *live == id)
    }

    pub fn is_pending_removal(&self, id: EntityId) -> bool {
        self.to_remove.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn pending_additions(&self) -> usize {
        self.to_add.len()
    }

    /// Live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &E)> {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    /// Lazy view of the live entities of one variant.
    pub fn entities_of_type<'a, T: EntityVariant<E> + 'a>(
        &'a self,
    ) -> impl Iterator<Item = (EntityId, &'a T)> {
        self.entities
            .iter()
            .filter_map(|(id, e)| T::view(e).map(|t| (*id, t)))
    }

    /// Look up an entity by id, including ones still waiting to be committed.
    pub fn get<T: EntityVariant<E>>(&self, id: EntityId) -> Option<&T> {
        self.entities
            .iter()
            .chain(self.to_add.iter())
            .find(|(candidate, _)| *candidate == id)
            .and_then(|(_, e)| T::view(e))
    }

    pub fn get_mut<T: EntityVariant<E>>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities
            .iter_mut()
            .chain(self.to_add.iter_mut())
            .find(|(candidate, _)| *candidate == id)
            .and_then(|(_, e)| T::view_mut(e))
    }
}

impl<E: GameEntity> EntityManager<E> {
    /// Update every live entity not queued for removal, in insertion order,
    /// then commit queued additions and removals.
    ///
    /// Returns the events raised during the pass, tagged with their source.
    pub fn update(&mut self, ctx: &WorldContext) -> Vec<(EntityId, EntityEvent)> {
        let mut events = Vec::new();
        for (id, entity) in self.entities.iter_mut() {
            if self.to_remove.contains(id) {
                continue;
            }
            if let Some(event) = entity.update(ctx) {
                events.push((*id, event));
            }
        }
        self.flush();
        events
    }

    /// Apply a palette to every owned entity, pending ones included.
    pub fn set_palette(&mut self, palette: Palette) {
        for (_, entity) in self.entities.iter_mut().chain(self.to_add.iter_mut()) {
            entity.set_palette(palette);
        }
    }

    /// Draw the live set back to front by draw order.
    pub fn draw(&self, canvas: &mut dyn Canvas, ctx: &WorldContext) {
        self.draw_with(&[], canvas, ctx);
    }

    /// Draw the live set interleaved with drawables owned elsewhere (the
    /// trex, the score board). Equal draw orders keep insertion order.
    pub fn draw_with(&self, extra: &[&dyn Drawable], canvas: &mut dyn Canvas, ctx: &WorldContext) {
        let mut layers: Vec<&dyn Drawable> = self
            .entities
            .iter()
            .map(|(_, e)| e as &dyn Drawable)
            .chain(extra.iter().copied())
            .collect();
        layers.sort_by_key(|d| d.draw_order());
        for layer in layers {
            layer.draw(canvas, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::graphics::sprite::RecordingCanvas;
    use crate::graphics::{Sprite, SpriteKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Test entity that logs every update and draw it receives.
    #[derive(Debug)]
    struct Tracer {
        name: &'static str,
        order: i32,
        log: Rc<RefCell<Vec<&'static str>>>,
        hits: bool,
    }

    impl Drawable for Tracer {
        fn draw(&self, canvas: &mut dyn Canvas, _ctx: &WorldContext) {
            let sprite = Sprite::new(SpriteKind::Cloud, self.order, 0, 1, 1);
            canvas.draw_sprite(&sprite, Palette::Normal, Default::default());
        }

        fn draw_order(&self) -> i32 {
            self.order
        }
    }

    impl GameEntity for Tracer {
        fn update(&mut self, _ctx: &WorldContext) -> Option<EntityEvent> {
            self.log.borrow_mut().push(self.name);
            self.hits.then_some(EntityEvent::HitTrex)
        }
    }

    impl EntityVariant<Tracer> for Tracer {
        fn view(entity: &Tracer) -> Option<&Self> {
            Some(entity)
        }

        fn view_mut(entity: &mut Tracer) -> Option<&mut Self> {
            Some(entity)
        }
    }

    fn ctx() -> WorldContext {
        WorldContext {
            dt: 0.016,
            trex_speed: 280.0,
            trex_alive: true,
            trex_collision_box: Rect::default(),
            is_night: false,
            night_count: 0,
        }
    }

    fn tracer(name: &'static str, order: i32, log: &Rc<RefCell<Vec<&'static str>>>) -> Tracer {
        Tracer {
            name,
            order,
            log: Rc::clone(log),
            hits: false,
        }
    }

    #[test]
    fn test_added_entity_not_live_until_update() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager: EntityManager<Tracer> = EntityManager::new();
        let id = manager.add(tracer("a", 0, &log));

        assert!(!manager.contains(id));
        assert_eq!(manager.pending_additions(), 1);

        manager.update(&ctx());
        assert!(manager.contains(id));
        // Not updated in the tick it was committed
        assert!(log.borrow().is_empty());

        manager.update(&ctx());
        assert_eq!(*log.borrow(), vec!["a"]);
    }

    #[test]
    fn test_entity_queued_for_removal_is_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager: EntityManager<Tracer> = EntityManager::new();
        let a = manager.add(tracer("a", 0, &log));
        manager.add(tracer("b", 0, &log));
        manager.flush();

        manager.remove(a);
        assert!(manager.is_pending_removal(a));
        manager.update(&ctx());

        assert_eq!(*log.borrow(), vec!["b"]);
        assert!(!manager.contains(a));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_updates_run_in_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager: EntityManager<Tracer> = EntityManager::new();
        manager.add(tracer("first", 5, &log));
        manager.add(tracer("second", -5, &log));
        manager.add(tracer("third", 0, &log));
        manager.flush();

        manager.update(&ctx());
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_add_then_remove_in_same_tick_never_lives() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager: EntityManager<Tracer> = EntityManager::new();
        let id = manager.add(tracer("ghost", 0, &log));
        assert!(manager.remove(id));

        manager.update(&ctx());
        assert!(!manager.contains(id));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_clear_queues_every_live_entity() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager: EntityManager<Tracer> = EntityManager::new();
        manager.add(tracer("a", 0, &log));
        manager.add(tracer("b", 0, &log));
        manager.flush();

        manager.clear();
        assert_eq!(manager.len(), 2);
        manager.update(&ctx());
        assert!(manager.is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_events_are_tagged_with_source() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager: EntityManager<Tracer> = EntityManager::new();
        manager.add(tracer("quiet", 0, &log));
        let loud = manager.add(Tracer {
            hits: true,
            ..tracer("loud", 0, &log)
        });
        manager.flush();

        let events = manager.update(&ctx());
        assert_eq!(events, vec![(loud, EntityEvent::HitTrex)]);
    }

    #[test]
    fn test_draw_orders_by_key_and_is_stable() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager: EntityManager<Tracer> = EntityManager::new();
        manager.add(tracer("front", 12, &log));
        manager.add(tracer("back", -3, &log));
        manager.add(tracer("mid_a", 3, &log));
        manager.add(tracer("mid_b", 3, &log));
        manager.flush();

        let extra = tracer("extra", 10, &log);
        let mut canvas = RecordingCanvas::new();
        manager.draw_with(&[&extra], &mut canvas, &ctx());

        let orders: Vec<i32> = canvas.calls.iter().map(|(s, _, _)| s.region.x).collect();
        assert_eq!(orders, vec![-3, 3, 3, 10, 12]);
    }

    #[test]
    fn test_get_sees_pending_additions() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager: EntityManager<Tracer> = EntityManager::new();
        let id = manager.add(tracer("pending", 7, &log));

        let found: Option<&Tracer> = manager.get(id);
        assert_eq!(found.map(|p| p.order), Some(7));
        assert_eq!(manager.entities_of_type::<Tracer>().count(), 0);
    }

    #[test]
    fn test_entities_of_type_picks_one_variant() {
        use crate::entities::obstacle::{CactusGroup, GroupSize};
        use crate::entities::{Entity, GroundTile, Obstacle};

        let mut manager: EntityManager<Entity> = EntityManager::new();
        manager.add(GroundTile::new(0.0, false, Palette::Normal));
        manager.add(Obstacle::from(CactusGroup::new(
            300.0,
            false,
            GroupSize::Small,
            Palette::Normal,
        )));
        manager.add(GroundTile::new(600.0, true, Palette::Normal));
        manager.flush();

        let tiles: Vec<f32> = manager
            .entities_of_type::<GroundTile>()
            .map(|(_, tile)| tile.position().x)
            .collect();
        assert_eq!(tiles, vec![0.0, 600.0]);

        let mut obstacles = manager.entities_of_type::<Obstacle>();
        assert!(obstacles.next().is_some());
        assert!(obstacles.next().is_none());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unknown entity")]
    fn test_removing_unknown_id_panics_in_debug() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut other: EntityManager<Tracer> = EntityManager::new();
        let foreign = other.add(tracer("x", 0, &log));
        let _ = other.add(tracer("y", 0, &log));

        let mut manager: EntityManager<Tracer> = EntityManager::new();
        manager.remove(foreign);
    }
}
