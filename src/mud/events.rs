//! World events and the observers that react to them.
//!
//! Rooms, NPCs and items name a script in their `behavior` field. Scripts are
//! [`Behavior`] implementations registered under that name at startup; an
//! entity without a registered behavior ignores every event.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::mud::errors::MudError;
use crate::mud::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PlayerEnter,
    PlayerLeave,
    PlayerDropItem,
    Combat,
    Wield,
}

/// Which entity an event is delivered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Room(String),
    Npc(String),
    Item(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub subject: Subject,
    /// Player that caused the event.
    pub player: String,
    /// Room the event happened in.
    pub room: String,
    /// Item involved, for drop and wield.
    pub item: Option<String>,
}

impl Event {
    pub fn new(kind: EventKind, subject: Subject, player: &str, room: &str) -> Self {
        Self {
            kind,
            subject,
            player: player.to_string(),
            room: room.to_string(),
            item: None,
        }
    }

    pub fn with_item(mut self, item_id: &str) -> Self {
        self.item = Some(item_id.to_string());
        self
    }
}

pub trait Behavior: Send + Sync {
    /// Whether this behavior reacts to `kind` at all.
    fn listens(&self, kind: EventKind) -> bool;

    fn handle(&self, event: &Event, world: &World) -> Result<(), MudError>;
}

/// Name -> behavior table, built once at startup.
#[derive(Default, Clone)]
pub struct BehaviorRegistry {
    behaviors: HashMap<String, Arc<dyn Behavior>>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, behavior: Arc<dyn Behavior>) {
        self.behaviors.insert(name.to_string(), behavior);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Behavior>> {
        self.behaviors.get(name).cloned()
    }

    /// True when the named behavior exists and listens for `kind`.
    pub fn listens(&self, behavior: Option<&str>, kind: EventKind) -> bool {
        behavior
            .and_then(|name| self.behaviors.get(name))
            .map(|b| b.listens(kind))
            .unwrap_or(false)
    }

    /// Deliver `event` to the named behavior if it listens for the event kind.
    ///
    /// Returns whether the event was delivered.
    pub fn emit(&self, behavior: Option<&str>, event: &Event, world: &World) -> Result<bool, MudError> {
        let Some(handler) = behavior.and_then(|name| self.behaviors.get(name)) else {
            return Ok(false);
        };
        if !handler.listens(event.kind) {
            return Ok(false);
        }
        debug!("event {:?} -> {:?}", event.kind, event.subject);
        handler.handle(event, world)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Counter {
        hits: Mutex<u32>,
    }

    impl Behavior for Counter {
        fn listens(&self, kind: EventKind) -> bool {
            kind == EventKind::PlayerEnter
        }

        fn handle(&self, _event: &Event, _world: &World) -> Result<(), MudError> {
            *self.hits.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[test]
    fn emit_only_reaches_listening_behaviors() {
        let counter = Arc::new(Counter { hits: Mutex::new(0) });
        let mut registry = BehaviorRegistry::new();
        registry.register("counter", counter.clone());
        let world = World::new();

        let enter = Event::new(EventKind::PlayerEnter, Subject::Room("r".into()), "alice", "r");
        let leave = Event::new(EventKind::PlayerLeave, Subject::Room("r".into()), "alice", "r");

        assert!(registry.emit(Some("counter"), &enter, &world).unwrap());
        assert!(!registry.emit(Some("counter"), &leave, &world).unwrap());
        assert!(!registry.emit(Some("missing"), &enter, &world).unwrap());
        assert!(!registry.emit(None, &enter, &world).unwrap());
        assert_eq!(*counter.hits.lock().unwrap(), 1);

        assert!(registry.listens(Some("counter"), EventKind::PlayerEnter));
        assert!(!registry.listens(Some("counter"), EventKind::Combat));
        assert!(!registry.listens(None, EventKind::PlayerEnter));
    }
}
