//! Stock scripts that world seeds can reference by name.

use std::sync::Arc;

use crate::mud::errors::MudError;
use crate::mud::events::{Behavior, BehaviorRegistry, Event, EventKind, Subject};
use crate::mud::world::World;

/// Register every stock behavior under its seed name.
pub fn register_builtin(registry: &mut BehaviorRegistry) {
    registry.register("greeter", Arc::new(Greeter));
    registry.register("guard", Arc::new(Guard));
    registry.register("collector", Arc::new(Collector));
    registry.register("creaky_floor", Arc::new(Announce::new("The floorboards creak under your feet.")));
}

fn npc_name(event: &Event, world: &World) -> String {
    match &event.subject {
        Subject::Npc(id) => world
            .npc(id)
            .map(|n| n.short_desc)
            .unwrap_or_else(|| "Someone".to_string()),
        _ => "Someone".to_string(),
    }
}

fn tell(world: &World, username: &str, text: &str) {
    if let Some(out) = world.output(username) {
        out.say(text);
    }
}

/// NPC that greets every arriving player.
pub struct Greeter;

impl Behavior for Greeter {
    fn listens(&self, kind: EventKind) -> bool {
        kind == EventKind::PlayerEnter
    }

    fn handle(&self, event: &Event, world: &World) -> Result<(), MudError> {
        let name = npc_name(event, world);
        tell(world, &event.player, &format!("{} waves hello to you.", name));
        Ok(())
    }
}

/// NPC that accepts a fight but shrugs every attack off.
pub struct Guard;

impl Behavior for Guard {
    fn listens(&self, kind: EventKind) -> bool {
        kind == EventKind::Combat
    }

    fn handle(&self, event: &Event, world: &World) -> Result<(), MudError> {
        let name = npc_name(event, world);
        tell(
            world,
            &event.player,
            &format!("{} blocks your attack and tells you to behave.", name),
        );
        Ok(())
    }
}

/// NPC that notices what players drop.
pub struct Collector;

impl Behavior for Collector {
    fn listens(&self, kind: EventKind) -> bool {
        kind == EventKind::PlayerDropItem
    }

    fn handle(&self, event: &Event, world: &World) -> Result<(), MudError> {
        let name = npc_name(event, world);
        let item = event
            .item
            .as_deref()
            .and_then(|id| world.item(id))
            .map(|i| i.short_desc)
            .unwrap_or_else(|| "that".to_string());
        tell(world, &event.player, &format!("{} eyes {} greedily.", name, item));
        Ok(())
    }
}

/// Room script that prints a fixed line to whoever walks in.
pub struct Announce {
    text: String,
}

impl Announce {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl Behavior for Announce {
    fn listens(&self, kind: EventKind) -> bool {
        kind == EventKind::PlayerEnter
    }

    fn handle(&self, event: &Event, world: &World) -> Result<(), MudError> {
        tell(world, &event.player, &self.text);
        Ok(())
    }
}
