//! Shared fixtures for the integration tests.
//!
//! The town used throughout:
//!
//! ```text
//!            market      temple
//!               \ north  / northeast
//!                 square ── down ──> sewer (missing)
//! ```

use std::sync::Arc;

use mudcore::mud::{
    Dispatcher, Exit, GameContext, ItemRecord, NpcRecord, PlayerRecord, RecordingOutput, RoomRecord, World,
};

/// Square, Market and Temple plus a few things to pick up and poke at.
pub fn town_world() -> Arc<World> {
    let world = Arc::new(World::new());
    world.insert_room(
        RoomRecord::new("square", "Town Square", "A fountain gurgles in the middle.")
            .with_area("Midgaard")
            .with_exit(Exit::new("north", "market"))
            .with_exit(Exit::new("northeast", "temple").with_leave_message("Someone climbs the temple steps."))
            .with_exit(Exit::new("down", "sewer")),
    );
    world.insert_room(
        RoomRecord::new("market", "Market", "Traders shout over each other.")
            .with_area("Midgaard")
            .with_exit(Exit::new("south", "square")),
    );
    world.insert_room(
        RoomRecord::new("temple", "Temple", "Candles flicker along the walls.")
            .with_area("Midgaard")
            .with_behavior("creaky_floor")
            .with_exit(Exit::new("southwest", "square")),
    );

    for id in ["potion-1", "potion-2"] {
        let mut potion = ItemRecord::new(id, "potion_red", "a red potion", "A vial of something fizzy.")
            .with_keywords(&["potion", "red"]);
        potion.room = Some("square".into());
        world.insert_item(potion);
    }
    let mut sword = ItemRecord::new("sword-1", "short_sword", "a short sword", "Plain but sharp.")
        .with_keywords(&["sword"]);
    sword.room = Some("square".into());
    world.insert_item(sword);

    world.insert_npc(
        NpcRecord::new("magpie", "a magpie", "It watches anything shiny.")
            .with_keywords(&["magpie", "bird"])
            .with_behavior("collector"),
        "square",
    );
    world.insert_npc(
        NpcRecord::new("pigeon", "a pigeon", "It coos.").with_keywords(&["pigeon", "bird"]),
        "square",
    );
    world.insert_npc(
        NpcRecord::new("merchant", "a cheerful merchant", "She rubs her hands together.")
            .with_keywords(&["merchant"])
            .with_behavior("greeter"),
        "market",
    );
    world.insert_npc(
        NpcRecord::new("guard", "a market guard", "Broad shouldered.")
            .with_keywords(&["guard"])
            .with_behavior("guard"),
        "market",
    );
    world
}

/// Bring `name` online in `room` with a recording output.
#[allow(dead_code)]
pub fn join(world: &World, name: &str, room: &str) -> Arc<RecordingOutput> {
    let out = Arc::new(RecordingOutput::new());
    world
        .add_player(PlayerRecord::new(name, room), out.clone())
        .expect("player joins");
    out
}

/// Dispatcher over the stock commands with default settings and no saver.
#[allow(dead_code)]
pub fn dispatcher(world: &Arc<World>) -> Dispatcher {
    Dispatcher::with_builtin_commands(Arc::new(GameContext::new(Arc::clone(world))))
}

/// Town with alice and bob standing in the square.
#[allow(dead_code)]
pub fn town() -> (Arc<World>, Dispatcher, Arc<RecordingOutput>, Arc<RecordingOutput>) {
    let world = town_world();
    let alice = join(&world, "alice", "square");
    let bob = join(&world, "bob", "square");
    let dispatcher = dispatcher(&world);
    (world, dispatcher, alice, bob)
}
