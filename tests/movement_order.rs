//! The move protocol runs leave, commit and arrive steps in a fixed order.
//! Everything observable is written to one shared journal and compared.

use std::sync::{Arc, Mutex};

use mudcore::mud::{
    builtin_registry, Behavior, CommandOutcome, Dispatch, Dispatcher, Event, EventKind, Exit, GameContext,
    MudError, NpcRecord, Output, PlayerRecord, RoomRecord, World,
};

type Journal = Arc<Mutex<Vec<String>>>;

struct JournalOutput {
    name: &'static str,
    journal: Journal,
}

impl Output for JournalOutput {
    fn say(&self, text: &str) {
        self.journal.lock().unwrap().push(format!("{} hears: {}", self.name, text));
    }

    fn write(&self, text: &str) {
        self.journal.lock().unwrap().push(format!("{} sees: {}", self.name, text));
    }

    fn prompt(&self, _status: &str) {
        self.journal.lock().unwrap().push(format!("{} prompt", self.name));
    }
}

/// Records each event along with where the mover stands at that moment.
struct JournalBehavior {
    tag: &'static str,
    journal: Journal,
}

impl Behavior for JournalBehavior {
    fn listens(&self, kind: EventKind) -> bool {
        matches!(kind, EventKind::PlayerEnter | EventKind::PlayerLeave)
    }

    fn handle(&self, event: &Event, world: &World) -> Result<(), MudError> {
        let at = world
            .player(&event.player)
            .map(|p| p.location)
            .unwrap_or_default();
        self.journal
            .lock()
            .unwrap()
            .push(format!("{} {:?} (mover in {})", self.tag, event.kind, at));
        Ok(())
    }
}

fn setup() -> (Arc<World>, Dispatcher, Journal) {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let world = Arc::new(World::new());
    world.insert_room(
        RoomRecord::new("r1", "First Room", "Plain.")
            .with_exit(Exit::new("east", "r2"))
            .with_behavior("room-script"),
    );
    world.insert_room(RoomRecord::new("r2", "Second Room", "Plainer.").with_behavior("room-script"));
    world.insert_npc(
        NpcRecord::new("npc_n", "a watcher", "It watches.").with_behavior("npc-script"),
        "r2",
    );
    // Present in r2 but deaf to arrivals.
    world.insert_npc(NpcRecord::new("npc_q", "a statue", "Stone."), "r2");

    for (name, room) in [("A", "r1"), ("B", "r1"), ("C", "r2")] {
        let out = Arc::new(JournalOutput {
            name,
            journal: Arc::clone(&journal),
        });
        world.add_player(PlayerRecord::new(name, room), out).unwrap();
    }

    let mut ctx = GameContext::new(Arc::clone(&world));
    ctx.behaviors.register(
        "room-script",
        Arc::new(JournalBehavior {
            tag: "room",
            journal: Arc::clone(&journal),
        }),
    );
    ctx.behaviors.register(
        "npc-script",
        Arc::new(JournalBehavior {
            tag: "npc",
            journal: Arc::clone(&journal),
        }),
    );

    let mut registry = builtin_registry();
    let look_journal = Arc::clone(&journal);
    registry.register("look", move |inv| {
        let at = inv.player()?.location;
        look_journal
            .lock()
            .unwrap()
            .push(format!("{} looks around {}", inv.actor, at));
        Ok(CommandOutcome::Continue)
    });

    let dispatcher = Dispatcher::new(Arc::new(ctx), Arc::new(registry));
    (world, dispatcher, journal)
}

#[test]
fn test_move_notifications_follow_protocol_order() {
    let (world, dispatcher, journal) = setup();

    assert_eq!(
        dispatcher.dispatch("east", "A"),
        Dispatch::Moved {
            from: "r1".into(),
            to: "r2".into()
        }
    );
    assert_eq!(world.player("A").unwrap().location, "r2");

    let entries = journal.lock().unwrap().clone();
    assert_eq!(
        entries,
        vec![
            "room PlayerLeave (mover in r1)",
            "B hears: A leaves.",
            "B prompt",
            "A looks around r2",
            "npc PlayerEnter (mover in r2)",
            "room PlayerEnter (mover in r2)",
        ]
    );
}

#[test]
fn test_blocked_move_leaves_no_trace() {
    let (world, dispatcher, journal) = setup();
    world.set_combat("A", true);

    assert!(matches!(dispatcher.dispatch("east", "A"), Dispatch::Rejected(_)));
    assert_eq!(world.player("A").unwrap().location, "r1");

    let entries = journal.lock().unwrap().clone();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("A hears: "));
}
