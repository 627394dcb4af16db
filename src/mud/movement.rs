//! Moving a player through an exit.
//!
//! A move runs four steps, always in this order:
//!
//! 1. **Validate**: combat lock, then the destination must exist.
//! 2. **Leave**: the old room's script hears `PlayerLeave`; everyone else in
//!    the old room gets the departure line and a fresh prompt.
//! 3. **Commit**: the player's location is written.
//! 4. **Arrive**: the player is shown the new room (`look`), each NPC there
//!    hears `PlayerEnter`, then the room's own script does.
//!
//! A failed validation sends one line to the mover and changes nothing.

use log::{info, warn};

use crate::metrics;
use crate::mud::dispatch::{Dispatcher, MoveResult, Rejection};
use crate::mud::events::{Event, EventKind, Subject};
use crate::mud::exits::{match_exit, ExitMatch};
use crate::mud::messages::Message;
use crate::mud::types::Exit;

/// Resolve `partial` against the actor's current room and walk through it.
///
/// Ambiguity, combat lock and void destinations are reported to the actor.
/// `NotFound` (no room, no matching exit) is left to the caller, which knows
/// whether to say "command not found" or "no such exit".
pub fn travel(dispatcher: &Dispatcher, actor: &str, partial: &str) -> MoveResult {
    let world = &dispatcher.context().world;
    let player = world.player(actor).ok_or(Rejection::NotFound)?;
    let room = world.room(&player.location).ok_or(Rejection::NotFound)?;

    match match_exit(partial, &room.exits) {
        ExitMatch::None => Err(Rejection::NotFound),
        ExitMatch::Ambiguous(_) => {
            if let Some(out) = world.output(actor) {
                out.say_msg(&Message::AmbiguousExit);
            }
            Err(Rejection::Ambiguous)
        }
        ExitMatch::Unambiguous(exit) => move_through(dispatcher, actor, exit),
    }
}

/// Run the full move protocol for `actor` through `exit`.
pub fn move_through(dispatcher: &Dispatcher, actor: &str, exit: &Exit) -> MoveResult {
    let ctx = dispatcher.context();
    let world = &ctx.world;
    let player = world.player(actor).ok_or(Rejection::NotFound)?;
    let output = world.output(actor).ok_or(Rejection::NotFound)?;

    // Validate
    if player.in_combat {
        output.say_msg(&Message::MoveCombat);
        return Err(Rejection::BlockedByCombat);
    }
    if world.room(&exit.location).is_none() {
        warn!(
            "exit {} in {} leads to missing room {}",
            exit.direction, player.location, exit.location
        );
        output.say_msg(&Message::Limbo);
        return Err(Rejection::VoidDestination);
    }

    // Leave
    let from = player.location.clone();
    if let Some(old_room) = world.room(&from) {
        let event = Event::new(EventKind::PlayerLeave, Subject::Room(from.clone()), actor, &from);
        if let Err(e) = ctx.behaviors.emit(old_room.behavior.as_deref(), &event, world) {
            warn!("room {} leave hook failed: {}", from, e);
        }
    }

    let leave_line = exit
        .leave_message
        .clone()
        .unwrap_or_else(|| Message::Leave(actor.to_string()).to_string());
    world.broadcast_if(&leave_line, |p| p.location == from && p.username != actor);
    world.each_except(actor, |p, out| {
        if p.location == from {
            out.prompt(&p.prompt());
        }
    });

    // Commit
    let to = exit.location.clone();
    if !world.set_location(actor, &to) {
        return Err(Rejection::NotFound);
    }
    info!("{} moved {} -> {} via {}", actor, from, to, exit.direction);
    metrics::inc_moves();

    // Arrive
    dispatcher.force_look(actor);

    if let Some(new_room) = world.room(&to) {
        for npc_id in &new_room.npcs {
            let Some(npc) = world.npc(npc_id) else {
                continue;
            };
            let event = Event::new(EventKind::PlayerEnter, Subject::Npc(npc.id.clone()), actor, &to);
            if let Err(e) = ctx.behaviors.emit(npc.behavior.as_deref(), &event, world) {
                warn!("npc {} enter hook failed: {}", npc.id, e);
            }
        }

        let event = Event::new(EventKind::PlayerEnter, Subject::Room(to.clone()), actor, &to);
        if let Err(e) = ctx.behaviors.emit(new_room.behavior.as_deref(), &event, world) {
            warn!("room {} enter hook failed: {}", to, e);
        }
    }

    Ok((from, to))
}
