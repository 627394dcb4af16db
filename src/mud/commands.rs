//! Stock player commands.
//!
//! Each command receives everything typed after the command word plus the
//! acting player (see [`Invocation`]). Lookups of items and NPCs go through
//! the dot-notation resolver, so `get 2.coin` and `look 3.guard` work
//! everywhere.

use std::collections::HashMap;
use std::sync::Arc;

use log::{info, warn};

use crate::mud::dispatch::{Invocation, Rejection};
use crate::mud::errors::MudError;
use crate::mud::events::{Event, EventKind, Subject};
use crate::mud::messages::Message;
use crate::mud::movement;
use crate::mud::registry::{CommandOutcome, CommandRegistry};
use crate::mud::resolver::{find_item_in_inventory, find_item_in_room, find_npc_in_room};
use crate::mud::types::WIELD_SLOT;

type CommandResult = Result<CommandOutcome, MudError>;

const CONTINUE: CommandResult = Ok(CommandOutcome::Continue);

/// Registry holding every stock command and its short aliases.
pub fn builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register("commands", commands);
    registry.register("drop", drop);
    registry.register("equipment", equipment);
    registry.register("get", get);
    registry.register("go", go);
    registry.register("inventory", inventory);
    registry.register("kill", kill);
    registry.register("look", look);
    registry.register("quit", quit);
    registry.register("remove", remove);
    registry.register("save", save);
    registry.register("where", where_am_i);
    registry.register("who", who);
    registry.register("wield", wield);

    for (alias, target) in [("l", "look"), ("inv", "inventory"), ("eq", "equipment"), ("rem", "remove")] {
        // Targets are registered just above.
        if let Err(e) = registry.alias(alias, target) {
            warn!("skipping alias {}: {}", alias, e);
        }
    }
    registry
}

/// List the canonical command names in columns.
pub fn commands(inv: &Invocation<'_>) -> CommandResult {
    for line in inv.registry().format_listing(inv.ctx().settings.listing_columns) {
        inv.say(&line);
    }
    CONTINUE
}

pub fn drop(inv: &Invocation<'_>) -> CommandResult {
    let world = inv.world();
    let player = inv.player()?;
    let Some(room) = world.room(&player.location) else {
        inv.say_msg(Message::Limbo);
        return CONTINUE;
    };
    let Some(item) = find_item_in_inventory(world, &player, inv.args) else {
        inv.say_msg(Message::ItemNotFound);
        return CONTINUE;
    };
    if item.equipped {
        inv.say_msg(Message::ItemWorn);
        return CONTINUE;
    }

    if !world.drop_item(inv.actor, &room.id, &item.id) {
        inv.say_msg(Message::ItemNotFound);
        return CONTINUE;
    }
    inv.say_msg(Message::ItemDrop(item.short_desc.clone()));

    for npc_id in &room.npcs {
        let Some(npc) = world.npc(npc_id) else {
            continue;
        };
        let event = Event::new(EventKind::PlayerDropItem, Subject::Npc(npc.id.clone()), inv.actor, &room.id)
            .with_item(&item.id);
        // The item is already on the floor; keep notifying the rest.
        if let Err(e) = inv.ctx().behaviors.emit(npc.behavior.as_deref(), &event, world) {
            warn!("npc {} drop hook failed: {}", npc.id, e);
        }
    }
    CONTINUE
}

pub fn equipment(inv: &Invocation<'_>) -> CommandResult {
    let player = inv.player()?;
    for (slot, item_id) in &player.equipment {
        let desc = inv
            .world()
            .item(item_id)
            .map(|i| i.short_desc)
            .unwrap_or_else(|| item_id.clone());
        inv.say(&format!("{:<15} {}", format!("<{}>", slot), desc));
    }
    CONTINUE
}

pub fn get(inv: &Invocation<'_>) -> CommandResult {
    let world = inv.world();
    let player = inv.player()?;
    if player.in_combat {
        inv.say_msg(Message::GetCombat);
        return CONTINUE;
    }
    if player.inventory.len() >= inv.ctx().settings.max_inventory {
        inv.say_msg(Message::CarryMax);
        return CONTINUE;
    }
    let Some(room) = world.room(&player.location) else {
        inv.say_msg(Message::Limbo);
        return CONTINUE;
    };
    let Some(item) = find_item_in_room(world, &room, inv.args) else {
        inv.say_msg(Message::ItemNotFound);
        return CONTINUE;
    };

    // Someone else may have grabbed it between the lookup and now.
    if world.take_item(inv.actor, &room.id, &item.id) {
        inv.say_msg(Message::ItemPickup(item.short_desc));
    } else {
        inv.say_msg(Message::ItemNotFound);
    }
    CONTINUE
}

/// Explicit movement: `go north`, `go ne`.
pub fn go(inv: &Invocation<'_>) -> CommandResult {
    let Some(direction) = inv.args.split_whitespace().next() else {
        inv.say_msg(Message::GoWhere);
        return CONTINUE;
    };
    let result = movement::travel(inv.dispatcher, inv.actor, direction);
    if let Err(Rejection::NotFound) = result {
        inv.say_msg(Message::NoExit);
    }
    inv.report_move(result);
    CONTINUE
}

pub fn inventory(inv: &Invocation<'_>) -> CommandResult {
    let world = inv.world();
    let player = inv.player()?;
    inv.say_msg(Message::Inventory);

    let carried: Vec<_> = player
        .inventory
        .iter()
        .filter_map(|id| world.item(id))
        .filter(|item| !item.equipped)
        .collect();
    if carried.is_empty() {
        inv.say_msg(Message::InventoryEmpty);
        return CONTINUE;
    }

    // Stack copies of the same template: "(2) a healing potion".
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in &carried {
        *counts.entry(item.vnum.as_str()).or_insert(0) += 1;
    }
    let mut shown: Vec<&str> = Vec::new();
    for item in &carried {
        if shown.contains(&item.vnum.as_str()) {
            continue;
        }
        shown.push(item.vnum.as_str());
        match counts.get(item.vnum.as_str()) {
            Some(&n) if n > 1 => inv.say(&format!("({}) {}", n, item.short_desc)),
            _ => inv.say(&item.short_desc),
        }
    }
    CONTINUE
}

pub fn kill(inv: &Invocation<'_>) -> CommandResult {
    let world = inv.world();
    let player = inv.player()?;
    let Some(room) = world.room(&player.location) else {
        inv.say_msg(Message::Limbo);
        return CONTINUE;
    };
    let Some(npc) = find_npc_in_room(world, &room, inv.args) else {
        inv.say_msg(Message::ItemNotFound);
        return CONTINUE;
    };
    let behaviors = &inv.ctx().behaviors;
    if !behaviors.listens(npc.behavior.as_deref(), EventKind::Combat) {
        inv.say_msg(Message::KillPacifist);
        return CONTINUE;
    }

    let event = Event::new(EventKind::Combat, Subject::Npc(npc.id.clone()), inv.actor, &room.id);
    behaviors.emit(npc.behavior.as_deref(), &event, world)?;
    CONTINUE
}

/// `look` with no argument renders the room; with one it describes a thing
/// found on the floor, in the inventory, or among the NPCs, in that order.
pub fn look(inv: &Invocation<'_>) -> CommandResult {
    let world = inv.world();
    let player = inv.player()?;
    let Some(room) = world.room(&player.location) else {
        inv.say_msg(Message::Limbo);
        return CONTINUE;
    };

    if !inv.args.trim().is_empty() {
        let description = find_item_in_room(world, &room, inv.args)
            .or_else(|| find_item_in_inventory(world, &player, inv.args))
            .map(|item| item.description)
            .or_else(|| find_npc_in_room(world, &room, inv.args).map(|npc| npc.description));
        match description {
            Some(text) => inv.say(&text),
            None => inv.say_msg(Message::ItemNotFound),
        }
        return CONTINUE;
    }

    inv.say(&room.title);
    inv.say(&room.description);
    inv.say("");

    for name in world.players_in_room(&room.id) {
        if name != inv.actor {
            inv.say_msg(Message::InRoom(name));
        }
    }
    for item in room.items.iter().filter_map(|id| world.item(id)) {
        inv.say(&item.short_desc);
    }
    for npc in room.npcs.iter().filter_map(|id| world.npc(id)) {
        inv.say(&npc.short_desc);
    }

    inv.write("[");
    inv.write_msg(Message::Exits);
    inv.write(": ");
    for exit in &room.exits {
        inv.write(&format!("{} ", exit.direction));
    }
    inv.say("]");
    CONTINUE
}

/// Leave the game. Refused mid-fight; otherwise the player is saved and then
/// taken offline once the save completes.
pub fn quit(inv: &Invocation<'_>) -> CommandResult {
    let player = inv.player()?;
    if player.in_combat {
        inv.say_msg(Message::CombatCommandFail);
        return CONTINUE;
    }

    inv.say_msg(Message::Goodbye);
    let world = Arc::clone(&inv.ctx().world);
    let username = player.username.clone();
    match &inv.ctx().saver {
        Some(saver) => saver.save(
            player,
            world.carried_items(inv.actor),
            Box::new(move |result| {
                if let Err(e) = result {
                    warn!("save on quit failed for {}: {}", username, e);
                }
                world.remove_player(&username);
                info!("{} quit", username);
            }),
        ),
        None => {
            world.remove_player(&username);
            info!("{} quit", username);
        }
    }
    Ok(CommandOutcome::Terminate)
}

pub fn remove(inv: &Invocation<'_>) -> CommandResult {
    let player = inv.player()?;
    let Some(item) = find_item_in_inventory(inv.world(), &player, inv.args) else {
        inv.say_msg(Message::ItemNotFound);
        return CONTINUE;
    };
    if !item.equipped {
        inv.say_msg(Message::ItemNotEquipped);
        return CONTINUE;
    }
    match inv.world().unequip(inv.actor, &item.id) {
        Some(_) => inv.say_msg(Message::ItemRemoved(item.short_desc)),
        None => inv.say_msg(Message::ItemNotEquipped),
    }
    CONTINUE
}

pub fn save(inv: &Invocation<'_>) -> CommandResult {
    let Some(saver) = &inv.ctx().saver else {
        inv.say_msg(Message::SaveUnavailable);
        return CONTINUE;
    };
    let player = inv.player()?;
    let output = Arc::clone(&inv.output);
    let username = player.username.clone();
    let carried = inv.world().carried_items(inv.actor);
    saver.save(
        player,
        carried,
        Box::new(move |result| match result {
            Ok(()) => output.say_msg(&Message::Saved),
            Err(e) => {
                warn!("save failed for {}: {}", username, e);
                output.say_msg(&Message::SaveFailed);
            }
        }),
    );
    CONTINUE
}

pub fn where_am_i(inv: &Invocation<'_>) -> CommandResult {
    let player = inv.player()?;
    match inv.world().room(&player.location) {
        Some(room) => inv.say(&room.area),
        None => inv.say_msg(Message::Limbo),
    }
    CONTINUE
}

pub fn who(inv: &Invocation<'_>) -> CommandResult {
    inv.world().each(|p, _| inv.say(&p.username));
    CONTINUE
}

/// Wield a carried item. Items with a script that listens for `Wield`
/// decide for themselves; everything else goes straight into the wield slot.
pub fn wield(inv: &Invocation<'_>) -> CommandResult {
    let world = inv.world();
    let player = inv.player()?;
    if let Some(current) = player.equipped(WIELD_SLOT) {
        let desc = world
            .item(current)
            .map(|i| i.short_desc)
            .unwrap_or_else(|| current.to_string());
        inv.say_msg(Message::CantWield(desc));
        return CONTINUE;
    }
    let Some(item) = find_item_in_inventory(world, &player, inv.args) else {
        inv.say_msg(Message::ItemNotFound);
        return CONTINUE;
    };

    let behaviors = &inv.ctx().behaviors;
    if behaviors.listens(item.behavior.as_deref(), EventKind::Wield) {
        let event = Event::new(EventKind::Wield, Subject::Item(item.id.clone()), inv.actor, &player.location)
            .with_item(&item.id);
        behaviors.emit(item.behavior.as_deref(), &event, world)?;
        return CONTINUE;
    }

    if world.equip(inv.actor, WIELD_SLOT, &item.id) {
        inv.say_msg(Message::ItemWielded(item.short_desc));
    } else {
        inv.say_msg(Message::ItemNotFound);
    }
    CONTINUE
}
