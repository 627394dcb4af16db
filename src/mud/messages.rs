//! Player-facing message catalog.
//!
//! Every canned line the core sends is a [`Message`] variant; the English
//! rendering lives in one `Display` impl so a translated catalog can replace
//! it without touching command code.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    ItemNotFound,
    ItemWorn,
    ItemDrop(String),
    ItemPickup(String),
    ItemNotEquipped,
    ItemRemoved(String),
    ItemWielded(String),
    CantWield(String),
    CarryMax,
    GetCombat,
    Inventory,
    InventoryEmpty,
    InRoom(String),
    Exits,
    KillPacifist,
    CombatCommandFail,
    Saved,
    SaveFailed,
    SaveUnavailable,
    Limbo,
    AmbiguousExit,
    MoveCombat,
    Leave(String),
    UnknownCommand(String),
    GoWhere,
    NoExit,
    CommandFailed,
    Goodbye,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::ItemNotFound => write!(f, "You don't see that here."),
            Message::ItemWorn => write!(f, "You have to remove that first."),
            Message::ItemDrop(item) => write!(f, "You drop {}.", item),
            Message::ItemPickup(item) => write!(f, "You pick up {}.", item),
            Message::ItemNotEquipped => write!(f, "You aren't wearing that."),
            Message::ItemRemoved(item) => write!(f, "You stop using {}.", item),
            Message::ItemWielded(item) => write!(f, "You wield {}.", item),
            Message::CantWield(item) => write!(f, "You are already wielding {}.", item),
            Message::CarryMax => write!(f, "You can't carry any more."),
            Message::GetCombat => write!(f, "You can't pick things up in the middle of a fight!"),
            Message::Inventory => write!(f, "You are carrying:"),
            Message::InventoryEmpty => write!(f, "Nothing."),
            Message::InRoom(name) => write!(f, "{} is here.", name),
            Message::Exits => write!(f, "Exits"),
            Message::KillPacifist => write!(f, "They aren't interested in fighting you."),
            Message::CombatCommandFail => write!(f, "You can't do that while in combat!"),
            Message::Saved => write!(f, "Saved."),
            Message::SaveFailed => write!(f, "Saving failed. Please try again later."),
            Message::SaveUnavailable => write!(f, "Saving is not available right now."),
            Message::Limbo => write!(f, "You are floating in a void. There is nothing here."),
            Message::AmbiguousExit => write!(f, "Which way? That could mean more than one exit."),
            Message::MoveCombat => write!(f, "You are in the middle of a fight! You can't leave."),
            Message::Leave(name) => write!(f, "{} leaves.", name),
            Message::UnknownCommand(cmd) => write!(f, "{}: command not found", cmd),
            Message::GoWhere => write!(f, "Go where?"),
            Message::NoExit => write!(f, "You can't go that way."),
            Message::CommandFailed => write!(f, "Something went wrong. Please try again."),
            Message::Goodbye => write!(f, "Goodbye!"),
        }
    }
}
