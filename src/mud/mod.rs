//! Command interpretation core for a text MUD.
//!
//! Input flows through [`Dispatcher::dispatch`]: the first word is looked up
//! in the [`CommandRegistry`] and, failing that, matched against the exits of
//! the player's room. Commands find their targets through the dot-notation
//! [`resolver`]; movement runs the [`movement`] protocol. Shared state lives
//! in [`World`], and NPC, room and item scripts hang off the
//! [`events::Behavior`] trait.

pub mod behaviors;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod errors;
pub mod events;
pub mod exits;
pub mod messages;
pub mod movement;
pub mod output;
pub mod registry;
pub mod resolver;
pub mod seed;
pub mod storage;
pub mod types;
pub mod world;

pub use commands::builtin_registry;
pub use context::{GameContext, Settings};
pub use dispatch::{Dispatch, Dispatcher, Invocation, MoveResult, Rejection};
pub use errors::MudError;
pub use events::{Behavior, BehaviorRegistry, Event, EventKind, Subject};
pub use exits::{match_exit, ExitMatch};
pub use messages::Message;
pub use output::{ChannelOutput, Output, RecordingOutput};
pub use registry::{CommandOutcome, CommandRegistry, Handler};
pub use resolver::{find_item_in_inventory, find_item_in_room, find_npc_in_room, resolve, TargetQuery};
pub use seed::{load_world_seed, WorldSeed};
pub use storage::{MudStore, MudStoreBuilder, PlayerSaver, SaveCallback};
pub use types::*;
pub use world::World;
