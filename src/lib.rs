//! # mudcore - command interpretation core for a text MUD
//!
//! mudcore turns a line typed by a player into game behaviour: it looks the
//! command word up in a registry of handlers and aliases, falls back to the
//! exits of the player's room, resolves dot-notation targets such as
//! `get 2.potion`, and moves players between rooms with a fixed
//! leave / commit / arrive protocol.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use mudcore::mud::{Dispatch, Dispatcher, Exit, GameContext, PlayerRecord, RecordingOutput, RoomRecord, World};
//!
//! let world = Arc::new(World::new());
//! world.insert_room(RoomRecord::new("square", "Town Square", "A busy square.").with_exit(Exit::new("north", "market")));
//! world.insert_room(RoomRecord::new("market", "Market", "Stalls everywhere."));
//! let out = Arc::new(RecordingOutput::new());
//! world.add_player(PlayerRecord::new("alice", "square"), out.clone()).unwrap();
//!
//! let dispatcher = Dispatcher::with_builtin_commands(Arc::new(GameContext::new(world)));
//! let result = dispatcher.dispatch("north", "alice");
//! assert_eq!(result, Dispatch::Moved { from: "square".into(), to: "market".into() });
//! assert!(out.contents().contains("Market"));
//! ```
//!
//! ## Module Organization
//!
//! - [`mud`] - registry, resolver, exit matcher, dispatcher, movement, world state and commands
//! - [`config`] - TOML configuration and validation
//! - [`logutil`] - log-safe rendering of player input
//! - [`metrics`] - process-wide dispatch counters

pub mod config;
pub mod logutil;
pub mod metrics;
pub mod mud;
