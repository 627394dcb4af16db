//! World seed loading.
//!
//! A seed is one JSON document with `rooms`, `items` and `npcs` arrays. Items
//! are templates: each seed entry may ask for several copies, and every copy
//! becomes its own instance with a fresh uuid so dot-notation (`2.potion`)
//! can tell them apart. Rooms list items and NPCs in seed order.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::mud::errors::MudError;
use crate::mud::types::{Exit, ItemRecord, NpcRecord, RoomRecord};
use crate::mud::world::World;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExitSeed {
    pub direction: String,
    pub location: String,
    #[serde(default)]
    pub leave_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomSeed {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub exits: Vec<ExitSeed>,
    #[serde(default)]
    pub behavior: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemSeed {
    pub vnum: String,
    pub short_desc: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Room the copies start in.
    pub room: String,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub behavior: Option<String>,
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NpcSeed {
    pub id: String,
    pub short_desc: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub level: Option<u32>,
    pub room: String,
    #[serde(default)]
    pub behavior: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorldSeed {
    #[serde(default)]
    pub rooms: Vec<RoomSeed>,
    #[serde(default)]
    pub items: Vec<ItemSeed>,
    #[serde(default)]
    pub npcs: Vec<NpcSeed>,
}

/// Load a world seed from a JSON file.
pub fn load_world_seed<P: AsRef<Path>>(path: P) -> Result<WorldSeed, MudError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let seed = WorldSeed::from_json(&contents)?;
    debug!(
        "Loaded seed {}: {} rooms, {} items, {} npcs",
        path.display(),
        seed.rooms.len(),
        seed.items.len(),
        seed.npcs.len()
    );
    Ok(seed)
}

impl WorldSeed {
    pub fn from_json(text: &str) -> Result<Self, MudError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Integrity problems: duplicate ids, exits into the void, items or NPCs
    /// placed in rooms that do not exist. An empty list means the seed is sound.
    pub fn check(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut room_ids: Vec<&str> = Vec::with_capacity(self.rooms.len());
        for room in &self.rooms {
            if room_ids.contains(&room.id.as_str()) {
                problems.push(format!("duplicate room id {}", room.id));
            }
            room_ids.push(&room.id);
        }
        let known = |id: &str| self.rooms.iter().any(|r| r.id == id);

        for room in &self.rooms {
            let mut seen: Vec<&str> = Vec::new();
            for exit in &room.exits {
                if seen.contains(&exit.direction.as_str()) {
                    problems.push(format!("room {} has two '{}' exits", room.id, exit.direction));
                }
                seen.push(&exit.direction);
                if !known(&exit.location) {
                    problems.push(format!(
                        "exit {} in {} leads to missing room {}",
                        exit.direction, room.id, exit.location
                    ));
                }
            }
        }
        for item in &self.items {
            if !known(&item.room) {
                problems.push(format!("item {} placed in missing room {}", item.vnum, item.room));
            }
        }
        let mut npc_ids: Vec<&str> = Vec::new();
        for npc in &self.npcs {
            if npc_ids.contains(&npc.id.as_str()) {
                problems.push(format!("duplicate npc id {}", npc.id));
            }
            npc_ids.push(&npc.id);
            if !known(&npc.room) {
                problems.push(format!("npc {} placed in missing room {}", npc.id, npc.room));
            }
        }
        problems
    }

    /// Populate `world`. Items and NPCs whose room is missing are skipped
    /// with a warning; exits are kept as written so a void exit stays void.
    pub fn build_into(&self, world: &World) {
        for seed in &self.rooms {
            let mut room = RoomRecord::new(&seed.id, &seed.title, &seed.description).with_area(&seed.area);
            for exit in &seed.exits {
                let mut built = Exit::new(&exit.direction, &exit.location);
                if let Some(message) = &exit.leave_message {
                    built = built.with_leave_message(message);
                }
                room = room.with_exit(built);
            }
            if let Some(behavior) = &seed.behavior {
                room = room.with_behavior(behavior);
            }
            world.insert_room(room);
        }

        for seed in &self.items {
            if world.room(&seed.room).is_none() {
                warn!("skipping item {}: missing room {}", seed.vnum, seed.room);
                continue;
            }
            let keywords: Vec<&str> = seed.keywords.iter().map(String::as_str).collect();
            for _ in 0..seed.count {
                let id = uuid::Uuid::new_v4().to_string();
                let mut item = ItemRecord::new(&id, &seed.vnum, &seed.short_desc, &seed.description)
                    .with_keywords(&keywords);
                if let Some(behavior) = &seed.behavior {
                    item = item.with_behavior(behavior);
                }
                item.room = Some(seed.room.clone());
                world.insert_item(item);
            }
        }

        for seed in &self.npcs {
            if world.room(&seed.room).is_none() {
                warn!("skipping npc {}: missing room {}", seed.id, seed.room);
                continue;
            }
            let keywords: Vec<&str> = seed.keywords.iter().map(String::as_str).collect();
            let mut npc = NpcRecord::new(&seed.id, &seed.short_desc, &seed.description).with_keywords(&keywords);
            if let Some(level) = seed.level {
                npc.level = level;
            }
            if let Some(behavior) = &seed.behavior {
                npc = npc.with_behavior(behavior);
            }
            world.insert_npc(npc, &seed.room);
        }
    }

    /// Build a fresh world from this seed.
    pub fn build_world(&self) -> World {
        let world = World::new();
        self.build_into(&world);
        world
    }
}
