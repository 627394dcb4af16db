//! Shared world state: rooms, items, NPCs and online players.
//!
//! Everything lives behind one `RwLock` so that multi-record changes (a
//! player picking an item off the floor, a player walking through an exit)
//! are observed atomically by other sessions. Room occupancy for players is
//! derived from `PlayerRecord::location`; there is no second copy to drift.
//!
//! Callbacks handed to [`World::each`] and friends run on a snapshot taken
//! under the read lock and released before the first call, so an output sink
//! or behavior may freely come back into the world.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use crate::mud::errors::MudError;
use crate::mud::output::Output;
use crate::mud::types::{ItemRecord, NpcRecord, PlayerRecord, RoomRecord};

struct OnlinePlayer {
    record: PlayerRecord,
    output: Arc<dyn Output>,
}

#[derive(Default)]
struct WorldState {
    rooms: HashMap<String, RoomRecord>,
    items: HashMap<String, ItemRecord>,
    npcs: HashMap<String, NpcRecord>,
    /// Connection order; `who` lists players in this order.
    players: Vec<OnlinePlayer>,
}

impl WorldState {
    fn player(&self, username: &str) -> Option<&OnlinePlayer> {
        self.players.iter().find(|p| p.record.username == username)
    }

    fn player_mut(&mut self, username: &str) -> Option<&mut OnlinePlayer> {
        self.players.iter_mut().find(|p| p.record.username == username)
    }
}

#[derive(Default)]
pub struct World {
    state: RwLock<WorldState>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation is a plain field assignment, so a panic elsewhere cannot
    // leave half-written state behind; recover from poisoning.
    fn read(&self) -> RwLockReadGuard<'_, WorldState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, WorldState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert_room(&self, room: RoomRecord) {
        self.write().rooms.insert(room.id.clone(), room);
    }

    /// Store an item; if it names a room, append it to that room's item list.
    pub fn insert_item(&self, item: ItemRecord) {
        let mut state = self.write();
        if let Some(room_id) = item.room.clone() {
            if let Some(room) = state.rooms.get_mut(&room_id) {
                if !room.items.contains(&item.id) {
                    room.add_item(&item.id);
                }
            }
        }
        state.items.insert(item.id.clone(), item);
    }

    /// Store an NPC and place it in `room_id`.
    pub fn insert_npc(&self, npc: NpcRecord, room_id: &str) {
        let mut state = self.write();
        if let Some(room) = state.rooms.get_mut(room_id) {
            if !room.npcs.contains(&npc.id) {
                room.npcs.push(npc.id.clone());
            }
        }
        state.npcs.insert(npc.id.clone(), npc);
    }

    pub fn room(&self, id: &str) -> Option<RoomRecord> {
        self.read().rooms.get(id).cloned()
    }

    pub fn item(&self, id: &str) -> Option<ItemRecord> {
        self.read().items.get(id).cloned()
    }

    pub fn npc(&self, id: &str) -> Option<NpcRecord> {
        self.read().npcs.get(id).cloned()
    }

    pub fn room_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().rooms.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Bring a player online.
    pub fn add_player(&self, record: PlayerRecord, output: Arc<dyn Output>) -> Result<(), MudError> {
        let mut state = self.write();
        if state.player(&record.username).is_some() {
            return Err(MudError::AlreadyOnline(record.username));
        }
        debug!("Player {} online in {}", record.username, record.location);
        state.players.push(OnlinePlayer { record, output });
        Ok(())
    }

    /// Take a player offline, returning the final record.
    pub fn remove_player(&self, username: &str) -> Option<PlayerRecord> {
        let mut state = self.write();
        let pos = state.players.iter().position(|p| p.record.username == username)?;
        let removed = state.players.remove(pos);
        debug!("Player {} offline (was in {})", username, removed.record.location);
        Some(removed.record)
    }

    pub fn player(&self, username: &str) -> Option<PlayerRecord> {
        self.read().player(username).map(|p| p.record.clone())
    }

    pub fn output(&self, username: &str) -> Option<Arc<dyn Output>> {
        self.read().player(username).map(|p| Arc::clone(&p.output))
    }

    pub fn update_player<R>(&self, username: &str, f: impl FnOnce(&mut PlayerRecord) -> R) -> Option<R> {
        let mut state = self.write();
        state.player_mut(username).map(|p| f(&mut p.record))
    }

    /// Move a player's location. This is the only write movement performs.
    pub fn set_location(&self, username: &str, room_id: &str) -> bool {
        self.update_player(username, |p| p.location = room_id.to_string())
            .is_some()
    }

    pub fn set_combat(&self, username: &str, in_combat: bool) -> bool {
        self.update_player(username, |p| p.in_combat = in_combat).is_some()
    }

    /// Usernames of online players standing in `room_id`, in connection order.
    pub fn players_in_room(&self, room_id: &str) -> Vec<String> {
        self.read()
            .players
            .iter()
            .filter(|p| p.record.location == room_id)
            .map(|p| p.record.username.clone())
            .collect()
    }

    /// Room id -> usernames standing there, for every online player, read
    /// under one lock.
    pub fn occupancy(&self) -> HashMap<String, Vec<String>> {
        let mut rooms: HashMap<String, Vec<String>> = HashMap::new();
        for p in &self.read().players {
            rooms
                .entry(p.record.location.clone())
                .or_default()
                .push(p.record.username.clone());
        }
        rooms
    }

    pub fn online_count(&self) -> usize {
        self.read().players.len()
    }

    fn snapshot(&self) -> Vec<(PlayerRecord, Arc<dyn Output>)> {
        self.read()
            .players
            .iter()
            .map(|p| (p.record.clone(), Arc::clone(&p.output)))
            .collect()
    }

    pub fn each(&self, mut f: impl FnMut(&PlayerRecord, &dyn Output)) {
        for (record, output) in self.snapshot() {
            f(&record, output.as_ref());
        }
    }

    pub fn each_if(
        &self,
        pred: impl Fn(&PlayerRecord) -> bool,
        mut f: impl FnMut(&PlayerRecord, &dyn Output),
    ) {
        for (record, output) in self.snapshot() {
            if pred(&record) {
                f(&record, output.as_ref());
            }
        }
    }

    pub fn each_except(&self, username: &str, mut f: impl FnMut(&PlayerRecord, &dyn Output)) {
        self.each_if(|p| p.username != username, |p, out| f(p, out));
    }

    pub fn broadcast_if(&self, message: &str, pred: impl Fn(&PlayerRecord) -> bool) {
        self.each_if(pred, |_, out| out.say(message));
    }

    /// Records of everything `username` carries, in inventory order.
    pub fn carried_items(&self, username: &str) -> Vec<ItemRecord> {
        let state = self.read();
        let Some(player) = state.player(username) else {
            return Vec::new();
        };
        player
            .record
            .inventory
            .iter()
            .filter_map(|id| state.items.get(id).cloned())
            .collect()
    }

    /// Put a returning player's stored items back into the world before they
    /// come online. Inventory and equipment entries with no matching item are
    /// dropped from `record`.
    pub fn restore_carried(&self, record: &mut PlayerRecord, carried: Vec<ItemRecord>) {
        let mut state = self.write();
        let WorldState { rooms, items, .. } = &mut *state;
        for mut item in carried {
            if let Some(room_id) = items.get(&item.id).and_then(|old| old.room.clone()) {
                if let Some(room) = rooms.get_mut(&room_id) {
                    room.remove_item(&item.id);
                }
            }
            item.room = None;
            item.inventory = Some(record.username.clone());
            item.equipped = record.equipment.values().any(|id| *id == item.id);
            items.insert(item.id.clone(), item);
        }

        let username = record.username.clone();
        record
            .inventory
            .retain(|id| items.get(id).and_then(|i| i.inventory.as_deref()) == Some(username.as_str()));
        let inventory = &record.inventory;
        record.equipment.retain(|_, id| inventory.contains(id));
        debug!("restored {} item(s) for {}", record.inventory.len(), record.username);
    }

    /// Move an item from the floor of `room_id` into a player's inventory.
    ///
    /// Returns false, changing nothing, if the item is not on that floor or
    /// the player is offline.
    pub fn take_item(&self, username: &str, room_id: &str, item_id: &str) -> bool {
        let mut state = self.write();
        let WorldState {
            rooms,
            items,
            players,
            ..
        } = &mut *state;

        let Some(room) = rooms.get_mut(room_id) else {
            return false;
        };
        let Some(item) = items.get_mut(item_id) else {
            return false;
        };
        let Some(player) = players.iter_mut().find(|p| p.record.username == username) else {
            return false;
        };
        if !room.items.iter().any(|id| id == item_id) {
            return false;
        }

        room.remove_item(item_id);
        item.room = None;
        item.inventory = Some(username.to_string());
        item.equipped = false;
        player.record.inventory.push(item_id.to_string());
        true
    }

    /// Move an unequipped item from a player's inventory onto the floor of `room_id`.
    pub fn drop_item(&self, username: &str, room_id: &str, item_id: &str) -> bool {
        let mut state = self.write();
        let WorldState {
            rooms,
            items,
            players,
            ..
        } = &mut *state;

        let Some(room) = rooms.get_mut(room_id) else {
            return false;
        };
        let Some(item) = items.get_mut(item_id) else {
            return false;
        };
        let Some(player) = players.iter_mut().find(|p| p.record.username == username) else {
            return false;
        };
        if item.equipped || !player.record.inventory.iter().any(|id| id == item_id) {
            return false;
        }

        player.record.inventory.retain(|id| id != item_id);
        item.inventory = None;
        item.room = Some(room_id.to_string());
        room.add_item(item_id);
        true
    }

    /// Put a carried item into an equipment slot.
    pub fn equip(&self, username: &str, slot: &str, item_id: &str) -> bool {
        let mut state = self.write();
        let WorldState { items, players, .. } = &mut *state;
        let Some(item) = items.get_mut(item_id) else {
            return false;
        };
        let Some(player) = players.iter_mut().find(|p| p.record.username == username) else {
            return false;
        };
        if !player.record.inventory.iter().any(|id| id == item_id)
            || player.record.equipment.contains_key(slot)
        {
            return false;
        }
        player
            .record
            .equipment
            .insert(slot.to_string(), item_id.to_string());
        item.equipped = true;
        true
    }

    /// Take an item out of whatever slot holds it. Returns the slot name.
    pub fn unequip(&self, username: &str, item_id: &str) -> Option<String> {
        let mut state = self.write();
        let WorldState { items, players, .. } = &mut *state;
        let player = players.iter_mut().find(|p| p.record.username == username)?;
        let slot = player
            .record
            .equipment
            .iter()
            .find(|(_, id)| id.as_str() == item_id)
            .map(|(slot, _)| slot.clone())?;
        player.record.equipment.remove(&slot);
        if let Some(item) = items.get_mut(item_id) {
            item.equipped = false;
        }
        Some(slot)
    }
}
