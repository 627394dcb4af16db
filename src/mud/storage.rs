//! Sled-backed player persistence.
//!
//! Commands never wait on the disk: [`PlayerSaver::save`] hands the record
//! off and reports back through a completion callback.
//!
//! Items a player carries are stored next to the player under their
//! instance id, so a returning player gets the same copies back.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use sled::IVec;

use crate::mud::errors::MudError;
use crate::mud::types::{ItemRecord, PlayerRecord, PLAYER_SCHEMA_VERSION};

const TREE_PLAYERS: &str = "players";
const TREE_ITEMS: &str = "items";

pub type SaveCallback = Box<dyn FnOnce(Result<(), MudError>) + Send + 'static>;

/// Asynchronous, fire-and-forget player persistence.
pub trait PlayerSaver: Send + Sync {
    /// Persist `record` and the items it carries, then call `done` with the outcome.
    fn save(&self, record: PlayerRecord, carried: Vec<ItemRecord>, done: SaveCallback);
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct MudStoreBuilder {
    path: PathBuf,
}

impl MudStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<MudStore, MudError> {
        MudStore::open(self.path)
    }
}

#[derive(Clone)]
pub struct MudStore {
    _db: sled::Db,
    players: sled::Tree,
    items: sled::Tree,
}

impl MudStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MudError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let players = db.open_tree(TREE_PLAYERS)?;
        let items = db.open_tree(TREE_ITEMS)?;
        Ok(Self {
            _db: db,
            players,
            items,
        })
    }

    fn players_key(username: &str) -> Vec<u8> {
        format!("players:{}", username.to_ascii_lowercase()).into_bytes()
    }

    fn items_key(id: &str) -> Vec<u8> {
        format!("items:{}", id).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, MudError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, MudError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    /// Insert or update a player record.
    pub fn put_player(&self, mut player: PlayerRecord) -> Result<(), MudError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        let key = Self::players_key(&player.username);
        let bytes = Self::serialize(&player)?;
        self.players.insert(key, bytes)?;
        self.players.flush()?;
        Ok(())
    }

    /// Fetch a player record by username.
    pub fn get_player(&self, username: &str) -> Result<PlayerRecord, MudError> {
        let key = Self::players_key(username);
        let Some(bytes) = self.players.get(&key)? else {
            return Err(MudError::NotFound(format!("player: {}", username)));
        };
        let record: PlayerRecord = Self::deserialize(bytes)?;
        if record.schema_version != PLAYER_SCHEMA_VERSION {
            return Err(MudError::SchemaMismatch {
                entity: "player",
                expected: PLAYER_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// Write a player together with the items they carry. Items go first so a
    /// stored inventory never names an item that was not written.
    pub fn put_player_with_items(&self, player: PlayerRecord, carried: &[ItemRecord]) -> Result<(), MudError> {
        for item in carried {
            self.items.insert(Self::items_key(&item.id), Self::serialize(item)?)?;
        }
        self.items.flush()?;
        self.put_player(player)
    }

    pub fn get_item(&self, id: &str) -> Result<ItemRecord, MudError> {
        let Some(bytes) = self.items.get(Self::items_key(id))? else {
            return Err(MudError::NotFound(format!("item: {}", id)));
        };
        Self::deserialize(bytes)
    }

    /// Stored copies of everything in `player`'s inventory. Ids with no stored
    /// item are skipped.
    pub fn carried_items(&self, player: &PlayerRecord) -> Result<Vec<ItemRecord>, MudError> {
        let mut carried = Vec::with_capacity(player.inventory.len());
        for id in &player.inventory {
            match self.get_item(id) {
                Ok(item) => carried.push(item),
                Err(MudError::NotFound(_)) => warn!("{} carries unknown item {}", player.username, id),
                Err(e) => return Err(e),
            }
        }
        Ok(carried)
    }

    /// Load a returning player or create a fresh one in `start_room`.
    pub fn load_or_create(&self, username: &str, start_room: &str) -> Result<PlayerRecord, MudError> {
        match self.get_player(username) {
            Ok(record) => Ok(record),
            Err(MudError::NotFound(_)) => Ok(PlayerRecord::new(username, start_room)),
            Err(e) => Err(e),
        }
    }

    /// List all stored usernames (lowercased).
    pub fn list_player_ids(&self) -> Result<Vec<String>, MudError> {
        let mut ids = Vec::new();
        for entry in self.players.scan_prefix(b"players:") {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(username) = text.strip_prefix("players:") {
                ids.push(username.to_string());
            }
        }
        Ok(ids)
    }
}

impl PlayerSaver for MudStore {
    /// Runs on tokio's blocking pool when called inside a runtime, inline otherwise.
    fn save(&self, record: PlayerRecord, carried: Vec<ItemRecord>, done: SaveCallback) {
        let store = self.clone();
        let username = record.username.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    let result = store.put_player_with_items(record, &carried);
                    debug!("saved {} ({})", username, if result.is_ok() { "ok" } else { "failed" });
                    done(result);
                });
            }
            Err(_) => {
                let result = store.put_player_with_items(record, &carried);
                debug!("saved {} inline", username);
                done(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use tempfile::TempDir;

    #[test]
    fn store_round_trip_player() {
        let dir = TempDir::new().expect("tempdir");
        let store = MudStoreBuilder::new(dir.path()).open().expect("store");
        let mut player = PlayerRecord::new("Alice", "square");
        player.inventory.push("item-1".into());
        store.put_player(player.clone()).expect("put");

        let fetched = store.get_player("alice").expect("get");
        assert_eq!(fetched, player);
        assert_eq!(store.list_player_ids().unwrap(), vec!["alice"]);
    }

    #[test]
    fn carried_items_are_stored_with_the_player() {
        let dir = TempDir::new().expect("tempdir");
        let store = MudStore::open(dir.path()).expect("store");
        let mut sword = ItemRecord::new("9f1c", "short_sword", "a short sword", "Plain.");
        sword.inventory = Some("alice".into());
        sword.equipped = true;
        let mut player = PlayerRecord::new("alice", "square");
        player.inventory = vec!["9f1c".into(), "lost-1".into()];
        player.equipment.insert("wield".into(), "9f1c".into());
        store
            .put_player_with_items(player, std::slice::from_ref(&sword))
            .expect("put");

        let fetched = store.get_player("alice").expect("get");
        let carried = store.carried_items(&fetched).expect("carried");
        assert_eq!(carried, vec![sword]);
        assert!(matches!(store.get_item("lost-1"), Err(MudError::NotFound(_))));
    }

    #[test]
    fn missing_player_is_created_fresh() {
        let dir = TempDir::new().expect("tempdir");
        let store = MudStore::open(dir.path()).expect("store");
        let fresh = store.load_or_create("bob", "square").expect("load");
        assert_eq!(fresh.location, "square");
        assert!(fresh.inventory.is_empty());
    }

    #[test]
    fn schema_mismatch_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        let store = MudStore::open(dir.path()).expect("store");
        let mut player = PlayerRecord::new("carol", "square");
        player.schema_version = PLAYER_SCHEMA_VERSION + 1;
        let bytes = bincode::serialize(&player).unwrap();
        store
            .players
            .insert(MudStore::players_key("carol"), bytes)
            .unwrap();

        let err = store.get_player("carol").unwrap_err();
        assert!(matches!(err, MudError::SchemaMismatch { entity: "player", .. }));
    }

    #[test]
    fn save_without_runtime_completes_inline() {
        let dir = TempDir::new().expect("tempdir");
        let store = MudStore::open(dir.path()).expect("store");
        let (tx, rx) = mpsc::channel();
        store.save(
            PlayerRecord::new("dave", "market"),
            Vec::new(),
            Box::new(move |result| {
                tx.send(result.is_ok()).unwrap();
            }),
        );
        assert_eq!(rx.try_recv(), Ok(true));
        assert_eq!(store.get_player("dave").unwrap().location, "market");
    }

    #[tokio::test]
    async fn save_inside_runtime_calls_back_later() {
        let dir = TempDir::new().expect("tempdir");
        let store = MudStore::open(dir.path()).expect("store");
        let (tx, rx) = tokio::sync::oneshot::channel();
        store.save(
            PlayerRecord::new("erin", "temple"),
            Vec::new(),
            Box::new(move |result| {
                let _ = tx.send(result.is_ok());
            }),
        );
        assert_eq!(rx.await, Ok(true));
        assert_eq!(store.get_player("erin").unwrap().location, "temple");
    }
}
