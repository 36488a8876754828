use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::table::Table;

/// The persistence collaborator: an append-only log of full table snapshots,
/// one call per mutating operation. `load_latest` must return the most
/// recently appended snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
	async fn load_latest(&self, table_id: &str) -> Result<Option<Table>, String>;
	async fn append_snapshot(&self, table_id: &str, table: &Table) -> Result<(), String>;
}

/// On-disk store: `<root>/<table_id>/<utc-stamp>-<seq>.json`. Filenames sort
/// lexicographically in write order; the sequence number breaks same-instant
/// ties within a process.
pub struct FsSnapshotStore {
	root: PathBuf,
	seq: AtomicU64,
}

impl FsSnapshotStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into(), seq: AtomicU64::new(0) }
	}

	fn table_dir(&self, table_id: &str) -> PathBuf {
		self.root.join(table_id)
	}

	fn next_filename(&self) -> String {
		let stamp = Utc::now().format("%Y%m%dT%H%M%S%.6fZ");
		let seq = self.seq.fetch_add(1, Ordering::Relaxed);
		format!("{}-{:06}.json", stamp, seq)
	}
}

#[async_trait]
impl SnapshotStore for FsSnapshotStore {
	async fn load_latest(&self, table_id: &str) -> Result<Option<Table>, String> {
		let dir = self.table_dir(table_id);
		if !dir.is_dir() {
			return Ok(None);
		}

		let entries = fs::read_dir(&dir)
			.map_err(|e| format!("Failed to read {}: {}", dir.display(), e))?;
		let mut filenames: Vec<String> = entries
			.filter_map(|entry| entry.ok())
			.map(|entry| entry.file_name().to_string_lossy().to_string())
			.filter(|name| name.ends_with(".json"))
			.collect();
		filenames.sort();

		let Some(latest) = filenames.last() else {
			return Ok(None);
		};
		let path = dir.join(latest);
		let content = fs::read_to_string(&path)
			.map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
		let table = serde_json::from_str(&content)
			.map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
		Ok(Some(table))
	}

	async fn append_snapshot(&self, table_id: &str, table: &Table) -> Result<(), String> {
		let dir = self.table_dir(table_id);
		fs::create_dir_all(&dir)
			.map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;

		let path = dir.join(self.next_filename());
		let content = serde_json::to_string_pretty(table)
			.map_err(|e| format!("Failed to serialize snapshot: {}", e))?;
		fs::write(&path, content)
			.map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
		Ok(())
	}
}

/// In-memory store for tests and the demo binary.
#[derive(Default)]
pub struct MemoryStore {
	snapshots: Mutex<HashMap<String, Vec<Table>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn snapshot_count(&self, table_id: &str) -> usize {
		self.snapshots
			.lock()
			.unwrap()
			.get(table_id)
			.map(|log| log.len())
			.unwrap_or(0)
	}
}

#[async_trait]
impl SnapshotStore for MemoryStore {
	async fn load_latest(&self, table_id: &str) -> Result<Option<Table>, String> {
		let snapshots = self.snapshots.lock().unwrap();
		Ok(snapshots.get(table_id).and_then(|log| log.last().cloned()))
	}

	async fn append_snapshot(&self, table_id: &str, table: &Table) -> Result<(), String> {
		let mut snapshots = self.snapshots.lock().unwrap();
		snapshots.entry(table_id.to_string()).or_default().push(table.clone());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scratch_dir(test: &str) -> PathBuf {
		std::env::temp_dir().join(format!("carecaca-store-{}-{}", std::process::id(), test))
	}

	#[tokio::test]
	async fn test_memory_store_returns_the_latest_snapshot() {
		let store = MemoryStore::new();
		assert_eq!(store.load_latest("t1").await.unwrap().map(|t| t.started), None);

		let mut table = Table::new();
		table.add_player("alice").unwrap();
		store.append_snapshot("t1", &table).await.unwrap();

		table.add_player("bob").unwrap();
		store.append_snapshot("t1", &table).await.unwrap();

		let loaded = store.load_latest("t1").await.unwrap().unwrap();
		assert_eq!(loaded.players.len(), 2);
		assert_eq!(store.snapshot_count("t1"), 2);
		assert_eq!(store.snapshot_count("t2"), 0);
	}

	#[tokio::test]
	async fn test_memory_store_keeps_tables_apart() {
		let store = MemoryStore::new();
		let mut table = Table::new();
		table.add_player("alice").unwrap();
		store.append_snapshot("t1", &table).await.unwrap();

		assert!(store.load_latest("t2").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_fs_store_roundtrip() {
		let root = scratch_dir("roundtrip");
		let store = FsSnapshotStore::new(&root);

		assert!(store.load_latest("t1").await.unwrap().is_none());

		let mut table = Table::new();
		table.add_player("alice").unwrap();
		store.append_snapshot("t1", &table).await.unwrap();

		let loaded = store.load_latest("t1").await.unwrap().unwrap();
		assert_eq!(loaded.players.len(), 1);
		assert_eq!(loaded.players[0].username, "alice");

		let _ = fs::remove_dir_all(&root);
	}

	#[tokio::test]
	async fn test_fs_store_appends_and_loads_the_last_write() {
		let root = scratch_dir("append");
		let store = FsSnapshotStore::new(&root);

		let mut table = Table::new();
		table.add_player("alice").unwrap();
		store.append_snapshot("t1", &table).await.unwrap();
		table.add_player("bob").unwrap();
		store.append_snapshot("t1", &table).await.unwrap();
		table.add_player("carol").unwrap();
		store.append_snapshot("t1", &table).await.unwrap();

		// all three snapshots remain on disk
		let files = fs::read_dir(root.join("t1")).unwrap().count();
		assert_eq!(files, 3);

		let loaded = store.load_latest("t1").await.unwrap().unwrap();
		assert_eq!(loaded.players.len(), 3);

		let _ = fs::remove_dir_all(&root);
	}

	#[tokio::test]
	async fn test_fs_store_filenames_sort_in_write_order() {
		let store = FsSnapshotStore::new("unused");
		let a = store.next_filename();
		let b = store.next_filename();
		assert!(a < b, "{} should sort before {}", a, b);
	}
}
