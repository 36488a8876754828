use tokio::sync::broadcast;

use crate::logging;

/// One human-readable line about something that happened at a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMessage {
	pub table_id: String,
	pub message: String,
}

/// The notification collaborator. Fire-and-forget: a publish that goes
/// nowhere must never fail the game operation that triggered it.
pub trait Notifier: Send + Sync {
	fn publish(&self, table_id: &str, message: &str);
}

/// Fans messages out to every subscriber over a broadcast channel.
pub struct BroadcastNotifier {
	tx: broadcast::Sender<TableMessage>,
}

impl BroadcastNotifier {
	pub fn new(capacity: usize) -> Self {
		let (tx, _) = broadcast::channel(capacity);
		Self { tx }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<TableMessage> {
		self.tx.subscribe()
	}
}

impl Notifier for BroadcastNotifier {
	fn publish(&self, table_id: &str, message: &str) {
		// no subscribers is fine
		let _ = self.tx.send(TableMessage {
			table_id: table_id.to_string(),
			message: message.to_string(),
		});
	}
}

/// Writes every message to the log file instead of a channel.
pub struct LogNotifier;

impl Notifier for LogNotifier {
	fn publish(&self, table_id: &str, message: &str) {
		logging::log("Notify", "EVENT", &format!("{}: {}", table_id, message));
	}
}

/// Swallows everything.
pub struct NullNotifier;

impl Notifier for NullNotifier {
	fn publish(&self, _table_id: &str, _message: &str) {}
}
