//! One owning task per table. Every operation against a table goes through
//! its task's queue and is applied strictly in arrival order, so two
//! concurrent requests can never race a read-modify-write against the store:
//! state lives in memory, and persistence is an append after each mutation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};

use crate::cards::{Card, CardOrigin};
use crate::error::GameError;
use crate::logging;
use crate::notify::Notifier;
use crate::storage::SnapshotStore;
use crate::table::{PlayOutcome, Table};
use crate::view::TableView;

enum TableCommand {
	Join {
		username: String,
		reply: oneshot::Sender<Result<TableView, GameError>>,
	},
	Deal {
		deck: Option<Vec<Card>>,
		reply: oneshot::Sender<Result<TableView, GameError>>,
	},
	Play {
		username: String,
		cards: Vec<Card>,
		origin: CardOrigin,
		reply: oneshot::Sender<Result<TableView, GameError>>,
	},
	PlayOrTake {
		username: String,
		cards: Vec<Card>,
		origin: CardOrigin,
		reply: oneshot::Sender<Result<(PlayOutcome, TableView), GameError>>,
	},
	Take {
		username: String,
		reply: oneshot::Sender<Result<TableView, GameError>>,
	},
	View {
		reply: oneshot::Sender<TableView>,
	},
}

/// Client end of a table task. Cheap to clone; the task lives for as long as
/// any handle does.
#[derive(Clone)]
pub struct TableHandle {
	tx: mpsc::Sender<TableCommand>,
}

impl TableHandle {
	pub async fn join(&self, username: &str) -> Result<TableView, GameError> {
		let (reply, rx) = oneshot::channel();
		self.send(TableCommand::Join { username: username.to_string(), reply }).await;
		rx.await.expect("table task stopped")
	}

	pub async fn deal(&self) -> Result<TableView, GameError> {
		let (reply, rx) = oneshot::channel();
		self.send(TableCommand::Deal { deck: None, reply }).await;
		rx.await.expect("table task stopped")
	}

	/// Deal from a deck the caller already shuffled, for seeded games.
	pub async fn deal_shuffled(&self, deck: Vec<Card>) -> Result<TableView, GameError> {
		let (reply, rx) = oneshot::channel();
		self.send(TableCommand::Deal { deck: Some(deck), reply }).await;
		rx.await.expect("table task stopped")
	}

	pub async fn play_cards(
		&self,
		cards: Vec<Card>,
		username: &str,
		origin: CardOrigin,
	) -> Result<TableView, GameError> {
		let (reply, rx) = oneshot::channel();
		self.send(TableCommand::Play {
			username: username.to_string(),
			cards,
			origin,
			reply,
		})
		.await;
		rx.await.expect("table task stopped")
	}

	pub async fn play_cards_or_take_played_cards(
		&self,
		cards: Vec<Card>,
		username: &str,
		origin: CardOrigin,
	) -> Result<(PlayOutcome, TableView), GameError> {
		let (reply, rx) = oneshot::channel();
		self.send(TableCommand::PlayOrTake {
			username: username.to_string(),
			cards,
			origin,
			reply,
		})
		.await;
		rx.await.expect("table task stopped")
	}

	pub async fn take_played_cards(&self, username: &str) -> Result<TableView, GameError> {
		let (reply, rx) = oneshot::channel();
		self.send(TableCommand::Take { username: username.to_string(), reply }).await;
		rx.await.expect("table task stopped")
	}

	pub async fn view(&self) -> TableView {
		let (reply, rx) = oneshot::channel();
		self.send(TableCommand::View { reply }).await;
		rx.await.expect("table task stopped")
	}

	async fn send(&self, command: TableCommand) {
		self.tx.send(command).await.expect("table task stopped");
	}
}

/// Spawn the owning task for one table. The latest snapshot is loaded before
/// the first command is taken; a table that has never been touched starts
/// empty and gets its first snapshot right away.
pub fn spawn_table(
	table_id: String,
	store: Arc<dyn SnapshotStore>,
	notifier: Arc<dyn Notifier>,
) -> TableHandle {
	let (tx, rx) = mpsc::channel(32);
	tokio::spawn(run_table(table_id, store, notifier, rx));
	TableHandle { tx }
}

/// Lazily spawns and hands out the task for each table id.
pub struct TableRegistry {
	store: Arc<dyn SnapshotStore>,
	notifier: Arc<dyn Notifier>,
	tables: Mutex<HashMap<String, TableHandle>>,
}

impl TableRegistry {
	pub fn new(store: Arc<dyn SnapshotStore>, notifier: Arc<dyn Notifier>) -> Self {
		Self {
			store,
			notifier,
			tables: Mutex::new(HashMap::new()),
		}
	}

	pub fn table(&self, table_id: &str) -> TableHandle {
		let mut tables = self.tables.lock().unwrap();
		tables
			.entry(table_id.to_string())
			.or_insert_with(|| {
				spawn_table(
					table_id.to_string(),
					Arc::clone(&self.store),
					Arc::clone(&self.notifier),
				)
			})
			.clone()
	}
}

async fn run_table(
	table_id: String,
	store: Arc<dyn SnapshotStore>,
	notifier: Arc<dyn Notifier>,
	mut rx: mpsc::Receiver<TableCommand>,
) {
	let mut table = match store.load_latest(&table_id).await {
		Ok(Some(table)) => {
			logging::store::loaded(&table_id, true);
			table
		}
		Ok(None) => {
			logging::store::loaded(&table_id, false);
			let table = Table::new();
			persist(store.as_ref(), &table_id, &table).await;
			table
		}
		Err(error) => {
			logging::store::snapshot_error(&table_id, &error);
			Table::new()
		}
	};
	let mut finished_count = table.finished_usernames.len();

	while let Some(command) = rx.recv().await {
		match command {
			TableCommand::Join { username, reply } => {
				match table.add_player(&username) {
					Ok(added) => {
						if added {
							persist(store.as_ref(), &table_id, &table).await;
						}
						logging::table::joined(&table_id, &username);
						notifier.publish(&table_id, &format!("{} joined the game", username));
						let _ = reply.send(Ok(TableView::from(&table)));
					}
					Err(error) => {
						let _ = reply.send(Err(error));
					}
				}
			}

			TableCommand::Deal { deck, reply } => {
				let result = match deck {
					Some(deck) => table.deal_shuffled(deck),
					None => table.deal(),
				};
				match result {
					Ok(dealt) => {
						if dealt {
							persist(store.as_ref(), &table_id, &table).await;
							logging::table::dealt(&table_id, table.players.len());
						}
						notifier.publish(&table_id, "the cards have been dealt");
						let _ = reply.send(Ok(TableView::from(&table)));
					}
					Err(error) => {
						let _ = reply.send(Err(error));
					}
				}
			}

			TableCommand::Play { username, cards, origin, reply } => {
				let described = describe_cards(&cards);
				match table.play_cards(&cards, &username, origin) {
					Ok(()) => {
						persist(store.as_ref(), &table_id, &table).await;
						logging::table::played(&table_id, &username, &described);

						let mut message = format!("{} played {}", username, described);
						if table.played_cards.is_empty() {
							message.push_str(" and burned the pile");
							logging::table::burned(&table_id);
						}
						notifier.publish(&table_id, &message);
						note_progress(&table_id, &table, &mut finished_count);
						let _ = reply.send(Ok(TableView::from(&table)));
					}
					Err(error) => {
						// other players still get told about the attempt
						logging::table::rejected(&table_id, &username, &error.to_string());
						notifier.publish(
							&table_id,
							&format!(
								"{} played {} illegally. should they take the pile?",
								username, described
							),
						);
						let _ = reply.send(Err(error));
					}
				}
			}

			TableCommand::PlayOrTake { username, cards, origin, reply } => {
				let described = describe_cards(&cards);
				let pile_size = table.played_cards.len();
				match table.play_cards_or_take_played_cards(&cards, &username, origin) {
					Ok(outcome) => {
						persist(store.as_ref(), &table_id, &table).await;
						let message = match outcome {
							PlayOutcome::Played => {
								logging::table::played(&table_id, &username, &described);
								let mut message = format!("{} played {}", username, described);
								if table.played_cards.is_empty() {
									message.push_str(" and burned the pile");
									logging::table::burned(&table_id);
								}
								message
							}
							PlayOutcome::TookPile => {
								logging::table::took_pile(
									&table_id,
									&username,
									pile_size + cards.len(),
								);
								format!("{} played {} and took the pile", username, described)
							}
						};
						notifier.publish(&table_id, &message);
						note_progress(&table_id, &table, &mut finished_count);
						let _ = reply.send(Ok((outcome, TableView::from(&table))));
					}
					Err(error) => {
						logging::table::rejected(&table_id, &username, &error.to_string());
						let _ = reply.send(Err(error));
					}
				}
			}

			TableCommand::Take { username, reply } => {
				let pile_size = table.played_cards.len();
				match table.take_played_cards(&username) {
					Ok(()) => {
						persist(store.as_ref(), &table_id, &table).await;
						logging::table::took_pile(&table_id, &username, pile_size);
						notifier.publish(&table_id, &format!("{} took the pile", username));
						let _ = reply.send(Ok(TableView::from(&table)));
					}
					Err(error) => {
						let _ = reply.send(Err(error));
					}
				}
			}

			TableCommand::View { reply } => {
				let _ = reply.send(TableView::from(&table));
			}
		}
	}
}

async fn persist(store: &dyn SnapshotStore, table_id: &str, table: &Table) {
	if let Err(error) = store.append_snapshot(table_id, table).await {
		logging::store::snapshot_error(table_id, &error);
	}
}

fn note_progress(table_id: &str, table: &Table, finished_count: &mut usize) {
	while *finished_count < table.finished_usernames.len() {
		let username = &table.finished_usernames[*finished_count];
		*finished_count += 1;
		logging::table::finished(table_id, username, *finished_count);
	}
	if table.is_over() {
		logging::table::game_over(table_id);
	}
}

fn describe_cards(cards: &[Card]) -> String {
	cards
		.iter()
		.map(|card| card.rank.to_string())
		.collect::<Vec<_>>()
		.join(", ")
}
