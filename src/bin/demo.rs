use std::sync::Arc;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::broadcast;

use carecaca::cards::{self, Card, CardOrigin, Rank};
use carecaca::notify::{BroadcastNotifier, TableMessage};
use carecaca::rules;
use carecaca::service::spawn_table;
use carecaca::storage::MemoryStore;

#[derive(Parser)]
#[command(name = "demo", about = "Run a scripted game against the engine")]
struct Args {
	/// Number of players to seat
	#[arg(long, default_value_t = 3)]
	players: usize,

	/// Shuffle seed, for reproducible games
	#[arg(long)]
	seed: Option<u64>,

	/// Safety cap on the number of turns
	#[arg(long, default_value_t = 500)]
	max_turns: usize,
}

#[tokio::main]
async fn main() {
	let args = Args::parse();

	println!("=== Carecaca Engine Demo ===\n");

	let store = Arc::new(MemoryStore::new());
	let notifier = Arc::new(BroadcastNotifier::new(256));
	let mut rx = notifier.subscribe();
	let handle = spawn_table("demo".to_string(), store, notifier);

	for i in 0..args.players {
		let username = format!("player{}", i + 1);
		handle.join(&username).await.expect("join failed");
	}

	let deck = match args.seed {
		Some(seed) => cards::shuffled_deck_with(&mut StdRng::seed_from_u64(seed)),
		None => cards::shuffled_deck(),
	};
	handle.deal_shuffled(deck).await.expect("deal failed");

	let mut turns = 0;
	loop {
		print_messages(&mut rx);

		if turns >= args.max_turns {
			println!("\nstopping after {} turns", turns);
			break;
		}

		let view = handle.view().await;
		let Some(username) = view.username_turn.clone() else {
			break;
		};
		let player = view.player(&username).expect("turn holder is seated").clone();
		turns += 1;

		if !player.hand.is_empty() {
			match choose_hand_play(&view.played_cards, &player.hand) {
				Some(play) => {
					handle
						.play_cards(play, &username, CardOrigin::Hand)
						.await
						.expect("chosen play is legal");
				}
				None => {
					handle.take_played_cards(&username).await.expect("pickup failed");
				}
			}
		} else {
			// hand exhausted: commit blind from the next unlocked pool
			let (origin, pool) = if !player.visible.is_empty() {
				(CardOrigin::Visible, &player.visible)
			} else {
				(CardOrigin::Hidden, &player.hidden)
			};
			let blind = vec![pool[0].clone()];
			handle
				.play_cards_or_take_played_cards(blind, &username, origin)
				.await
				.expect("blind play resolves either way");
		}
	}
	print_messages(&mut rx);

	let view = handle.view().await;
	println!("\n=== Summary ===");
	println!("turns taken: {}", turns);
	for (place, username) in view.finished_usernames.iter().enumerate() {
		println!("  {}. {}", place + 1, username);
	}
	if let [loser] = view.players.as_slice() {
		println!("  loser: {}", loser.username);
	}
}

/// Lowest playable rank first, stacking as many copies as the pile allows.
fn choose_hand_play(pile: &[Card], hand: &[Card]) -> Option<Vec<Card>> {
	let mut ranks: Vec<Rank> = hand.iter().map(|c| c.rank).collect();
	ranks.sort();
	ranks.dedup();

	for rank in ranks {
		let copies: Vec<Card> = hand.iter().filter(|c| c.rank == rank).cloned().collect();
		for take in (1..=copies.len().min(4)).rev() {
			let play = copies[..take].to_vec();
			if rules::validate_play(pile, &play).is_ok() {
				return Some(play);
			}
		}
	}
	None
}

fn print_messages(rx: &mut broadcast::Receiver<TableMessage>) {
	loop {
		match rx.try_recv() {
			Ok(msg) => println!("[{}] {}", msg.table_id, msg.message),
			Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
			Err(_) => break,
		}
	}
}
