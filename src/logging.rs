use std::fs::{self, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

use chrono::Local;

struct LogState {
	file: Option<std::fs::File>,
	current_date: String,
}

static LOG_STATE: Mutex<LogState> = Mutex::new(LogState {
	file: None,
	current_date: String::new(),
});

fn today() -> String {
	Local::now().format("%Y-%m-%d").to_string()
}

fn timestamp() -> String {
	Local::now().format("%H:%M:%S%.3f").to_string()
}

fn ensure_log_file(state: &mut LogState) {
	let date = today();
	if state.current_date != date || state.file.is_none() {
		let _ = fs::create_dir_all("logs");
		let path = format!("logs/carecaca-{}.log", date);
		if let Ok(file) = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&path)
		{
			state.file = Some(file);
			state.current_date = date;
		}
	}
}

pub fn log(module: &str, log_type: &str, message: &str) {
	if let Ok(mut state) = LOG_STATE.lock() {
		ensure_log_file(&mut state);

		let line = format!("[{}][{}:{}] {}\n", timestamp(), module, log_type, message);

		if let Some(ref mut file) = state.file {
			let _ = file.write_all(line.as_bytes());
			let _ = file.flush();
		}
	}
}

pub mod table {
	use super::log;

	pub fn joined(table_id: &str, username: &str) {
		log("Table", "JOIN", &format!("{}: {}", table_id, username));
	}

	pub fn dealt(table_id: &str, num_players: usize) {
		log("Table", "DEAL", &format!("{}: {} players", table_id, num_players));
	}

	pub fn played(table_id: &str, username: &str, cards: &str) {
		log("Table", "PLAY", &format!("{}: {} played {}", table_id, username, cards));
	}

	pub fn rejected(table_id: &str, username: &str, reason: &str) {
		log("Table", "REJECT", &format!("{}: {}: {}", table_id, username, reason));
	}

	pub fn burned(table_id: &str) {
		log("Table", "BURN", table_id);
	}

	pub fn took_pile(table_id: &str, username: &str, count: usize) {
		log("Table", "PICKUP", &format!("{}: {} took {} cards", table_id, username, count));
	}

	pub fn finished(table_id: &str, username: &str, place: usize) {
		log("Table", "FINISH", &format!("{}: {} finished {}", table_id, username, ordinal(place)));
	}

	pub fn game_over(table_id: &str) {
		log("Table", "GAME", &format!("{}: over", table_id));
	}

	fn ordinal(n: usize) -> String {
		match n {
			1 => "1st".to_string(),
			2 => "2nd".to_string(),
			3 => "3rd".to_string(),
			_ => format!("{}th", n),
		}
	}

	#[cfg(test)]
	mod tests {
		use super::ordinal;

		#[test]
		fn test_ordinal() {
			assert_eq!(ordinal(1), "1st");
			assert_eq!(ordinal(2), "2nd");
			assert_eq!(ordinal(3), "3rd");
			assert_eq!(ordinal(4), "4th");
			assert_eq!(ordinal(11), "11th");
		}
	}
}

pub mod store {
	use super::log;

	pub fn snapshot_error(table_id: &str, error: &str) {
		log("Store", "ERROR", &format!("{}: {}", table_id, error));
	}

	pub fn loaded(table_id: &str, found: bool) {
		let state = if found { "latest snapshot" } else { "fresh table" };
		log("Store", "LOAD", &format!("{}: {}", table_id, state));
	}
}
