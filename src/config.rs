use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn config_paths(filename: &str) -> Vec<PathBuf> {
	let mut paths = Vec::new();

	if let Some(home) = std::env::var_os("HOME") {
		let user_config = PathBuf::from(home).join(".config/carecaca").join(filename);
		paths.push(user_config);
	}

	paths.push(PathBuf::from("config").join(filename));

	paths
}

fn find_config(filename: &str) -> Option<PathBuf> {
	config_paths(filename).into_iter().find(|p| p.exists())
}

pub fn resolve_config(filename: &str) -> Result<PathBuf, String> {
	find_config(filename).ok_or_else(|| {
		let searched: Vec<_> = config_paths(filename)
			.iter()
			.map(|p| p.display().to_string())
			.collect();
		format!("Config file '{}' not found. Searched: {}", filename, searched.join(", "))
	})
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
	#[serde(default)]
	pub storage: StorageConfig,
	#[serde(default)]
	pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
	#[serde(default = "default_data_dir")]
	pub data_dir: PathBuf,
}

impl Default for StorageConfig {
	fn default() -> Self {
		Self { data_dir: default_data_dir() }
	}
}

fn default_data_dir() -> PathBuf {
	dirs::data_dir()
		.map(|dir| dir.join("carecaca").join("tables"))
		.unwrap_or_else(|| PathBuf::from("tmp"))
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
	#[serde(default = "default_channel_capacity")]
	pub channel_capacity: usize,
}

impl Default for NotifyConfig {
	fn default() -> Self {
		Self { channel_capacity: default_channel_capacity() }
	}
}

fn default_channel_capacity() -> usize {
	64
}

pub fn load_server<P: AsRef<Path>>(path: P) -> Result<ServerConfig, String> {
	let content = fs::read_to_string(&path)
		.map_err(|e| format!("Failed to read {}: {}", path.as_ref().display(), e))?;

	toml::from_str(&content)
		.map_err(|e| format!("Failed to parse server config: {}", e))
}

/// Load `server.toml` from the usual places; a missing file is not an error,
/// it just means defaults.
pub fn load_server_auto() -> Result<ServerConfig, String> {
	match find_config("server.toml") {
		Some(path) => load_server(path),
		None => Ok(ServerConfig::default()),
	}
}
