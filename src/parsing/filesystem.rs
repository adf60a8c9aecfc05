/* Copyright © 2024-2025 Adam Train <adam@adamtrain.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::config::config_file::Config;
use anyhow::{anyhow, bail, Error};
use dirs::home_dir;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Filesystem {
	/// Overrides the home directory lookup; only used by tests.
	home: Option<PathBuf>,
}

impl Filesystem {
	pub fn new() -> Self {
		Self { home: None }
	}

	pub fn read_to_string(&self, file_path: &str) -> Result<String, Error> {
		let path = Path::new(file_path);
		fs::read_to_string(path)
			.map_err(|e| anyhow!("failed to read {}: {}", file_path, e))
	}

	pub fn write(&self, file_path: &str, contents: &str) -> Result<(), Error> {
		fs::write(file_path, contents)
			.map_err(|e| anyhow!("failed to write {}: {}", file_path, e))
	}

	/// Fetches the config from the given path, or default path if none.
	/// A custom path must exist; a missing default config is the same as an
	/// empty one.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
	) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => {
				let Some(home) = self.home.clone().or_else(home_dir) else {
					// nowhere to look, so nothing configured
					return Ok(Config::default());
				};
				home.join(".config/olea/config.toml")
			},
			Some(p) => PathBuf::from(p),
		};

		if !config_path.exists() && custom_config_path.is_none() {
			return Ok(Config::default());
		}

		let content = fs::read_to_string(&config_path).map_err(|e| {
			anyhow!("failed to read config {}: {}", config_path.display(), e)
		})?;
		let config: Config = toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))?;

		if let Some(source) = &config.source {
			if source.path.is_some() && source.url.is_some() {
				bail!("Only one of source.path and source.url may be specified")
			}
		}

		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scratch_dir(name: &str) -> PathBuf {
		let dir = std::env::temp_dir().join(name);
		let _ = fs::remove_dir_all(&dir);
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	#[test]
	fn test_missing_default_config_is_empty() {
		let fs = Filesystem {
			home: Some(scratch_dir("olea_fs_test_empty_home")),
		};
		let config = fs.get_config(None).unwrap();
		assert!(config.source.is_none());
		assert!(config.defaults.is_none());
	}

	#[test]
	fn test_default_config_location() {
		let home = scratch_dir("olea_fs_test_home");
		fs::create_dir_all(home.join(".config/olea")).unwrap();
		fs::write(
			home.join(".config/olea/config.toml"),
			"[source]\npath = \"history.json\"\n",
		)
		.unwrap();

		let fs = Filesystem { home: Some(home) };
		let config = fs.get_config(None).unwrap();
		assert_eq!(
			config.source.unwrap().path.as_deref(),
			Some("history.json")
		);
	}

	#[test]
	fn test_missing_custom_config_fails() {
		let fs = Filesystem::new();
		let path = "/nonexistent/olea/config.toml".to_string();
		assert!(fs.get_config(Some(&path)).is_err());
	}

	#[test]
	fn test_conflicting_sources_fail() {
		let dir = scratch_dir("olea_fs_test_conflict");
		let path = dir.join("config.toml");
		fs::write(
			&path,
			"[source]\npath = \"a.json\"\nurl = \"https://example.org/a.json\"\n",
		)
		.unwrap();

		let fs = Filesystem::new();
		let err = fs
			.get_config(Some(&path.to_string_lossy().to_string()))
			.unwrap_err();
		assert!(err.to_string().contains("Only one of"));
	}

	#[test]
	fn test_read_and_write() {
		let dir = scratch_dir("olea_fs_test_rw");
		let path = dir.join("out.json").to_string_lossy().to_string();

		let fs = Filesystem::new();
		fs.write(&path, "{}").unwrap();
		assert_eq!(fs.read_to_string(&path).unwrap(), "{}");
		assert!(fs.read_to_string("/nonexistent/olea/in.json").is_err());
	}
}
