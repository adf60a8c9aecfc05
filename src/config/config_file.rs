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
use crate::series::aggregate::{Granularity, YearFilter};
use crate::series::grade::Grade;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub source: Option<SourceConfig>,
	pub defaults: Option<Defaults>,
}

/// Where to read the price history from when not given on the command line.
/// At most one of the two may be set.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
	pub path: Option<String>,
	pub url: Option<String>,
}

/// Selection used when the command line leaves it unspecified.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
	pub grade: Option<Grade>,
	pub mode: Option<Granularity>,
	pub year: Option<YearFilter>,

	/// Width in characters of the longest chart bar
	pub width: Option<usize>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_full_config() {
		let config: Config = toml::from_str(
			r#"
			[source]
			url = "https://example.org/precio-aceite-historico.json"

			[defaults]
			grade = "virgin"
			mode = "monthly"
			year = "2024"
			width = 60
			"#,
		)
		.unwrap();

		let source = config.source.unwrap();
		assert!(source.path.is_none());
		assert_eq!(
			source.url.as_deref(),
			Some("https://example.org/precio-aceite-historico.json")
		);

		let defaults = config.defaults.unwrap();
		assert_eq!(defaults.grade, Some(Grade::Virgin));
		assert_eq!(defaults.mode, Some(Granularity::Monthly));
		assert_eq!(defaults.year, Some(YearFilter::Year(2024)));
		assert_eq!(defaults.width, Some(60));
	}

	#[test]
	fn test_empty_config() {
		let config: Config = toml::from_str("").unwrap();
		assert!(config.source.is_none());
		assert!(config.defaults.is_none());
	}

	#[test]
	fn test_bad_values_rejected() {
		assert!(toml::from_str::<Config>("[defaults]\nyear = \"24\"").is_err());
		assert!(toml::from_str::<Config>("[defaults]\nmode = \"weekly\"").is_err());
		assert!(toml::from_str::<Config>("[imports]\nmercury = 1").is_err());
	}
}
