/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
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
use crate::parsing::filesystem::Filesystem;
use crate::series::grade::Grade;
use crate::source::document::PriceDocument;
use crate::source::http::Client;
use anyhow::{anyhow, Error};
use std::fmt;

/// Where the price history document comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
	File(String),
	Url(String),
}

impl fmt::Display for Source {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Source::File(path) => write!(f, "{}", path),
			Source::Url(url) => write!(f, "{}", url),
		}
	}
}

/// Fetches and validates the document once. Any failure here means there
/// is nothing to aggregate, so it is reported as a single load error.
pub fn load(fs: &Filesystem, source: &Source) -> Result<PriceDocument, Error> {
	let text = match source {
		Source::File(path) => fs.read_to_string(path),
		Source::Url(url) => Client::new().get_text(url),
	};

	let document = text
		.and_then(|t| PriceDocument::from_json(&t))
		.map_err(|e| anyhow!("Could not load price history: {}", e))?;

	for grade in Grade::ALL {
		tracing::info!(
			source = %source,
			grade = %grade,
			records = document.points(grade.label()).map_or(0, |p| p.len()),
			"loaded series"
		);
	}

	Ok(document)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	#[test]
	fn test_load_file() {
		let path = std::env::temp_dir().join("olea_loader_test_ok.json");
		fs::write(
			&path,
			r#"{
				"Aceite de oliva virgen extra": [{ "fecha": "2024-01-02", "precio_eur_kg": 8.1 }],
				"Aceite de oliva virgen": [],
				"Aceite de oliva lampante": []
			}"#,
		)
		.unwrap();

		let source = Source::File(path.to_string_lossy().to_string());
		let doc = load(&Filesystem::new(), &source).unwrap();
		assert_eq!(doc.points(Grade::VirginExtra.label()).unwrap().len(), 1);

		fs::remove_file(path).unwrap();
	}

	#[test]
	fn test_load_failures_are_reported_uniformly() {
		let missing = Source::File("/nonexistent/olea/history.json".to_string());
		let err = load(&Filesystem::new(), &missing).unwrap_err();
		assert!(err.to_string().starts_with("Could not load price history"));

		let path = std::env::temp_dir().join("olea_loader_test_bad.json");
		fs::write(&path, r#"{ "Aceite de oliva virgen": [] }"#).unwrap();

		let source = Source::File(path.to_string_lossy().to_string());
		let err = load(&Filesystem::new(), &source).unwrap_err();
		assert!(err.to_string().starts_with("Could not load price history"));
		assert!(err.to_string().contains("missing series"));

		fs::remove_file(path).unwrap();
	}
}
