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
use crate::series::grade::Grade;
use anyhow::{anyhow, bail, Error};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DATE_FIELD: &str = "fecha";
pub const PRICE_FIELD: &str = "precio_eur_kg";

/// The price history as published: a JSON object mapping each grade label
/// to an array of dated price records. Records are untrusted and are kept
/// untyped here; validation happens per point during extraction so that one
/// bad record never sinks a whole series.
#[derive(Debug, Default)]
pub struct PriceDocument {
	series: BTreeMap<String, Vec<RawPricePoint>>,
}

/// A single record as found in the document. Either field is Value::Null
/// when absent.
#[derive(Clone, Debug, PartialEq)]
pub struct RawPricePoint {
	pub date: Value,
	pub price: Value,
}

impl RawPricePoint {
	pub fn new(date: Value, price: Value) -> Self {
		Self { date, price }
	}

	/// Pulls the known fields out of a record. Anything that is not an
	/// object is treated as a record with nothing in it.
	fn from_value(value: &Value) -> Self {
		let field = |name: &str| value.get(name).cloned().unwrap_or(Value::Null);
		Self {
			date: field(DATE_FIELD),
			price: field(PRICE_FIELD),
		}
	}
}

impl PriceDocument {
	/// Parses and validates a document. Fails if the text is not JSON, if
	/// the root is not an object, or if any grade's series is missing or
	/// not an array. Keys for grades we do not know are kept if they hold
	/// arrays and ignored otherwise.
	pub fn from_json(text: &str) -> Result<Self, Error> {
		let root: Value = serde_json::from_str(text)
			.map_err(|e| anyhow!("malformed JSON: {}", e))?;
		PriceDocument::from_value(root)
	}

	pub fn from_value(root: Value) -> Result<Self, Error> {
		let Value::Object(map) = root else {
			bail!("document root must be an object");
		};

		for grade in Grade::ALL {
			match map.get(grade.label()) {
				None => bail!("missing series for \"{}\"", grade.label()),
				Some(Value::Array(_)) => {},
				Some(_) => {
					bail!("series for \"{}\" is not an array", grade.label())
				},
			}
		}

		let series = map
			.iter()
			.filter_map(|(label, value)| match value {
				Value::Array(records) => Some((
					label.to_owned(),
					records.iter().map(RawPricePoint::from_value).collect(),
				)),
				_ => None,
			})
			.collect();

		Ok(Self { series })
	}

	/// Builds a document directly from raw records, without the checks
	/// applied to published documents.
	pub fn from_series(series: BTreeMap<String, Vec<RawPricePoint>>) -> Self {
		Self { series }
	}

	/// The raw records published under the given label, if any.
	pub fn points(&self, label: &str) -> Option<&[RawPricePoint]> {
		self.series.get(label).map(|points| points.as_slice())
	}
}
