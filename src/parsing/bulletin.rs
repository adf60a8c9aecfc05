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
use crate::source::document::{DATE_FIELD, PRICE_FIELD};
use crate::util::date::Date;
use crate::util::decimal::Decimal;
use anyhow::Error;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Lines containing any of these (case-insensitively) are page furniture
/// from the bulletin and never carry a price.
const NOISE: [&str; 5] = [
	"tipo de aceite",
	"variedad",
	"precio €/kg",
	"sin cierre de operaciones",
	"about:blank",
];

/// Bulletin prices outside (0, MAX_BULLETIN_PRICE) are extraction garbage.
const MAX_BULLETIN_PRICE: i128 = 50;

/// Prices are stored at this many decimal places.
const STORED_PRECISION: u32 = 3;

/// Parses the raw text of daily market bulletins into the price history
/// document. A bulletin is a date line ("DD-MM-YYYY") followed by one line
/// per grade with a "3,950 €" style price.
pub struct BulletinParser {
	date_regex: Regex,
	price_regex: Regex,
}

/// The converted history, with every grade present and each grade's
/// records sorted by date with one record per date.
#[derive(Debug, Default)]
pub struct ConvertedHistory {
	/// Prices per date, indexed by grade in Grade::ALL order
	series: BTreeMap<Date, [Option<Decimal>; 3]>,
}

impl BulletinParser {
	pub fn new() -> Result<Self, Error> {
		Ok(Self {
			date_regex: Regex::new(r"\b(\d{2})-(\d{2})-(\d{4})\b")?,
			price_regex: Regex::new(r"(\d+[.,]\d+)\s*€")?,
		})
	}

	pub fn parse(&self, text: &str) -> ConvertedHistory {
		let mut history = ConvertedHistory::default();
		let mut current_date: Option<Date> = None;

		for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
			let lower = line.to_lowercase();
			if NOISE.iter().any(|n| lower.contains(n)) {
				continue;
			}

			if let Some(date) = self.date_regex.captures(line) {
				// an impossible date invalidates everything until the next one
				current_date = Date::new(
					date[3].parse().unwrap_or(0),
					date[2].parse().unwrap_or(0),
					date[1].parse().unwrap_or(0),
				)
				.ok();
				if current_date.is_none() {
					tracing::warn!(line, "ignoring bulletin with invalid date");
				}
				continue;
			}

			let Some(date) = current_date else {
				continue;
			};
			let Some(grade) = Grade::from_bulletin_line(line) else {
				continue;
			};
			let Some(price) = self.price(line) else {
				tracing::debug!(line, "no usable price on grade line");
				continue;
			};

			history.insert(date, grade, price);
		}

		history
	}

	fn price(&self, line: &str) -> Option<Decimal> {
		let captures = self.price_regex.captures(line)?;
		let price = Decimal::from_str(&captures[1].replace(',', ".")).ok()?;

		if price <= Decimal::zero()
			|| price >= Decimal::from_i128(MAX_BULLETIN_PRICE)
		{
			return None;
		}

		Some(price.rounded(STORED_PRECISION))
	}
}

impl ConvertedHistory {
	/// Records a price; a later price for the same grade and date replaces
	/// the earlier one.
	fn insert(&mut self, date: Date, grade: Grade, price: Decimal) {
		self.series.entry(date).or_default()[grade as usize] = Some(price);
	}

	/// The (date, price) records for one grade, ascending by date.
	pub fn records(&self, grade: Grade) -> Vec<(Date, Decimal)> {
		self.series
			.iter()
			.filter_map(|(date, prices)| prices[grade as usize].map(|p| (*date, p)))
			.collect()
	}

	pub fn to_json(&self) -> Result<String, Error> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

struct Record {
	date: Date,
	price: Decimal,
}

impl Serialize for Record {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(2))?;
		map.serialize_entry(DATE_FIELD, &self.date.to_string())?;
		map.serialize_entry(PRICE_FIELD, &self.price)?;
		map.end()
	}
}

/// Grades are written in publication order rather than alphabetically.
impl Serialize for ConvertedHistory {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(Grade::ALL.len()))?;
		for grade in Grade::ALL {
			let records: Vec<Record> = self
				.records(grade)
				.into_iter()
				.map(|(date, price)| Record { date, price })
				.collect();
			map.serialize_entry(grade.label(), &records)?;
		}
		map.end()
	}
}
