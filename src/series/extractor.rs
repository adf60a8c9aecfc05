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
use crate::series::price_point::PricePoint;
use crate::source::document::PriceDocument;
use std::collections::BTreeSet;

/// One grade's cleaned price history, ascending by date. Points sharing a
/// date keep the order they had in the document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
	points: Vec<PricePoint>,
}

impl Series {
	pub fn from_points(mut points: Vec<PricePoint>) -> Self {
		// stable, so equal dates keep their relative order
		points.sort_by_key(|p| p.date);
		Self { points }
	}

	pub fn points(&self) -> &[PricePoint] {
		&self.points
	}

	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	pub fn len(&self) -> usize {
		self.points.len()
	}

	/// Distinct calendar years with at least one point, ascending.
	pub fn years(&self) -> Vec<u32> {
		self.points
			.iter()
			.map(|p| p.date.year())
			.collect::<BTreeSet<u32>>()
			.into_iter()
			.collect()
	}
}

/// Pulls the given grade's points out of the document, dropping every
/// record that fails validation. A grade absent from the document yields an
/// empty series; callers report that as having no data.
pub fn extract(document: &PriceDocument, grade: Grade) -> Series {
	let Some(raw_points) = document.points(grade.label()) else {
		return Series::default();
	};

	let mut points = Vec::with_capacity(raw_points.len());
	for (index, raw) in raw_points.iter().enumerate() {
		match PricePoint::validate(raw) {
			Ok(point) => points.push(point),
			Err(defect) => {
				tracing::debug!(grade = %grade, index, %defect, "dropping record")
			},
		}
	}

	Series::from_points(points)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::source::document::RawPricePoint;
	use crate::util::decimal::Decimal;
	use serde_json::{json, Value};
	use std::collections::BTreeMap;

	fn document(grade: Grade, records: Vec<(&str, Value)>) -> PriceDocument {
		let raw = records
			.into_iter()
			.map(|(date, price)| RawPricePoint::new(json!(date), price))
			.collect();
		PriceDocument::from_series(BTreeMap::from([(
			grade.label().to_string(),
			raw,
		)]))
	}

	fn rendered(series: &Series) -> Vec<(String, String)> {
		series
			.points()
			.iter()
			.map(|p| (p.date.to_string(), p.price.to_string()))
			.collect()
	}

	#[test]
	fn test_drops_defective_points() {
		let doc = document(
			Grade::VirginExtra,
			vec![
				("2023-01-01", json!("0")),
				("2023-01-02", json!("25.4")),
				("not-a-date", json!(4.1)),
				("2023-01-03", json!("abc")),
				("2023-01-04", json!(4.2)),
			],
		);

		let series = extract(&doc, Grade::VirginExtra);
		assert_eq!(
			rendered(&series),
			vec![("2023-01-04".to_string(), "4.2".to_string())]
		);
	}

	#[test]
	fn test_sorts_ascending() {
		let doc = document(
			Grade::Virgin,
			vec![
				("2024-03-01", json!(3.0)),
				("2023-01-01", json!(1.0)),
				("2023-06-01", json!(2.0)),
			],
		);

		let series = extract(&doc, Grade::Virgin);
		let dates: Vec<String> =
			series.points().iter().map(|p| p.date.to_string()).collect();
		assert_eq!(dates, vec!["2023-01-01", "2023-06-01", "2024-03-01"]);
	}

	#[test]
	fn test_stable_for_duplicate_dates() {
		let doc = document(
			Grade::Lampante,
			vec![
				("2023-05-02", json!("2.5")),
				("2023-05-01", json!("2.1")),
				("2023-05-02", json!("2.2")),
				("2023-05-02", json!("2.9")),
			],
		);

		let series = extract(&doc, Grade::Lampante);
		let prices: Vec<String> =
			series.points().iter().map(|p| p.price.to_string()).collect();
		assert_eq!(prices, vec!["2.1", "2.5", "2.2", "2.9"]);
	}

	#[test]
	fn test_missing_grade_is_empty() {
		let doc = document(Grade::Virgin, vec![("2023-01-01", json!(3))]);
		let series = extract(&doc, Grade::Lampante);
		assert!(series.is_empty());
		assert_eq!(series.len(), 0);
	}

	#[test]
	fn test_years() {
		let doc = document(
			Grade::VirginExtra,
			vec![
				("2024-03-01", json!(3)),
				("2022-01-01", json!(1)),
				("2024-06-01", json!(2)),
				("2023-01-01", json!(99)),
			],
		);

		// 2023 only holds an out of range price
		assert_eq!(extract(&doc, Grade::VirginExtra).years(), vec![2022, 2024]);
	}

	mod determinism {
		use super::*;
		use rand::seq::SliceRandom;
		use rand::Rng;

		#[test]
		fn test_extraction_independent_of_input_order() {
			let mut rng = rand::thread_rng();

			let mut records: Vec<(String, Value)> = (0..300)
				.map(|i| {
					let date = format!(
						"{}-{:02}-{:02}",
						rng.gen_range(2015..2025),
						rng.gen_range(1..13),
						rng.gen_range(1..29)
					);
					// unique prices so any reordering of ties would show
					(date, json!(format!("{}.{:03}", 1 + i / 100, i % 100)))
				})
				.collect();

			let build = |records: &Vec<(String, Value)>| {
				let raw = records
					.iter()
					.map(|(d, p)| RawPricePoint::new(json!(d), p.clone()))
					.collect();
				PriceDocument::from_series(BTreeMap::from([(
					Grade::Virgin.label().to_string(),
					raw,
				)]))
			};

			let expected = extract(&build(&records), Grade::Virgin);
			for window in expected.points().windows(2) {
				assert!(window[0].date <= window[1].date);
			}

			for _ in 0..20 {
				records.shuffle(&mut rng);
				let shuffled = extract(&build(&records), Grade::Virgin);

				let dates = |s: &Series| {
					s.points().iter().map(|p| p.date).collect::<Vec<_>>()
				};
				assert_eq!(dates(&expected), dates(&shuffled));

				let mut a: Vec<Decimal> =
					expected.points().iter().map(|p| p.price).collect();
				let mut b: Vec<Decimal> =
					shuffled.points().iter().map(|p| p.price).collect();
				a.sort();
				b.sort();
				assert_eq!(a, b);
			}
		}
	}
}
