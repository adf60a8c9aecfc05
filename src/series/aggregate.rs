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
use crate::series::extractor::Series;
use crate::series::price_point::PricePoint;
use crate::util::decimal::Decimal;
use anyhow::{anyhow, Error};
use clap::ValueEnum;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Bucket averages are reported at this many decimal places.
const AVERAGE_PRECISION: u32 = 3;

/// The time resolution at which a series is plotted.
#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
	Yearly,
	Monthly,
	Daily,
}

impl Granularity {
	pub fn axis_title(&self) -> &'static str {
		match self {
			Granularity::Yearly => "Year",
			Granularity::Monthly => "Month",
			Granularity::Daily => "Day",
		}
	}
}

/// Which dates to consider: everything (subject to the default window for
/// fine granularities), or a single calendar year.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum YearFilter {
	#[default]
	All,
	Year(u32),
}

impl FromStr for YearFilter {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s == "all" {
			return Ok(YearFilter::All);
		}

		if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
			return Err(anyhow!("year must be \"all\" or YYYY, got \"{}\"", s));
		}

		Ok(YearFilter::Year(s.parse()?))
	}
}

impl fmt::Display for YearFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			YearFilter::All => write!(f, "all"),
			YearFilter::Year(y) => write!(f, "{}", y),
		}
	}
}

impl<'de> Deserialize<'de> for YearFilter {
	fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
		let s = String::deserialize(d)?;
		YearFilter::from_str(&s).map_err(D::Error::custom)
	}
}

/// A series ready to plot: one label per value, labels in chronological
/// order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregatedSeries {
	pub labels: Vec<String>,
	pub values: Vec<Decimal>,
	pub axis_title: String,
}

impl AggregatedSeries {
	fn empty(granularity: Granularity) -> Self {
		Self {
			labels: vec![],
			values: vec![],
			axis_title: granularity.axis_title().to_string(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.labels.is_empty()
	}

	pub fn len(&self) -> usize {
		self.labels.len()
	}

	/// Label and value pairs, in order.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
		self.labels.iter().zip(self.values.iter())
	}
}

/// Turns a cleaned series into plottable buckets for the given granularity.
///
/// A specific year restricts the data to that year. With no year chosen,
/// yearly views use everything while monthly and daily views fall back to
/// the trailing year ending at the last observation, since all of history
/// at those resolutions is too dense to read.
///
/// Never fails: a selection with no data produces an empty series.
pub fn aggregate(
	series: &Series,
	granularity: Granularity,
	year: YearFilter,
) -> AggregatedSeries {
	let windowed = window(series.points(), granularity, year);
	if windowed.is_empty() {
		return AggregatedSeries::empty(granularity);
	}

	let (labels, values): (Vec<String>, Vec<Decimal>) = match granularity {
		Granularity::Yearly => {
			bucket_means(&windowed, |p| p.date.year())
				.into_iter()
				.map(|(year, mean)| (year.to_string(), mean))
				.unzip()
		},
		Granularity::Monthly => {
			bucket_means(&windowed, |p| p.date.month_key())
				.into_iter()
				.unzip()
		},
		// the series is already sorted, and daily values are never averaged
		Granularity::Daily => windowed
			.iter()
			.map(|p| (p.date.to_string(), p.price))
			.unzip(),
	};

	AggregatedSeries {
		labels,
		values,
		axis_title: granularity.axis_title().to_string(),
	}
}

fn window(
	points: &[PricePoint],
	granularity: Granularity,
	year: YearFilter,
) -> Vec<PricePoint> {
	match (year, granularity) {
		(YearFilter::Year(y), _) => {
			points.iter().filter(|p| p.date.year() == y).copied().collect()
		},
		(YearFilter::All, Granularity::Yearly) => points.to_vec(),
		(YearFilter::All, _) => {
			let Some(last) = points.last() else {
				return vec![];
			};

			let from = last.date.minus_one_year();
			points.iter().filter(|p| p.date >= from).copied().collect()
		},
	}
}

/// Groups points by key and averages each group. Keys are ordered by their
/// own Ord, which for years and "YYYY-MM" strings is chronological.
fn bucket_means<K: Ord>(
	points: &[PricePoint],
	key: impl Fn(&PricePoint) -> K,
) -> BTreeMap<K, Decimal> {
	let mut buckets: BTreeMap<K, Vec<Decimal>> = BTreeMap::new();
	for point in points {
		buckets.entry(key(point)).or_default().push(point.price);
	}

	buckets
		.into_iter()
		.filter_map(|(k, prices)| {
			Decimal::mean(&prices).map(|m| (k, m.rounded(AVERAGE_PRECISION)))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::util::date::Date;

	fn series(points: &[(&str, &str)]) -> Series {
		Series::from_points(
			points
				.iter()
				.map(|(date, price)| PricePoint {
					date: Date::from_str(date).unwrap(),
					price: Decimal::from_str(price).unwrap(),
				})
				.collect(),
		)
	}

	fn values(agg: &AggregatedSeries) -> Vec<String> {
		agg.values.iter().map(|v| v.to_string()).collect()
	}

	#[test]
	fn test_yearly_all() {
		let s = series(&[
			("2023-01-01", "4.0"),
			("2023-06-01", "6.0"),
			("2024-01-01", "5.0"),
		]);

		let agg = aggregate(&s, Granularity::Yearly, YearFilter::All);
		assert_eq!(agg.labels, vec!["2023", "2024"]);
		assert_eq!(
			agg.values,
			vec![Decimal::from_i128(5), Decimal::from_i128(5)]
		);
		assert_eq!(values(&agg), vec!["5.000", "5.000"]);
		assert_eq!(agg.axis_title, "Year");
	}

	#[test]
	fn test_yearly_uses_full_history() {
		let s = series(&[
			("2015-03-01", "2.1"),
			("2019-03-01", "3.3"),
			("2024-03-01", "8.5"),
		]);

		let agg = aggregate(&s, Granularity::Yearly, YearFilter::All);
		assert_eq!(agg.labels, vec!["2015", "2019", "2024"]);
	}

	#[test]
	fn test_yearly_specific_year() {
		let s = series(&[("2023-01-01", "4.0"), ("2024-01-01", "5.0")]);
		let agg = aggregate(&s, Granularity::Yearly, YearFilter::Year(2024));
		assert_eq!(agg.labels, vec!["2024"]);
		assert_eq!(values(&agg), vec!["5.000"]);
	}

	#[test]
	fn test_means_round_to_three_places() {
		let s = series(&[
			("2023-01-02", "1"),
			("2023-01-03", "1"),
			("2023-01-04", "2"),
			("2023-02-01", "2.0005"),
		]);

		let agg = aggregate(&s, Granularity::Monthly, YearFilter::Year(2023));
		assert_eq!(agg.labels, vec!["2023-01", "2023-02"]);
		assert_eq!(values(&agg), vec!["1.333", "2.001"]);
	}

	#[test]
	fn test_monthly_specific_year() {
		let s = series(&[
			("2022-12-31", "9.0"),
			("2023-11-05", "4.0"),
			("2023-01-10", "3.0"),
			("2023-01-20", "3.5"),
			("2023-12-01", "4.4"),
			("2024-01-01", "9.0"),
		]);

		let agg = aggregate(&s, Granularity::Monthly, YearFilter::Year(2023));
		assert_eq!(agg.labels, vec!["2023-01", "2023-11", "2023-12"]);
		assert_eq!(values(&agg), vec!["3.250", "4.000", "4.400"]);
		assert_eq!(agg.axis_title, "Month");
	}

	#[test]
	fn test_monthly_all_uses_trailing_year() {
		let s = series(&[
			("2022-06-14", "1.0"),
			("2022-06-15", "2.0"),
			("2022-12-01", "3.0"),
			("2023-06-15", "4.0"),
		]);

		// window starts 2022-06-15 inclusive
		let agg = aggregate(&s, Granularity::Monthly, YearFilter::All);
		assert_eq!(agg.labels, vec!["2022-06", "2022-12", "2023-06"]);
		assert_eq!(values(&agg), vec!["2.000", "3.000", "4.000"]);
	}

	#[test]
	fn test_daily_all_uses_trailing_year() {
		let s = series(&[
			("2021-01-01", "2.0"),
			("2021-07-01", "2.5"),
			("2022-03-01", "3.0"),
			("2022-09-30", "3.1"),
			("2023-02-01", "3.2"),
			("2023-09-29", "3.33333"),
			("2023-09-30", "3.4"),
		]);

		let agg = aggregate(&s, Granularity::Daily, YearFilter::All);
		assert_eq!(
			agg.labels,
			vec!["2022-09-30", "2023-02-01", "2023-09-29", "2023-09-30"]
		);
		// raw, never rounded
		assert_eq!(values(&agg), vec!["3.1", "3.2", "3.33333", "3.4"]);
		assert_eq!(agg.axis_title, "Day");
	}

	#[test]
	fn test_daily_specific_year() {
		let s = series(&[
			("2022-12-31", "2.0"),
			("2023-01-01", "2.5"),
			("2023-12-31", "3.0"),
			("2024-01-01", "3.5"),
		]);

		let agg = aggregate(&s, Granularity::Daily, YearFilter::Year(2023));
		assert_eq!(agg.labels, vec!["2023-01-01", "2023-12-31"]);
		assert_eq!(values(&agg), vec!["2.5", "3.0"]);
	}

	#[test]
	fn test_daily_keeps_duplicate_dates() {
		let s = series(&[("2023-01-01", "2.5"), ("2023-01-01", "2.7")]);
		let agg = aggregate(&s, Granularity::Daily, YearFilter::All);
		assert_eq!(agg.labels, vec!["2023-01-01", "2023-01-01"]);
		assert_eq!(values(&agg), vec!["2.5", "2.7"]);
	}

	#[test]
	fn test_empty_series() {
		let s = Series::default();
		for granularity in
			[Granularity::Yearly, Granularity::Monthly, Granularity::Daily]
		{
			let agg = aggregate(&s, granularity, YearFilter::All);
			assert!(agg.is_empty());
			assert!(agg.values.is_empty());
			assert_eq!(agg.axis_title, granularity.axis_title());
		}
	}

	#[test]
	fn test_year_with_no_data() {
		let s = series(&[("2023-01-01", "4.0")]);
		let agg = aggregate(&s, Granularity::Monthly, YearFilter::Year(1999));
		assert!(agg.is_empty());
		assert_eq!(agg.axis_title, "Month");
	}

	#[test]
	fn test_no_gap_filling() {
		let s = series(&[("2023-01-01", "4.0"), ("2023-05-01", "5.0")]);
		let agg = aggregate(&s, Granularity::Monthly, YearFilter::Year(2023));
		assert_eq!(agg.len(), 2);
		assert_eq!(agg.labels, vec!["2023-01", "2023-05"]);
	}

	#[test]
	fn test_idempotent() {
		let s = series(&[
			("2023-01-01", "4.0"),
			("2023-06-01", "6.1"),
			("2024-01-01", "5.05"),
		]);

		for granularity in
			[Granularity::Yearly, Granularity::Monthly, Granularity::Daily]
		{
			let first = aggregate(&s, granularity, YearFilter::All);
			let second = aggregate(&s, granularity, YearFilter::All);
			assert_eq!(first, second);
		}
	}

	#[test]
	fn test_labels_strictly_increase_when_aggregated() {
		let s = series(&[
			("2023-10-01", "4.0"),
			("2023-09-01", "4.1"),
			("2024-02-01", "4.2"),
			("2023-09-15", "4.3"),
			("2024-01-01", "4.4"),
		]);

		for granularity in [Granularity::Yearly, Granularity::Monthly] {
			let agg = aggregate(&s, granularity, YearFilter::All);
			assert_eq!(agg.labels.len(), agg.values.len());
			for pair in agg.labels.windows(2) {
				assert!(pair[0] < pair[1], "{:?}", agg.labels);
			}
		}
	}

	#[test]
	fn test_year_filter_parse() {
		assert_eq!(YearFilter::from_str("all").unwrap(), YearFilter::All);
		assert_eq!(
			YearFilter::from_str("2023").unwrap(),
			YearFilter::Year(2023)
		);
		assert!(YearFilter::from_str("23").is_err());
		assert!(YearFilter::from_str("All").is_err());
		assert!(YearFilter::from_str("20x3").is_err());
		assert_eq!(YearFilter::Year(2023).to_string(), "2023");
	}
}
