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
use crate::series::aggregate::{aggregate, AggregatedSeries, Granularity, YearFilter};
use crate::series::extractor::extract;
use crate::series::grade::Grade;
use crate::source::document::PriceDocument;
use anyhow::Error;

pub const NO_DATA_MESSAGE: &str = "No historical data to display.";

/// Unit shown on the value axis of every report.
pub const VALUE_UNIT: &str = "€/kg";

/// Anything that can display an aggregated series.
pub trait SeriesRenderer {
	fn draw(&mut self, series: &AggregatedSeries, title: &str)
		-> Result<(), Error>;

	/// Shown instead of a drawing when the selection holds no data.
	fn no_data(&mut self, title: &str, message: &str) -> Result<(), Error>;
}

/// The user's current selection. Owned by whoever drives rendering and
/// passed in whole; nothing in the pipeline keeps its own copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewState {
	pub grade: Grade,
	pub granularity: Granularity,
	pub year: YearFilter,
}

/// Runs the whole pipeline for one selection and hands the result to the
/// renderer. Returns the series that was drawn, which may be empty.
pub fn render(
	document: &PriceDocument,
	view: &ViewState,
	renderer: &mut dyn SeriesRenderer,
) -> Result<AggregatedSeries, Error> {
	let series = extract(document, view.grade);
	let aggregated = aggregate(&series, view.granularity, view.year);
	let title = view.grade.label();

	if aggregated.is_empty() {
		renderer.no_data(title, NO_DATA_MESSAGE)?;
	} else {
		renderer.draw(&aggregated, title)?;
	}

	Ok(aggregated)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[derive(Default)]
	struct Recorder {
		drawn: Vec<(String, Vec<String>)>,
		messages: Vec<String>,
	}

	impl SeriesRenderer for Recorder {
		fn draw(
			&mut self,
			series: &AggregatedSeries,
			title: &str,
		) -> Result<(), Error> {
			self.drawn.push((title.to_string(), series.labels.clone()));
			Ok(())
		}

		fn no_data(&mut self, _title: &str, message: &str) -> Result<(), Error> {
			self.messages.push(message.to_string());
			Ok(())
		}
	}

	fn document() -> PriceDocument {
		PriceDocument::from_value(json!({
			"Aceite de oliva virgen extra": [
				{ "fecha": "2023-01-01", "precio_eur_kg": 4.0 },
				{ "fecha": "2024-01-01", "precio_eur_kg": "5.0" }
			],
			"Aceite de oliva virgen": [],
			"Aceite de oliva lampante": [
				{ "fecha": "2023-01-01", "precio_eur_kg": 99 }
			]
		}))
		.unwrap()
	}

	#[test]
	fn test_draws_selection() {
		let mut recorder = Recorder::default();
		let view = ViewState {
			grade: Grade::VirginExtra,
			granularity: Granularity::Yearly,
			year: YearFilter::All,
		};

		let drawn = render(&document(), &view, &mut recorder).unwrap();
		assert_eq!(drawn.labels, vec!["2023", "2024"]);
		assert_eq!(
			recorder.drawn,
			vec![(
				"Aceite de oliva virgen extra".to_string(),
				vec!["2023".to_string(), "2024".to_string()]
			)]
		);
		assert!(recorder.messages.is_empty());
	}

	#[test]
	fn test_no_data_is_not_drawn() {
		let doc = document();
		let mut recorder = Recorder::default();

		for view in [
			ViewState {
				grade: Grade::Virgin,
				granularity: Granularity::Monthly,
				year: YearFilter::All,
			},
			// only record is out of range
			ViewState {
				grade: Grade::Lampante,
				granularity: Granularity::Yearly,
				year: YearFilter::All,
			},
			ViewState {
				grade: Grade::VirginExtra,
				granularity: Granularity::Daily,
				year: YearFilter::Year(2010),
			},
		] {
			let drawn = render(&doc, &view, &mut recorder).unwrap();
			assert!(drawn.is_empty());
		}

		assert!(recorder.drawn.is_empty());
		assert_eq!(recorder.messages, vec![NO_DATA_MESSAGE; 3]);
	}
}
