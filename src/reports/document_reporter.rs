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
use crate::reports::table::Table;
use crate::series::extractor::extract;
use crate::series::grade::Grade;
use crate::series::price_point::PricePoint;
use crate::source::document::PriceDocument;
use anyhow::Error;
use clap::ValueEnum;
use std::io::Write;

/// Reports about the loaded document itself rather than any one selection.
pub struct DocumentReporter<'a> {
	document: &'a PriceDocument,
}

impl<'a> DocumentReporter<'a> {
	pub fn new(document: &'a PriceDocument) -> Self {
		Self { document }
	}

	/// Lists the years that have data for the grade, one per line.
	pub fn print_years(
		&self,
		out: &mut dyn Write,
		grade: Grade,
	) -> Result<(), Error> {
		for year in extract(self.document, grade).years() {
			writeln!(out, "{}", year)?;
		}
		Ok(())
	}

	/// One row per grade with the span of usable data.
	pub fn print_grades(&self, out: &mut dyn Write) -> Result<(), Error> {
		let mut table = Table::new(5);
		table.add_header(vec!["Grade", "Label", "Points", "First", "Last"]);
		table.add_separator();

		for grade in Grade::ALL {
			let series = extract(self.document, grade);
			let points = series.points();
			let date_or_dash = |p: Option<&PricePoint>| {
				p.map_or("-".to_string(), |p| p.date.to_string())
			};

			table.add_row(vec![
				grade
					.to_possible_value()
					.map_or(String::new(), |v| v.get_name().to_string()),
				grade.label().to_string(),
				points.len().to_string(),
				date_or_dash(points.first()),
				date_or_dash(points.last()),
			]);
		}
		table.right_align(vec![2]);

		write!(out, "{}", table.render())?;
		Ok(())
	}

	/// Lists every record the extractor would drop, and why. Records are
	/// identified by their position in the document.
	pub fn print_check(&self, out: &mut dyn Write) -> Result<(), Error> {
		let mut summaries = vec![];

		for grade in Grade::ALL {
			let raw_points = self.document.points(grade.label()).unwrap_or(&[]);

			let mut dropped = 0;
			for (index, raw) in raw_points.iter().enumerate() {
				if let Err(defect) = PricePoint::validate(raw) {
					writeln!(out, "[{} #{}] {}", grade.label(), index, defect)?;
					dropped += 1;
				}
			}

			summaries.push(format!(
				"{}: {} kept, {} dropped",
				grade.label(),
				raw_points.len() - dropped,
				dropped
			));
		}

		for summary in summaries {
			writeln!(out, "{}", summary)?;
		}
		Ok(())
	}
}
