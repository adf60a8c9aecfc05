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
use crate::reports::renderer::{SeriesRenderer, VALUE_UNIT};
use crate::series::aggregate::AggregatedSeries;
use anyhow::Error;
use std::io::Write;

const BAR: char = '#';

pub const DEFAULT_WIDTH: usize = 40;
pub const MAX_WIDTH: usize = 200;

/// Draws a series as horizontal bars, one per label, scaled so that the
/// highest value spans the full width.
pub struct ChartRenderer<W: Write> {
	out: W,
	width: usize,
}

impl<W: Write> ChartRenderer<W> {
	pub fn new(out: W, width: usize) -> Self {
		Self { out, width }
	}

	/// Bar length for a value. Any positive value gets at least one mark so
	/// that it is distinguishable from a missing bucket.
	fn bar_length(&self, value: f64, max: f64) -> usize {
		if max <= 0.0 || value <= 0.0 {
			return 0;
		}
		((value / max * self.width as f64).round() as usize).max(1)
	}
}

impl<W: Write> SeriesRenderer for ChartRenderer<W> {
	fn draw(
		&mut self,
		series: &AggregatedSeries,
		title: &str,
	) -> Result<(), Error> {
		writeln!(self.out, "{} ({} by {})", title, VALUE_UNIT, series.axis_title)?;
		writeln!(self.out)?;

		let label_width =
			series.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
		let max = series
			.values
			.iter()
			.map(|v| v.to_f64())
			.fold(0.0, f64::max);

		for (label, value) in series.iter() {
			let bar = BAR
				.to_string()
				.repeat(self.bar_length(value.to_f64(), max));
			writeln!(
				self.out,
				"{:<width$} | {} {}",
				label,
				bar,
				value,
				width = label_width
			)?;
		}

		Ok(())
	}

	fn no_data(&mut self, title: &str, message: &str) -> Result<(), Error> {
		writeln!(self.out, "{}", title)?;
		writeln!(self.out)?;
		writeln!(self.out, "{}", message)?;
		Ok(())
	}
}
