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
use crate::reports::renderer::SeriesRenderer;
use crate::series::aggregate::AggregatedSeries;
use crate::util::decimal::Decimal;
use anyhow::Error;
use serde::Serialize;
use std::io::Write;

/// Emits the series as JSON for charting front ends.
pub struct JsonRenderer<W: Write> {
	out: W,
}

#[derive(Serialize)]
struct Payload<'a> {
	title: &'a str,

	#[serde(skip_serializing_if = "Option::is_none")]
	axis_title: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	labels: Option<&'a [String]>,
	#[serde(skip_serializing_if = "Option::is_none")]
	values: Option<&'a [Decimal]>,
	#[serde(skip_serializing_if = "Option::is_none")]
	message: Option<&'a str>,
}

impl<W: Write> JsonRenderer<W> {
	pub fn new(out: W) -> Self {
		Self { out }
	}

	fn emit(&mut self, payload: &Payload) -> Result<(), Error> {
		serde_json::to_writer_pretty(&mut self.out, payload)?;
		writeln!(self.out)?;
		Ok(())
	}
}

impl<W: Write> SeriesRenderer for JsonRenderer<W> {
	fn draw(
		&mut self,
		series: &AggregatedSeries,
		title: &str,
	) -> Result<(), Error> {
		self.emit(&Payload {
			title,
			axis_title: Some(series.axis_title.as_str()),
			labels: Some(series.labels.as_slice()),
			values: Some(series.values.as_slice()),
			message: None,
		})
	}

	fn no_data(&mut self, title: &str, message: &str) -> Result<(), Error> {
		self.emit(&Payload {
			title,
			axis_title: None,
			labels: None,
			values: None,
			message: Some(message),
		})
	}
}
