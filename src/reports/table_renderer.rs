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
use crate::reports::table::Table;
use crate::series::aggregate::AggregatedSeries;
use anyhow::Error;
use std::io::Write;

pub struct TableRenderer<W: Write> {
	out: W,
}

impl<W: Write> TableRenderer<W> {
	pub fn new(out: W) -> Self {
		Self { out }
	}
}

impl<W: Write> SeriesRenderer for TableRenderer<W> {
	fn draw(
		&mut self,
		series: &AggregatedSeries,
		title: &str,
	) -> Result<(), Error> {
		let mut table = Table::new(2);
		table.add_header(vec![series.axis_title.as_str(), VALUE_UNIT]);
		table.add_separator();
		for (label, value) in series.iter() {
			table.add_row(vec![label.to_owned(), value.to_string()]);
		}
		table.right_align(vec![1]);

		writeln!(self.out, "{}", title)?;
		writeln!(self.out)?;
		write!(self.out, "{}", table.render())?;
		Ok(())
	}

	fn no_data(&mut self, title: &str, message: &str) -> Result<(), Error> {
		writeln!(self.out, "{}", title)?;
		writeln!(self.out)?;
		writeln!(self.out, "{}", message)?;
		Ok(())
	}
}
