/* Copyright © 2024-2025 Adam Train <adam@adamtrain.net>
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

use anyhow::{bail, Error};
use std::cmp::Ordering;
use std::fmt;

/// A calendar date with no time or zone component.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Date {
	year: u32,
	month: u8,
	day: u8,
}

impl Date {
	/// Constructor to parse a string in the strict "YYYY-MM-DD" format. Each
	/// component must have exactly the expected number of digits.
	pub fn from_str(date_str: &str) -> Result<Date, Error> {
		let parts: Vec<&str> = date_str.split('-').collect();
		if parts.len() != 3
			|| parts[0].len() != 4
			|| parts[1].len() != 2
			|| parts[2].len() != 2
		{
			bail!("Date format must be YYYY-MM-DD: {}", date_str);
		}

		if !parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())) {
			bail!("Date components must be numeric: {}", date_str);
		}

		let year = parts[0].parse::<u32>()?;
		let month = parts[1].parse::<u8>()?;
		let day = parts[2].parse::<u8>()?;

		Date::new(year, month, day)
	}

	/// Constructor from numeric components; fails on impossible dates such
	/// as the 30th of February.
	pub fn new(year: u32, month: u8, day: u8) -> Result<Date, Error> {
		if !Date::is_valid_date(year, month, day) {
			bail!("Invalid date: {:04}-{:02}-{:02}", year, month, day);
		}

		Ok(Date { year, month, day })
	}

	pub fn year(&self) -> u32 {
		self.year
	}

	pub fn month(&self) -> u8 {
		self.month
	}

	/// The "YYYY-MM" key identifying the month this date falls in.
	pub fn month_key(&self) -> String {
		format!("{:04}-{:02}", self.year, self.month)
	}

	/// The same calendar day one year earlier. A 29th of February rolls
	/// forward to the 1st of March when the previous year has no leap day.
	pub fn minus_one_year(&self) -> Date {
		let year = self.year.saturating_sub(1);
		if self.month == 2 && self.day == 29 && !Date::is_leap_year(year) {
			return Date {
				year,
				month: 3,
				day: 1,
			};
		}

		Date {
			year,
			month: self.month,
			day: self.day,
		}
	}

	fn is_leap_year(year: u32) -> bool {
		(year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
	}

	fn days_in_month(year: u32, month: u8) -> u8 {
		match month {
			1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
			4 | 6 | 9 | 11 => 30,
			2 => {
				if Date::is_leap_year(year) {
					29
				} else {
					28
				}
			},
			_ => 0, // Invalid month
		}
	}

	fn is_valid_date(year: u32, month: u8, day: u8) -> bool {
		if !(1..=12).contains(&month) {
			return false;
		}
		if day < 1 || day > Date::days_in_month(year, month) {
			return false;
		}
		true
	}
}

impl PartialOrd for Date {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Date {
	fn cmp(&self, other: &Self) -> Ordering {
		(self.year, self.month, self.day).cmp(&(
			other.year,
			other.month,
			other.day,
		))
	}
}

impl fmt::Display for Date {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
	}
}
