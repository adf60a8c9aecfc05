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
use crate::source::document::RawPricePoint;
use crate::util::date::Date;
use crate::util::decimal::Decimal;
use serde_json::Value;
use std::fmt;

/// A validated price observation. The price is always strictly between
/// zero and PricePoint::MAX_PRICE.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PricePoint {
	pub date: Date,
	pub price: Decimal,
}

/// Why a raw record was rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum PointDefect {
	MissingDate,
	MalformedDate(String),
	MissingPrice,
	NonNumericPrice(String),
	PriceOutOfRange(Decimal),
}

impl PricePoint {
	/// Prices at or above this, in €/kg, are data entry errors rather than
	/// market moves.
	pub const MAX_PRICE: i128 = 20;

	/// Validates a raw record into a price point. This is the single rule
	/// for what counts as usable data.
	pub fn validate(raw: &RawPricePoint) -> Result<PricePoint, PointDefect> {
		let date = match &raw.date {
			Value::Null => return Err(PointDefect::MissingDate),
			Value::String(s) => Date::from_str(s)
				.map_err(|_| PointDefect::MalformedDate(s.to_owned()))?,
			other => {
				return Err(PointDefect::MalformedDate(other.to_string()))
			},
		};

		let price = match &raw.price {
			Value::Null => return Err(PointDefect::MissingPrice),
			Value::Number(n) => Decimal::from_str(&n.to_string())
				.map_err(|_| PointDefect::NonNumericPrice(n.to_string()))?,
			Value::String(s) => Decimal::from_str(s)
				.map_err(|_| PointDefect::NonNumericPrice(s.to_owned()))?,
			other => {
				return Err(PointDefect::NonNumericPrice(other.to_string()))
			},
		};

		if price <= Decimal::zero()
			|| price >= Decimal::from_i128(PricePoint::MAX_PRICE)
		{
			return Err(PointDefect::PriceOutOfRange(price));
		}

		Ok(PricePoint { date, price })
	}
}

impl fmt::Display for PointDefect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PointDefect::MissingDate => write!(f, "missing date"),
			PointDefect::MalformedDate(s) => write!(f, "malformed date {}", s),
			PointDefect::MissingPrice => write!(f, "missing price"),
			PointDefect::NonNumericPrice(s) => {
				write!(f, "non-numeric price {}", s)
			},
			PointDefect::PriceOutOfRange(p) => {
				write!(f, "price {} outside (0, {})", p, PricePoint::MAX_PRICE)
			},
		}
	}
}
