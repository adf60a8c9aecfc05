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
use anyhow::{anyhow, bail, Error};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div};

/// An exact rational number backed by a fraction of i128s, used for prices
/// and their averages so that bucket means never pick up binary floating
/// point noise before they are rounded.
///
/// Automatically simplifies its underlying fractional representation.
#[derive(Clone, Copy, Debug)]
pub struct Decimal {
	numerator: i128,

	/// Always positive; the sign lives on the numerator.
	denominator: i128,

	/// How many decimal places to render when asked to print. Rounds half
	/// away from zero when underlying precision exceeds what is requested.
	///
	/// Has no effect on the underlying fraction.
	render_precision: u32,
}

impl Decimal {
	/// Finest number of decimal places kept; finer input is rounded.
	const MAX_PRECISION: i64 = 18;

	/// Upper bound on significant digits accepted by the parser, keeping
	/// sums of many prices comfortably inside i128.
	const MAX_DIGITS: usize = 30;

	pub fn zero() -> Self {
		Self {
			numerator: 0,
			denominator: 1,
			render_precision: 0,
		}
	}

	pub fn from_i128(amount: i128) -> Self {
		Self {
			numerator: amount,
			denominator: 1,
			render_precision: 0,
		}
	}

	/// Parses a decimal number such as "3.45", "-0.5", "4", ".5" or "1e-3".
	/// Surrounding whitespace is ignored. Thousands separators and decimal
	/// commas are not accepted.
	pub fn from_str(input: &str) -> Result<Self, Error> {
		let trimmed = input.trim();
		let (is_negative, unsigned) = match trimmed.strip_prefix('-') {
			Some(rest) => (true, rest),
			None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
		};

		let (mantissa, exponent) =
			match unsigned.find(|c| c == 'e' || c == 'E') {
				Some(idx) => {
					(&unsigned[..idx], unsigned[idx + 1..].parse::<i64>()?)
				},
				None => (unsigned, 0),
			};

		let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
		if whole.is_empty() && fraction.is_empty() {
			bail!("Invalid decimal format: {:?}", input);
		}
		if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
			bail!("Invalid decimal format: {:?}", input);
		}

		let mut digits = format!("{}{}", whole, fraction);
		let mut precision = (fraction.len() as i64)
			.checked_sub(exponent)
			.ok_or_else(|| anyhow!("Exponent out of range: {:?}", input))?;

		// zeros past the finest place carry no value
		while precision > Decimal::MAX_PRECISION && digits.ends_with('0') {
			digits.pop();
			precision -= 1;
		}

		// anything still finer is rounded half away from zero
		let mut round_up = false;
		if precision > Decimal::MAX_PRECISION {
			let excess = (precision - Decimal::MAX_PRECISION) as usize;
			let keep = digits.len().saturating_sub(excess);
			round_up = excess <= digits.len() && digits.as_bytes()[keep] >= b'5';
			digits.truncate(keep);
			precision = Decimal::MAX_PRECISION;
		}

		let significant = digits.trim_start_matches('0');
		if significant.len() > Decimal::MAX_DIGITS {
			bail!("Too many digits in decimal: {:?}", input);
		}

		let mut numerator = if significant.is_empty() {
			0
		} else {
			significant.parse::<i128>()?
		};
		if round_up {
			numerator += 1;
		}

		let (denominator, render_precision) = if precision >= 0 {
			(10i128.pow(precision as u32), precision as u32)
		} else {
			let shift = 10i128
				.checked_pow((-precision) as u32)
				.ok_or_else(|| anyhow!("Exponent out of range: {:?}", input))?;
			numerator = numerator
				.checked_mul(shift)
				.ok_or_else(|| anyhow!("Decimal out of range: {:?}", input))?;
			(1, 0)
		};

		if is_negative {
			numerator = -numerator;
		}

		let mut out = Self {
			numerator,
			denominator,
			render_precision,
		};
		out.reduce();
		Ok(out)
	}

	/// Arithmetic mean of the given values, or None if there are none.
	pub fn mean(values: &[Decimal]) -> Option<Decimal> {
		if values.is_empty() {
			return None;
		}

		let total: Decimal = values.iter().copied().sum();
		Some(total / values.len() as i128)
	}

	/// Returns this value rounded to the given number of decimal places,
	/// half away from zero, and rendering at exactly that many places.
	pub fn rounded(&self, decimal_places: u32) -> Self {
		let scale = 10i128.pow(decimal_places);
		let magnitude = Decimal::round_scaled(
			self.numerator.unsigned_abs(),
			self.denominator as u128,
			scale as u128,
		) as i128;

		let mut out = Self {
			numerator: if self.numerator < 0 {
				-magnitude
			} else {
				magnitude
			},
			denominator: scale,
			render_precision: decimal_places,
		};
		out.reduce();
		out
	}

	pub fn render_precision(&self) -> u32 {
		self.render_precision
	}

	/// Nearest f64, for handing values to consumers that only speak JSON
	/// numbers.
	pub fn to_f64(&self) -> f64 {
		self.numerator as f64 / self.denominator as f64
	}

	/// Computes round(numerator * scale / denominator), half away from zero,
	/// on magnitudes.
	fn round_scaled(numerator: u128, denominator: u128, scale: u128) -> u128 {
		(2 * numerator * scale + denominator) / (2 * denominator)
	}

	fn reduce(&mut self) {
		if self.numerator == 0 {
			self.denominator = 1;
			return;
		}

		let divisor = gcd(self.numerator.unsigned_abs(), self.denominator as u128);
		if divisor > 1 {
			self.numerator /= divisor as i128;
			self.denominator /= divisor as i128;
		}
	}
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
	while b != 0 {
		(a, b) = (b, a % b);
	}
	a
}

impl fmt::Display for Decimal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let scale = 10u128.pow(self.render_precision);
		let scaled = Decimal::round_scaled(
			self.numerator.unsigned_abs(),
			self.denominator as u128,
			scale,
		);

		let sign = if self.numerator < 0 && scaled != 0 {
			"-"
		} else {
			""
		};

		if self.render_precision == 0 {
			return write!(f, "{}{}", sign, scaled);
		}

		write!(
			f,
			"{}{}.{:0width$}",
			sign,
			scaled / scale,
			scaled % scale,
			width = self.render_precision as usize
		)
	}
}

impl Serialize for Decimal {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_f64(self.to_f64())
	}
}

impl Add for Decimal {
	type Output = Self;

	fn add(self, other: Self) -> Self {
		let divisor =
			gcd(self.denominator as u128, other.denominator as u128) as i128;
		let denominator = self.denominator / divisor * other.denominator;

		let mut out = Self {
			numerator: self.numerator * (denominator / self.denominator)
				+ other.numerator * (denominator / other.denominator),
			denominator,
			render_precision: self.render_precision.max(other.render_precision),
		};
		out.reduce();
		out
	}
}

impl Sum for Decimal {
	fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
		iter.fold(Decimal::zero(), |acc, x| acc + x)
	}
}

impl Div<i128> for Decimal {
	type Output = Self;

	fn div(self, rhs: i128) -> Self {
		if rhs == 0 {
			panic!("Cannot divide by zero");
		}

		let mut out = Self {
			numerator: if rhs < 0 {
				-self.numerator
			} else {
				self.numerator
			},
			denominator: self.denominator * rhs.abs(),
			render_precision: self.render_precision,
		};
		out.reduce();
		out
	}
}

impl PartialEq for Decimal {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Decimal {
	fn cmp(&self, other: &Self) -> Ordering {
		(self.numerator * other.denominator)
			.cmp(&(other.numerator * self.denominator))
	}
}
