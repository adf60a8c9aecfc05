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
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

/// Olive oil quality classification. Each grade is published under a fixed
/// label, which is also its key in the price history document.
#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Grade {
	VirginExtra,
	Virgin,
	Lampante,
}

impl Grade {
	/// All grades, in the order they are published.
	pub const ALL: [Grade; 3] = [Grade::VirginExtra, Grade::Virgin, Grade::Lampante];

	/// The label under which this grade's prices are published.
	pub fn label(&self) -> &'static str {
		match self {
			Grade::VirginExtra => "Aceite de oliva virgen extra",
			Grade::Virgin => "Aceite de oliva virgen",
			Grade::Lampante => "Aceite de oliva lampante",
		}
	}

	/// Identifies the grade a bulletin line refers to, if any. Lines are
	/// matched case-insensitively; "virgen" must stand as its own word so
	/// that e.g. "virgenes" is not taken for a grade.
	pub fn from_bulletin_line(line: &str) -> Option<Grade> {
		let lower = line.to_lowercase();
		if lower.contains("virgen extra") {
			return Some(Grade::VirginExtra);
		}

		let has_virgen_word = lower
			.split(|c: char| !c.is_alphanumeric())
			.any(|word| word == "virgen");
		if has_virgen_word && !lower.contains("extra") {
			return Some(Grade::Virgin);
		}

		if lower.contains("lampante") {
			return Some(Grade::Lampante);
		}

		None
	}
}

impl fmt::Display for Grade {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.label())
	}
}
