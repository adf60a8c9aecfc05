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
use anyhow::bail;
use chrono::Utc;
use reqwest::header::CACHE_CONTROL;
use reqwest::Method;

/// Query parameter appended to every request so that no intermediate cache
/// hands us a stale copy of the history.
const CACHE_BUST_PARAM: &str = "v";

pub struct Client {
	client: reqwest::blocking::Client,
}

impl Client {
	pub fn new() -> Self {
		Client {
			client: reqwest::blocking::Client::new(),
		}
	}

	/// Sends a cache-busted GET and returns the body. Errors on non-2xx
	/// response codes.
	pub fn get_text(&self, url: &str) -> Result<String, anyhow::Error> {
		let stamp = Utc::now().timestamp_millis().to_string();

		let request = self
			.client
			.request(Method::GET, url)
			.header(CACHE_CONTROL, "no-store")
			.query(&[(CACHE_BUST_PARAM, stamp.as_str())]);

		tracing::info!(url, "fetching price history");
		let response = request.send()?;

		// Handle non-2xx response codes
		if !response.status().is_success() {
			bail!("Request failed with status: {}", response.status());
		}

		Ok(response.text()?)
	}
}
