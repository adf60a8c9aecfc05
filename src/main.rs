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
use crate::config::config_file::{Config, Defaults};
use crate::parsing::bulletin::BulletinParser;
use crate::parsing::filesystem::Filesystem;
use crate::reports::chart_renderer::{ChartRenderer, DEFAULT_WIDTH, MAX_WIDTH};
use crate::reports::document_reporter::DocumentReporter;
use crate::reports::json_renderer::JsonRenderer;
use crate::reports::renderer::{render, ViewState};
use crate::reports::table_renderer::TableRenderer;
use crate::series::aggregate::{Granularity, YearFilter};
use crate::series::grade::Grade;
use crate::source::loader::{load, Source};
use anyhow::{bail, Error};
use clap::{Parser, ValueEnum};
use std::io;
use tracing_subscriber::EnvFilter;

mod config;
mod parsing;
mod reports;
mod series;
mod source;
mod util;

/// Used when neither the command line nor the config names a source.
const DEFAULT_DOCUMENT: &str = "precio-aceite-historico.json";

#[derive(Parser)]
#[command(
	name = "olea",
	version = "0.2.3",
	about = "Olive oil price history charting tool"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// Output path for the Convert command
	#[arg(required = false)]
	term: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Specifies the input file
	#[arg(short)]
	file: Option<String>,

	/// Fetch the price history from this URL instead of a file
	#[arg(short, long)]
	url: Option<String>,

	/// Olive oil grade to show
	#[arg(short, long)]
	grade: Option<Grade>,

	/// Time granularity of the buckets
	#[arg(short, long)]
	mode: Option<Granularity>,

	/// Restrict to a single year (YYYY), or "all"
	#[arg(short, long)]
	year: Option<YearFilter>,

	/// Width in characters of the longest chart bar
	#[arg(short, long)]
	width: Option<usize>,

	/// Custom config file location (default: ~/.config/olea/config.toml)
	#[arg(long)]
	config: Option<String>,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if let Some(width) = self.width {
			if width == 0 || width > MAX_WIDTH {
				bail!("Width must be between 1 and {}", MAX_WIDTH);
			}
		}

		if self.file.is_some() && self.url.is_some() {
			bail!("Only one of -f and --url may be specified");
		}

		if self.command == Directive::Convert {
			if self.file.is_none() {
				bail!("No bulletin file specified");
			}
		} else if self.term.is_some() {
			bail!("Unexpected argument: {}", self.term.as_deref().unwrap_or(""));
		}

		Ok(())
	}
}

#[derive(ValueEnum, Clone, Copy, PartialEq)]
enum Directive {
	Chart, // bar chart of the selection
	Table, // the selection as a table
	Json,  // the selection as JSON

	Years,  // years with data for the grade
	Grades, // overview of every grade

	Check, // list records that would be dropped

	Convert, // turn a bulletin text dump into a price history document
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	args.validate()?;
	init_tracing();

	let fs = Filesystem::new();

	if args.command == Directive::Convert {
		return convert(&fs, &args);
	}

	let config = fs.get_config(args.config.as_ref())?;
	let source = resolve_source(&args, &config);
	let view = resolve_view(&args, config.defaults.as_ref());
	let width = resolve_width(&args, config.defaults.as_ref())?;

	let document = load(&fs, &source)?;

	let stdout = io::stdout();
	let mut out = stdout.lock();

	match args.command {
		Directive::Chart => {
			render(&document, &view, &mut ChartRenderer::new(out, width))?;
		},
		Directive::Table => {
			render(&document, &view, &mut TableRenderer::new(out))?;
		},
		Directive::Json => {
			render(&document, &view, &mut JsonRenderer::new(out))?;
		},
		Directive::Years => {
			DocumentReporter::new(&document).print_years(&mut out, view.grade)?
		},
		Directive::Grades => {
			DocumentReporter::new(&document).print_grades(&mut out)?
		},
		Directive::Check => {
			DocumentReporter::new(&document).print_check(&mut out)?
		},
		Directive::Convert => unreachable!("handled before loading"),
	}

	Ok(())
}

/// Diagnostics go to stderr so that reports on stdout stay clean.
fn init_tracing() {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new("warn"));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.init();
}

fn convert(fs: &Filesystem, args: &Cli) -> Result<(), Error> {
	let Some(input) = &args.file else {
		bail!("No bulletin file specified");
	};

	let text = fs.read_to_string(input)?;
	let history = BulletinParser::new()?.parse(&text);
	let json = history.to_json()?;

	match &args.term {
		Some(output) => {
			fs.write(output, &json)?;
			for grade in Grade::ALL {
				println!("{}: {} records", grade.label(), history.records(grade).len());
			}
			println!("Wrote {}", output);
		},
		None => println!("{}", json),
	}

	Ok(())
}

/// The command line wins over config, and config over the default file.
fn resolve_source(args: &Cli, config: &Config) -> Source {
	if let Some(url) = &args.url {
		return Source::Url(url.clone());
	}
	if let Some(file) = &args.file {
		return Source::File(file.clone());
	}

	match &config.source {
		Some(source) => match (&source.url, &source.path) {
			(Some(url), _) => Source::Url(url.clone()),
			(None, Some(path)) => Source::File(path.clone()),
			(None, None) => Source::File(DEFAULT_DOCUMENT.to_string()),
		},
		None => Source::File(DEFAULT_DOCUMENT.to_string()),
	}
}

fn resolve_view(args: &Cli, defaults: Option<&Defaults>) -> ViewState {
	ViewState {
		grade: args
			.grade
			.or_else(|| defaults.and_then(|d| d.grade))
			.unwrap_or(Grade::VirginExtra),
		granularity: args
			.mode
			.or_else(|| defaults.and_then(|d| d.mode))
			.unwrap_or(Granularity::Yearly),
		year: args
			.year
			.or_else(|| defaults.and_then(|d| d.year))
			.unwrap_or_default(),
	}
}

fn resolve_width(args: &Cli, defaults: Option<&Defaults>) -> Result<usize, Error> {
	let width = args
		.width
		.or_else(|| defaults.and_then(|d| d.width))
		.unwrap_or(DEFAULT_WIDTH);

	// the command line was checked already; config was not
	if width == 0 || width > MAX_WIDTH {
		bail!("Width must be between 1 and {}", MAX_WIDTH);
	}
	Ok(width)
}
