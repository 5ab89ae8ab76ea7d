//! Session controller: collect filters, load, filter, report, repeat.

use anyhow::{Result, bail};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::CityConfig;
use crate::error::BikeshareError;
use crate::filter::TripFilter;
use crate::input::{Validated, parse_city, parse_day, parse_month, parse_yes_no, wants_restart};
use crate::loader::load_city;
use crate::output::{
    Format, ModuleReport, SessionReport, SessionSummary, append_summary, emit, render_rows,
};
use crate::stats::{duration_stats, station_stats, time_stats, user_stats};
use crate::table::{City, TripTable};

/// Rows shown per page of the raw-data view.
pub const PAGE_SIZE: usize = 5;

/// Source of answers to interactive questions.
pub trait Prompter {
    /// Shows `prompt` and returns the next answer. Fails once input is exhausted.
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// A [`Prompter`] over a line-oriented reader and writer (usually stdin/stdout).
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed while waiting for an answer");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub format: Format,
    /// CSV file that receives one summary row per iteration.
    pub export: Option<PathBuf>,
}

/// Asks `prompt`, then `retry` until `parse` accepts the answer.
pub fn ask_until<T>(
    prompter: &mut impl Prompter,
    prompt: &str,
    retry: &str,
    parse: impl Fn(&str) -> Validated<T>,
) -> Result<T> {
    let mut answer = prompter.ask(prompt)?;
    loop {
        if let Validated::Accepted(value) = parse(&answer) {
            return Ok(value);
        }
        answer = prompter.ask(retry)?;
    }
}

/// Collects the city, month and day selections.
pub fn collect_filters(prompter: &mut impl Prompter) -> Result<(City, TripFilter)> {
    let city = ask_until(
        prompter,
        "Please select your city among Chicago, New York City and Washington. \
         Type in C, N or W for your city selection: ",
        "That's not a valid input. Please type in C, N or W for your city selection: ",
        parse_city,
    )?;
    let month = ask_until(
        prompter,
        "Please select a month between 1 (Jan) and 6 (June) as filter or skip this option \
         by selecting all. Please type in a number for the month or select all: ",
        "That's not a valid input. Please type in a number for the month or select all: ",
        parse_month,
    )?;
    let day = ask_until(
        prompter,
        "Please select a day of the week as filter or skip this option by selecting all. \
         Please type in full name such as Sunday or all: ",
        "That's not a valid input. Please type in full name such as Sunday or all: ",
        parse_day,
    )?;

    Ok((city, TripFilter::new(month, day)))
}

/// Offers the filtered rows [`PAGE_SIZE`] at a time until the user declines
/// or the table runs out.
pub fn browse_rows(
    table: &TripTable,
    prompter: &mut impl Prompter,
    out: &mut impl Write,
) -> Result<()> {
    let retry = "That's not a valid input. Please type in yes/no: ";
    let mut show = ask_until(
        prompter,
        "Would you like to get a glimpse of the data based on your filter? Type in yes/no: ",
        retry,
        parse_yes_no,
    )?;

    let mut offset = 0;
    while show {
        let page = table.page(offset, PAGE_SIZE);
        if page.is_empty() {
            writeln!(out, "No more rows.")?;
            break;
        }
        render_rows(page, out)?;
        offset += page.len();

        show = ask_until(
            prompter,
            "Do you want to see the next 5 rows? Please type in yes/no: ",
            retry,
            parse_yes_no,
        )?;
    }
    Ok(())
}

fn timed<T>(
    module: &'static str,
    f: impl FnOnce() -> Result<T, BikeshareError>,
) -> ModuleReport<T> {
    let start = Instant::now();
    let outcome = f();
    let elapsed_secs = start.elapsed().as_secs_f64();

    if let Err(e) = &outcome {
        warn!(module, error = %e, "Statistic unavailable");
    }
    ModuleReport {
        elapsed_secs,
        outcome,
    }
}

/// Runs the four statistics modules over an already filtered table.
pub fn analyze(city: City, filter: TripFilter, table: &TripTable) -> SessionReport {
    SessionReport {
        city,
        filter,
        rows: table.len(),
        time: timed("time", || time_stats(table)),
        station: timed("station", || station_stats(table)),
        duration: timed("duration", || duration_stats(table)),
        user: timed("user", || user_stats(table)),
    }
}

/// Loads and filters `city`, returning the narrowed table.
///
/// Loader errors are returned as-is; no partial table is produced.
#[tracing::instrument(skip_all, fields(city = %city, filter = %filter))]
pub fn load_filtered(config: &CityConfig, city: City, filter: TripFilter) -> Result<TripTable> {
    let table = load_city(config, city)?;
    let filtered = filter.apply(&table);
    info!(loaded = table.len(), kept = filtered.len(), "Filters applied");
    Ok(filtered)
}

/// Emits `report` and, if configured, appends its summary row.
pub fn publish(
    report: &SessionReport,
    options: &SessionOptions,
    out: &mut impl Write,
) -> Result<()> {
    emit(report, options.format, out)?;
    if let Some(path) = &options.export {
        append_summary(path, &SessionSummary::from_report(report))?;
    }
    Ok(())
}

/// One full iteration: filters, load, optional raw view, statistics.
pub fn run_iteration(
    config: &CityConfig,
    prompter: &mut impl Prompter,
    out: &mut impl Write,
    options: &SessionOptions,
) -> Result<SessionReport> {
    let (city, filter) = collect_filters(prompter)?;
    writeln!(out, "{}", "-".repeat(40))?;

    let table = load_filtered(config, city, filter)?;
    browse_rows(&table, prompter, out)?;

    let report = analyze(city, filter, &table);
    publish(&report, options, out)?;
    Ok(report)
}

/// Repeats [`run_iteration`] while the user asks to restart.
///
/// A failed load is reported and the user may try again; running out of
/// input ends the session with an error.
pub fn run(
    config: &CityConfig,
    prompter: &mut impl Prompter,
    out: &mut impl Write,
    options: &SessionOptions,
) -> Result<()> {
    writeln!(out, "Hello! Let's explore some US bikeshare data!")?;

    loop {
        if let Err(e) = run_iteration(config, prompter, out, options) {
            match e.downcast_ref::<BikeshareError>() {
                Some(err) => {
                    warn!(error = %err, "Iteration failed");
                    writeln!(out, "Could not load trip data: {err}")?;
                }
                None => return Err(e),
            }
        }

        let answer = prompter.ask("\nWould you like to restart? Enter yes or no.\n")?;
        if !wants_restart(&answer) {
            break;
        }
    }

    info!("Session finished");
    Ok(())
}
