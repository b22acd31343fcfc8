//! Command-line front end for the filter engine.
//!
//! Loads `glossary.txt` and `countries.txt` from the data directory, applies
//! each filter flag as one toggle (in order, so repeating a value switches it
//! back off), and prints either the matching countries or the control list as
//! one JSON object per line. Countries without usable coordinates are left
//! out of the output; `RUST_LOG=debug` shows which ones.

use anyhow::{Context, Result, anyhow, bail};
use legalmap::{
    Category, DirectorySource, FilterKey, JsonLinesPresenter, Session, Status, find_data_root,
};
use std::env;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse(env::args_os().skip(1))?;
    let root = find_data_root(args.data_dir.as_deref())?;
    let mut session = Session::load(&DirectorySource::new(&root))
        .with_context(|| format!("loading data from {}", root.display()))?;

    for key in &args.toggles {
        session.apply(key);
    }

    let stdout = io::stdout();
    let mut presenter = JsonLinesPresenter::new(stdout.lock());
    match args.output {
        Output::Controls => session.render_controls(&mut presenter),
        Output::Results => {
            let summary = session.refresh(&mut presenter);
            log::info!(
                "placed {} countries, skipped {}",
                summary.placed,
                summary.skipped
            );
        }
    }
    presenter.finish().context("writing output")?;
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Output {
    Results,
    Controls,
}

#[derive(Debug)]
struct CliArgs {
    data_dir: Option<PathBuf>,
    toggles: Vec<FilterKey>,
    output: Output,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = OsString>) -> Result<Self> {
        let mut args = args.into_iter();
        let mut data_dir: Option<PathBuf> = None;
        let mut toggles = Vec::new();
        let mut output = Output::Results;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--data-dir" => {
                    if data_dir.is_some() {
                        bail!("--data-dir may only be provided once");
                    }
                    data_dir = Some(PathBuf::from(next_value(&mut args, "--data-dir")?));
                }
                "--treaty" => {
                    let value = next_value(&mut args, "--treaty")?;
                    toggles.push(FilterKey::tag(Category::Treaties, value));
                }
                "--membership" => {
                    let value = next_value(&mut args, "--membership")?;
                    toggles.push(FilterKey::tag(Category::Memberships, value));
                }
                "--situation" => {
                    let value = next_value(&mut args, "--situation")?;
                    toggles.push(FilterKey::tag(Category::Situations, value));
                }
                "--status" => {
                    let raw = next_value(&mut args, "--status")?;
                    toggles.push(FilterKey::Status(parse_status(&raw)?));
                }
                "--controls" => output = Output::Controls,
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n\n{}", usage()),
            }
        }

        Ok(CliArgs {
            data_dir,
            toggles,
            output,
        })
    }
}

fn parse_status(raw: &str) -> Result<Status> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(Status::from_code)
        .ok_or_else(|| anyhow!("--status expects 0, 1 or 2, got '{raw}'"))
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: legalmap-query [--data-dir DIR] [--treaty ID]... [--membership ID]... [--situation ID]... [--status 0|1|2]... [--controls]\n\
Each filter flag toggles one value. Values within a category must all be present on a country;\n\
status values are alternatives. Prints matching countries (or, with --controls, the filter\n\
controls) as JSON lines. DIR defaults to $LEGALMAP_ROOT, then the bundled data directory.\n"
}
