//! Datakit CLI
//!
//! Prints a greeting, then fills an `IntArrayList` and prints it.

use anyhow::ensure;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use datakit_basic::{DEFAULT_CAPACITY, IntArrayList};
use std::process;

const GREETING: &str = "Hello world!";

/// Upper bound for `--count` and `--capacity`
const MAX_ELEMENTS: usize = 1 << 24;

/// What to put in the demo list and how to render it
#[derive(Debug, Clone, PartialEq, Eq)]
struct DemoOptions {
    value: i32,
    count: usize,
    capacity: usize,
    json: bool,
}

impl DemoOptions {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            value: matches.get_one::<i32>("value").copied().unwrap_or_default(),
            count: matches.get_one::<usize>("count").copied().unwrap_or_default(),
            capacity: matches
                .get_one::<usize>("capacity")
                .copied()
                .unwrap_or(DEFAULT_CAPACITY),
            json: matches.get_flag("json"),
        }
    }
}

fn cli() -> Command {
    Command::new("datakit")
        .version("0.1.0")
        .about("Exercise the datakit primitive array list")
        .arg(
            Arg::new("value")
                .long("value")
                .value_name("INT")
                .help("Value appended to the list")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i32))
                .default_value("6"),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .value_name("N")
                .help("How many times the value is appended")
                .value_parser(value_parser!(usize))
                .default_value("3"),
        )
        .arg(
            Arg::new("capacity")
                .long("capacity")
                .value_name("N")
                .help(format!("Initial capacity of the list [default: {DEFAULT_CAPACITY}]"))
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Render the list as a JSON array")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("DATAKIT_LOG", "warn"))
        .format_timestamp(None)
        .init();
}

fn main() {
    init_logging();
    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprint!("{e}");
            process::exit(1);
        }
    };
    let options = DemoOptions::from_matches(&matches);

    match run(&options) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn build_list(options: &DemoOptions) -> Result<IntArrayList, anyhow::Error> {
    ensure!(
        options.count <= MAX_ELEMENTS,
        "--count {} exceeds the limit of {MAX_ELEMENTS}",
        options.count
    );
    ensure!(
        options.capacity <= MAX_ELEMENTS,
        "--capacity {} exceeds the limit of {MAX_ELEMENTS}",
        options.capacity
    );
    let mut list = IntArrayList::try_with_capacity(options.capacity)?;
    for _ in 0..options.count {
        list.try_add(options.value)?;
    }
    log::debug!(
        "built list of {} elements, capacity {}",
        list.len(),
        list.capacity()
    );
    Ok(list)
}

fn run(options: &DemoOptions) -> Result<Vec<String>, anyhow::Error> {
    let list = build_list(options)?;
    let rendered = if options.json {
        serde_json::to_string(&list)?
    } else {
        list.to_string()
    };
    Ok(vec![GREETING.to_string(), rendered])
}
