//! Document the command line interface
use lazy_static::lazy_static;
use regex::Regex;
use std::env;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

use crate::commands::{history, items, operations, quotes, snapshot, stock, update};
use crate::models::Language;
use crate::Error;
use chrono::NaiveDate;
use colored::Colorize;

#[derive(Debug, StructOpt)]
enum Command {
    /// Read Auctionator files and store their listings
    Snapshot {
        #[structopt(flatten)]
        options: CommonOpts,
        /// Auctionator saved variables
        #[structopt(name = "FILE", parse(from_os_str), required = true)]
        files: Vec<PathBuf>,
    },
    /// Read TradeSkillMaster files and store their auction house trades
    #[structopt(alias = "ops")]
    Operations {
        #[structopt(flatten)]
        options: CommonOpts,
        /// TradeSkillMaster saved variables
        #[structopt(name = "FILE", parse(from_os_str), required = true)]
        files: Vec<PathBuf>,
    },
    /// Fold the stored trades and the other machines' histories into this machine's
    Update(CommonOpts),
    /// Show what every character holds
    Stock {
        #[structopt(flatten)]
        options: CommonOpts,
        /// TradeSkillMaster saved variables
        #[structopt(name = "FILE", short = "f", long = "file", parse(from_os_str))]
        file: PathBuf,
        /// Only items whose name matches
        #[structopt(multiple = true, takes_value = true)]
        query: Vec<String>,
    },
    /// Show the prices of an item
    #[structopt(alias = "prices")]
    Quotes {
        #[structopt(flatten)]
        options: CommonOpts,
        /// Item id or name
        item: String,
        /// Average unit price of the cheapest N units
        #[structopt(long = "best-average")]
        best_average: Option<i64>,
        /// Cheapest unit price of every day
        #[structopt(long = "per-day")]
        per_day: bool,
    },
    /// Show the trades of this machine's history
    #[structopt(alias = "hist")]
    History {
        #[structopt(flatten)]
        options: CommonOpts,
        /// Item id or name
        item: Option<String>,
    },
    /// List the known items
    Items {
        #[structopt(flatten)]
        options: CommonOpts,
        /// The pattern to look for
        #[structopt(multiple = true, takes_value = true)]
        query: Vec<String>,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(about = "Auction house prices and trades of World of Warcraft add-ons",
version = env ! ("CARGO_PKG_VERSION"),
name = "ahcharts"
)]
struct Opt {
    #[structopt(subcommand)]
    cmd: Command,
}

/// Command line options
#[derive(Debug, StructOpt, Clone)]
pub struct CommonOpts {
    /// Ignore init file if it exists
    #[structopt(long = "--args-only")]
    args_only: bool,

    /// Init file
    #[structopt(long = "--init-file", parse(from_os_str))]
    init_file: Option<PathBuf>,

    /// Where results and histories are stored
    #[structopt(long = "--data-folder", parse(from_os_str), default_value = "data")]
    pub data_folder: PathBuf,

    /// Realm of the trades
    #[structopt(long = "--realm", default_value = "Sulfuron")]
    pub realm: String,

    /// Language of the game client
    #[structopt(long = "--language", default_value = "english")]
    pub language: Language,

    /// Name of this machine's history, the host name if not given
    #[structopt(long = "--store-id")]
    store_id: Option<String>,

    #[structopt(short = "b", long = "begin", parse(try_from_str = date_parser))]
    pub begin: Option<NaiveDate>,
    #[structopt(short = "e", long = "end", parse(try_from_str = date_parser))]
    pub end: Option<NaiveDate>,

    #[structopt(long = "--force-color")]
    pub force_color: bool,
}

impl CommonOpts {
    pub fn new() -> Self {
        CommonOpts {
            args_only: false,
            init_file: None,
            data_folder: PathBuf::from("data"),
            realm: "Sulfuron".to_string(),
            language: Language::English,
            store_id: None,
            begin: None,
            end: None,
            force_color: false,
        }
    }

    pub fn database_folder(&self) -> PathBuf {
        self.data_folder.join("database")
    }

    /// The name of this machine's history
    pub fn store_id(&self) -> Result<String, Error> {
        if let Some(id) = self.store_id.as_ref() {
            return Ok(id.clone());
        }
        env::var("HOSTNAME")
            .or_else(|_| env::var("COMPUTERNAME"))
            .map_err(|_| Error::from("Cannot tell the name of this machine, use --store-id".to_string()))
    }

    /// Whether a date is within `--begin` (included) and `--end` (excluded)
    pub fn in_range(&self, date: NaiveDate) -> bool {
        self.begin.map_or(true, |begin| date >= begin) && self.end.map_or(true, |end| date < end)
    }
}

impl Default for CommonOpts {
    fn default() -> Self {
        CommonOpts::new()
    }
}

const INIT_FILE_FLAG: &str = "--init-file";
const NO_INIT_FILE_FLAG: &str = "--args-only";
const INIT_PATHS_UNDER_DIR: &str = "~/.ahchartsrc";
const INIT_PATHS: &str = ".ahchartsrc";

fn init_paths(args: &[String]) -> Vec<String> {
    let mut possible_paths: Vec<String> = Vec::new();
    for (i, arg) in args.iter().enumerate() {
        if arg == NO_INIT_FILE_FLAG {
            return vec![];
        } else if arg == INIT_FILE_FLAG {
            if let Some(path) = args.get(i + 1) {
                possible_paths.push(path.clone());
            }
        }
    }
    possible_paths.push(shellexpand::tilde(INIT_PATHS_UNDER_DIR).to_string());
    possible_paths.push(INIT_PATHS.to_string());
    possible_paths
}

/// Adds the options of an init file to the arguments
///
/// Options already on the command line win.
fn add_init_options(file: &Path, args: &mut Vec<String>) -> Result<(), Error> {
    let contents = read_to_string(file)
        .map_err(|e| Error::from(format!("Cannot read init file {:?}: {}", file, e)))?;
    for line in contents.lines() {
        let option = line.trim_start();
        match option.chars().next() {
            Some('-') => {
                if !option.starts_with("--") {
                    return Err(bad_config(file, line));
                }
                let mut iter = option.split_whitespace();
                let name = match iter.next() {
                    Some(name) => name.to_string(),
                    None => return Err(bad_config(file, line)),
                };
                if !args.iter().any(|x| *x == name) {
                    args.push(name);
                    let rest = iter.collect::<Vec<&str>>().join(" ");
                    if !rest.is_empty() {
                        args.push(rest);
                    }
                }
            }
            Some(';') | Some('#') | Some('!') | Some('%') => (), // a comment
            Some(_) => return Err(bad_config(file, line)),
            None => (),
        }
    }
    Ok(())
}

fn bad_config(file: &Path, line: &str) -> Error {
    Error {
        message: vec![
            format!("Bad config file {:?}\n", file).as_str().bold(),
            line.normal(),
        ],
    }
}

/// Entry point for the command line app
///
/// Load the options from one of the files, add the to the supplied command line options
/// and call the command accordingly.
pub fn run_app(mut args: Vec<String>) -> Result<(), Error> {
    // Look for any file with configuration options
    let config_file = init_paths(&args)
        .into_iter()
        .map(PathBuf::from)
        .find(|file| file.exists());
    if let Some(file) = config_file {
        add_init_options(&file, &mut args)?;
    }

    // Build options from the argument vector
    let opt: Opt = Opt::from_iter(args.iter());

    match opt.cmd {
        Command::Snapshot { options, files } => {
            force_color(&options);
            snapshot::execute(&options, &files)
        }
        Command::Operations { options, files } => {
            force_color(&options);
            operations::execute(&options, &files)
        }
        Command::Update(options) => {
            force_color(&options);
            update::execute(&options)
        }
        Command::Stock {
            options,
            file,
            query,
        } => {
            force_color(&options);
            stock::execute(&options, &file, &query)
        }
        Command::Quotes {
            options,
            item,
            best_average,
            per_day,
        } => {
            force_color(&options);
            quotes::execute(&options, &item, best_average, per_day)
        }
        Command::History { options, item } => {
            force_color(&options);
            history::execute(&options, item.as_deref())
        }
        Command::Items { options, query } => {
            force_color(&options);
            items::execute(&options, &query)
        }
    }
}

fn force_color(options: &CommonOpts) {
    if options.force_color {
        env::set_var("CLICOLOR_FORCE", "1");
    }
}

/// A parser for date expressions
pub fn date_parser(date: &str) -> Result<NaiveDate, Error> {
    lazy_static! {
        static ref RE_MONTH: Regex = Regex::new(r"^(\d{4})[/-](\d\d?)$").unwrap();
        static ref RE_DATE: Regex = Regex::new(r"^(\d{4})[/-](\d\d?)[/-](\d\d?)$").unwrap();
    }
    let ymd = if let Some(captures) = RE_DATE.captures(date) {
        Some((
            captures[1].parse::<i32>(),
            captures[2].parse::<u32>(),
            captures[3].parse::<u32>(),
        ))
    } else if let Some(captures) = RE_MONTH.captures(date) {
        Some((captures[1].parse::<i32>(), captures[2].parse::<u32>(), Ok(1)))
    } else {
        None
    };
    let parsed = match ymd {
        Some((Ok(year), Ok(month), Ok(day))) => NaiveDate::from_ymd_opt(year, month, day),
        Some(_) => None,
        None => match two_timer::parse(date, None) {
            Ok((t1, _t2, _b)) => Some(t1.date()),
            Err(_) => None,
        },
    };
    parsed.ok_or_else(|| Error {
        message: vec![format!("Invalid date {}", date)
            .as_str()
            .bold()
            .bright_red()],
    })
}
