use std::{fmt::Display, fmt::Formatter, path::PathBuf};

use clap::{Parser, Subcommand};

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    /// The log filter matching this verbosity.
    pub fn level_filter(&self) -> log::LevelFilter {
        match self {
            Verbosity::Quiet => log::LevelFilter::Off,
            Verbosity::Errors => log::LevelFilter::Error,
            Verbosity::Warnings => log::LevelFilter::Warn,
            Verbosity::Info => log::LevelFilter::Info,
            Verbosity::Debug => log::LevelFilter::Debug,
            Verbosity::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Encode or decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    name = "grin",
    version,
    about = "Compress and expand files with static huffman coding",
    long_about = None,
    after_help = "An existing OUTPUT is never replaced unless -f/--force is given.")]
pub struct Args {
    #[clap(subcommand)]
    command: Command,

    /// Replace OUTPUT if it already exists (required: without it grin stops with an error)
    #[clap(short = 'f', long = "force", global = true)]
    force: bool,

    /// Be verbose (repeat for more: -vvvv shows everything)
    #[clap(short = 'v', long = "verbose", global = true, parse(from_occurrences))]
    verbose: u64,

    /// Suppress everything but the result
    #[clap(short = 'q', long = "quiet", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress <INPUT> into the grin file <OUTPUT>
    Encode { input: PathBuf, output: PathBuf },
    /// Expand the grin file <INPUT> into <OUTPUT>
    Decode { input: PathBuf, output: PathBuf },
}

/// Everything the user can set.
#[derive(Debug)]
pub struct GrinOpts {
    /// Encode/Decode
    pub op_mode: Mode,
    /// File to read
    pub input: PathBuf,
    /// File to write
    pub output: PathBuf,
    /// Silently overwrite an existing output file
    pub force_overwrite: bool,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl From<Args> for GrinOpts {
    fn from(args: Args) -> Self {
        let (op_mode, input, output) = match args.command {
            Command::Encode { input, output } => (Mode::Encode, input, output),
            Command::Decode { input, output } => (Mode::Decode, input, output),
        };
        let verbose = if args.quiet {
            Verbosity::Quiet
        } else {
            match args.verbose {
                0 => Verbosity::Errors,
                1 => Verbosity::Warnings,
                2 => Verbosity::Info,
                3 => Verbosity::Debug,
                _ => Verbosity::Trace,
            }
        };
        GrinOpts {
            op_mode,
            input,
            output,
            force_overwrite: args.force,
            verbose,
        }
    }
}

/// Parse the command line. On a bad command line clap prints the usage and exits
/// before any file is touched.
pub fn grinopts_init() -> GrinOpts {
    let opts = GrinOpts::from(Args::parse());
    log::set_max_level(opts.verbose.level_filter());
    opts
}

/// Parse an explicit argument list (first item is the program name).
pub fn grinopts_from<I, T>(args: I) -> Result<GrinOpts, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Args::try_parse_from(args).map(GrinOpts::from)
}
