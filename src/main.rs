//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::process::ExitCode;

use grin::tools::cli::{grinopts_init, Mode};
use grin::{decode, encode};

use log::{error, info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> ExitCode {
    // Available log levels are Error, Warn, Info, Debug, Trace. The command line narrows this.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Could not start logging: {}", e);
    }

    let options = grinopts_init();

    // Refuse to clobber an existing file unless asked to
    if !options.force_overwrite && options.output.exists() {
        error!(
            "{} already exists. Use -f/--force to replace it.",
            options.output.display()
        );
        return ExitCode::FAILURE;
    }

    //----- Figure how what we need to do and go do it
    let result = match options.op_mode {
        Mode::Encode => encode(&options.input, &options.output),
        Mode::Decode => decode(&options.input, &options.output),
    };

    match result {
        Ok(stats) => {
            info!(
                "{} done: {} bytes in, {} bytes out.",
                options.op_mode, stats.bytes_in, stats.bytes_out
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{} of {} failed: {}", options.op_mode, options.input.display(), e);
            ExitCode::FAILURE
        }
    }
}
