//! closers-sync CLI - keep a CLOSERS install in sync with the patch server
//!
//! Resolves settings from flags, an optional INI file and an interactive
//! prompt, then runs one sync cycle and reports the result.

mod error;
mod prompt;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use console::Term;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "closers-sync", version, about = "Sync a CLOSERS install with the live patch server")]
pub struct Args {
    /// Game install directory. Prompted for when omitted.
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// INI file overriding the built-in settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Exit without waiting for a key press
    #[arg(long)]
    pub no_pause: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let code = match run::run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    if !args.no_pause {
        pause();
    }
    ExitCode::from(code)
}

/// Keep the console window open until a key is pressed.
fn pause() {
    let term = Term::stdout();
    if !term.is_term() {
        return;
    }
    let _ = term.write_line("Press any key to exit...");
    let _ = term.read_key();
}
