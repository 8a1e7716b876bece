use crate::{
    common::resolve_program,
    exec::{check_cargo, exit_code, run_to_completion},
    invocation::{
        DEFAULT_BIN, DEFAULT_CARGO, DEFAULT_EXECUTION, DEFAULT_FEATURE, DEFAULT_LOG_FILTER,
        DEFAULT_URI, TryRuntime,
    },
    snapshot::snapshot_filename_now,
};
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, error::ErrorKind};
use std::{ffi::OsString, path::PathBuf};

/// Exit code for malformed command lines.
pub const USAGE_EXIT_CODE: u8 = 1;

/// Exit code when the wrapper itself fails before or while starting cargo.
pub const FAILURE_EXIT_CODE: u8 = 1;

const EXAMPLES: &str = "\
Examples:
  parami-try-runtime live Ad Nft
  parami-try-runtime snap snap_15566633.bin";

const ALL_PALLETS_NOTE: &str = "\
Note: You are downloading states of ALL pallets. It might take a while.
      To speed up downloading, you could specify only relevant pallet names.
      Example: parami-try-runtime live Ad Nft";

/// Run try-runtime on-runtime-upgrade against the Parami node.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = None,
    arg_required_else_help = true,
    after_help = EXAMPLES
)]
pub struct Options {
    #[command(flatten)]
    pub common: Common,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Clone, Debug)]
pub struct Common {
    /// The path to the cargo binary (or look for binary in PATH if `None`).
    #[arg(long, global = true)]
    pub cargo: Option<PathBuf>,

    /// Node binary built and run by cargo.
    #[arg(long, global = true, default_value = DEFAULT_BIN)]
    pub bin: String,

    /// Cargo feature that enables the try-runtime subcommand.
    #[arg(long, global = true, default_value = DEFAULT_FEATURE)]
    pub features: String,

    /// Execution strategy passed to try-runtime.
    #[arg(long, global = true, default_value = DEFAULT_EXECUTION)]
    pub execution: String,

    /// `RUST_LOG` filter for the node.
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILTER)]
    pub log: String,

    /// Print the command instead of running it.
    #[arg(long, global = true)]
    pub dry_run: bool,
}

impl Common {
    fn apply(&self, invocation: TryRuntime) -> Result<TryRuntime> {
        let cargo = resolve_program(self.cargo.as_deref(), DEFAULT_CARGO)?;
        Ok(invocation
            .with_cargo(cargo)
            .with_bin(&self.bin)
            .with_feature(&self.features)
            .with_execution(&self.execution)
            .with_log_filter(&self.log))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download live chain state, then run the upgrade check against it.
    ///
    /// The downloaded state is saved to `snap_<unix timestamp>.bin` so it can
    /// be replayed with `snap`.
    Live(Live),

    /// Run the upgrade check against a previously saved snapshot.
    Snap(Snap),
}

#[derive(Parser, Debug)]
pub struct Live {
    /// RPC endpoint to download state from.
    #[arg(long, env = "PARAMI_RPC_URI", default_value = DEFAULT_URI)]
    pub uri: String,

    /// Pallets to download state for, e.g. `Ad Nft` (all pallets if none are given).
    pub pallets: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct Snap {
    /// Snapshot file, e.g. `snap_15566633.bin`.
    pub snapshot: String,
}

/// Parses `args` and runs the selected mode, returning the process exit code.
pub fn run<T: Into<OsString> + Clone, I: IntoIterator<Item = T>>(args: I) -> u8 {
    let options = match Options::try_parse_from(args) {
        Ok(options) => options,
        Err(err) => return report_usage(err),
    };

    match dispatch(options) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            FAILURE_EXIT_CODE
        }
    }
}

// Explicit `--help`/`--version` land on stdout and succeed. Everything else,
// including a missing mode, is a usage error on stderr.
fn report_usage(err: clap::Error) -> u8 {
    let _ = err.print();
    if !err.use_stderr() {
        return 0;
    }
    if wants_full_help(&err) {
        eprintln!("\n{}", Options::command().render_help());
    }
    USAGE_EXIT_CODE
}

// clap already shows the full help for a missing mode; an unknown mode only
// gets the one-line usage, which lacks the examples.
fn wants_full_help(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::InvalidSubcommand | ErrorKind::UnknownArgument)
}

pub fn dispatch(options: Options) -> Result<u8> {
    let dry_run = options.common.dry_run;
    let invocation = build_invocation(options)?;
    execute(&invocation, dry_run)
}

pub fn build_invocation(options: Options) -> Result<TryRuntime> {
    let invocation = match options.command {
        Command::Live(opts) => live(opts)?,
        Command::Snap(opts) => snap(opts),
    };
    options.common.apply(invocation)
}

fn live(live: Live) -> Result<TryRuntime> {
    if live.pallets.is_empty() {
        println!("{ALL_PALLETS_NOTE}");
    }

    let snapshot = snapshot_filename_now()?;
    tracing::info!(
        uri = %live.uri,
        pallets = ?live.pallets,
        "saving live state to {snapshot}"
    );
    Ok(TryRuntime::live(live.uri, snapshot, live.pallets))
}

// The file isn't checked here; try-runtime reports a missing snapshot itself.
fn snap(snap: Snap) -> TryRuntime {
    TryRuntime::snap(snap.snapshot)
}

fn execute(invocation: &TryRuntime, dry_run: bool) -> Result<u8> {
    if dry_run {
        println!("{invocation}");
        return Ok(0);
    }

    check_cargo(invocation.cargo())?;

    tracing::info!("running {invocation}");
    let status = run_to_completion(&mut invocation.to_command())?;
    if !status.success() {
        tracing::warn!("try-runtime {status}");
    }
    Ok(exit_code(status))
}
