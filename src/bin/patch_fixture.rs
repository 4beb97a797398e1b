use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use genesis_patcher::{patch, PatchConfig};

#[derive(Parser, Debug)]
#[command(
    name = "patch_fixture",
    about = "Overwrite the address field of a dumped account fixture"
)]
struct Cli {
    /// JSON config file providing defaults for the options below
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixture to read (defaults to tests/genesis/usdc.json)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Destination file (defaults to rewriting the input in place)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Base58 address to write
    #[arg(long)]
    address: Option<String>,
    /// Byte offset of the address field in the account data
    #[arg(long)]
    offset: Option<usize>,
    /// Patch in memory only, without writing the result
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> Result<PatchConfig> {
        let mut config = match &self.config {
            Some(path) => PatchConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PatchConfig::default(),
        };

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = Some(output);
        }
        if let Some(address) = self.address {
            config.address = address;
        }
        if let Some(offset) = self.offset {
            config.offset = offset;
        }
        config.dry_run |= self.dry_run;
        Ok(config)
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    genesis_patcher::init_logging(cli.verbose);

    let config = cli.into_config()?;
    tracing::debug!(?config, "resolved patch configuration");

    let (report, output) = patch::run(&config)
        .with_context(|| format!("patching fixture {}", config.input.display()))?;

    let report_json = serde_json::to_string(&report).context("serializing patch report")?;
    tracing::info!(report = %report_json, "patched account data");

    if config.dry_run {
        println!("dry run: would write {}", output.display());
    } else {
        println!("wrote {}", output.display());
    }
    Ok(())
}
