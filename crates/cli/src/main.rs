mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{cmd_apply, cmd_destroy, cmd_plan, cmd_read};
use output::{OutputFormat, print_error};

/// Default location of the persisted resource identity.
const DEFAULT_STATE_FILE: &str = "vmss.state.json";

/// vmss - Declarative virtual machine scale set reconciler
#[derive(Parser)]
#[command(name = "vmss")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Settings file (default: $SCALESET_CONFIG, then the user config directory)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Validate a spec and show the request it expands to (no remote calls)
  Plan {
    /// Path to the spec file (YAML or JSON)
    spec: PathBuf,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Create or update the scale set and wait until it is provisioned
  Apply {
    /// Path to the spec file (YAML or JSON)
    spec: PathBuf,

    /// File holding the resource identity
    #[arg(short, long, default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// Override the convergence timeout (e.g., "30m", "90s")
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Read the scale set back from the provider
  Read {
    /// File holding the resource identity
    #[arg(short, long, default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// Compare the remote scale set against this spec
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Request deletion of the scale set
  Destroy {
    /// File holding the resource identity
    #[arg(short, long, default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let config = cli.config.as_deref();
  match cli.command {
    Commands::Plan { spec, output } => cmd_plan(&spec, output),
    Commands::Apply {
      spec,
      state,
      timeout,
      output,
    } => cmd_apply(&spec, &state, config, timeout, output),
    Commands::Read { state, spec, output } => cmd_read(&state, spec.as_deref(), config, output),
    Commands::Destroy { state, output } => cmd_destroy(&state, config, output),
  }
}
