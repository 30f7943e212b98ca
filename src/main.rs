use anyhow::Result;
use clap::{Parser, Subcommand};

use txdash::{cli, config, logging, web};

#[derive(Debug, Parser)]
#[command(name = "txdash")]
#[command(about = "FM transmitter telemetry dashboard")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the dashboard server with simulated telemetry
    Serve {
        /// Listen address (overrides server.addr)
        #[arg(long)]
        addr: Option<String>,
        /// Do not start the signal generators
        #[arg(long)]
        no_simulation: bool,
        /// Append a drifted reading to the store periodically
        #[arg(long)]
        drift: bool,
        /// Open the dashboard in the default browser
        #[arg(long)]
        open: bool,
        /// Seed for the generators' random source
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the latest reading from a running dashboard
    Status {
        /// Base URL of the dashboard
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        url: String,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show one value in every meter design
    Designs {
        #[arg(long, default_value = "1500", allow_hyphen_values = true)]
        value: f64,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        min: f64,
        #[arg(long, default_value = "2000", allow_hyphen_values = true)]
        max: f64,
    },
    /// Inspect or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config file to ~/.txdash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value by dotted key, e.g. `server.addr 0.0.0.0:8080`
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let mut config = config::load();

    match app.command {
        Commands::Serve {
            addr,
            no_simulation,
            drift,
            open,
            seed,
        } => {
            if let Some(addr) = addr {
                config.server.addr = addr;
            }
            if no_simulation {
                config.simulation.enabled = false;
            }
            if drift {
                config.drift.enabled = true;
            }
            if open {
                config.server.open_browser = true;
            }
            if seed.is_some() {
                config.simulation.seed = seed;
            }
            logging::init_logging(&config.logging.level);
            web::run(&config)
        }
        Commands::Status { url, format } => {
            logging::init_logging(&config.logging.level);
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_status(&url, fmt)
        }
        Commands::Designs { value, min, max } => cli::run_designs(value, min, max),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
