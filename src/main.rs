use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use adoption_simulator::{
    config::AppConfig,
    models::SimulationParams,
    store::{run_simulation, InstanceStore, RunOutcome},
    visualization::{
        print_instances_summary, print_params_table, print_series_table, print_text_chart,
        render_svg_chart,
    },
};

#[derive(Parser)]
#[command(
    name = "adoption-sim",
    about = "Adoption Simulator - configure, run and chart logistic user adoption curves",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Simulation endpoint URL (overrides the configuration file)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in seconds (overrides the configuration file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Chart,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more chained simulations and print the results
    Run {
        /// Market saturation M
        #[arg(short = 'M', long)]
        saturation: Option<f64>,

        /// Growth rate k
        #[arg(short = 'k', long)]
        growth_rate: Option<f64>,

        /// Initial users P(0) for the first year
        #[arg(short = 'B', long)]
        initial_users: Option<f64>,

        /// Duration in weeks
        #[arg(short, long)]
        duration: Option<u32>,

        /// Number of consecutive years; each starts from the previous year's final users
        #[arg(short, long, default_value = "1")]
        years: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Write the last year's chart as SVG to this path
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config,

    /// Start the web UI server
    #[cfg(feature = "web")]
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(url) = &cli.endpoint {
        config.endpoint.url = url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.endpoint.timeout_secs = Some(secs);
    }
    Ok(config)
}

fn run_years(config: &AppConfig, first: SimulationParams, years: u32) -> Result<InstanceStore> {
    let source = config.endpoint.client();
    let store = Mutex::new(InstanceStore::new(config.defaults));
    {
        let mut guard = store.lock().expect("store mutex poisoned");
        let id = guard.instances()[0].id;
        guard.update_params(id, first);
    }

    let system = actix_rt::System::new();
    system.block_on(async {
        for year in 1..=years.max(1) {
            let id = {
                let mut guard = store.lock().expect("store mutex poisoned");
                if year > 1 {
                    guard.add_instance()?
                } else {
                    guard.instances()[0].id
                }
            };
            match run_simulation(&store, &source, id).await {
                RunOutcome::Updated { .. } => {}
                _ => anyhow::bail!(
                    "Simulation request for year {year} failed (endpoint: {})",
                    source.endpoint()
                ),
            }
        }
        Ok(())
    })?;

    Ok(store.into_inner().expect("store mutex poisoned"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run {
            saturation,
            growth_rate,
            initial_users,
            duration,
            years,
            format,
            svg,
        } => {
            init_tracing("warn");
            let config = load_config(&cli)?;
            let defaults = config.defaults;
            let params = SimulationParams {
                saturation: saturation.unwrap_or(defaults.saturation),
                growth_rate: growth_rate.unwrap_or(defaults.growth_rate),
                initial_population: initial_users.unwrap_or(defaults.initial_population),
                duration: duration.unwrap_or(defaults.duration),
                step: defaults.step,
            };

            let store = run_years(&config, params, *years)?;

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(store.instances())?);
                }
                OutputFormat::Table => {
                    for (i, inst) in store.instances().iter().enumerate() {
                        println!("\n{}", format!("Year {}", i + 1).bold().cyan());
                        print_params_table(&inst.params);
                        print_series_table(inst);
                    }
                    print_instances_summary(store.instances());
                }
                OutputFormat::Chart => {
                    for (i, inst) in store.instances().iter().enumerate() {
                        println!("\n{}", format!("Year {}", i + 1).bold().cyan());
                        print_text_chart(&inst.data, 26);
                    }
                }
            }

            if let Some(path) = svg {
                let last = store
                    .last()
                    .context("No simulation instance to chart")?;
                std::fs::write(path, render_svg_chart(&last.data))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!(
                    "{} Wrote chart to {}",
                    "Success:".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Config => {
            let config = load_config(&cli)?;
            print!("{}", config.to_toml_string()?);
        }

        #[cfg(feature = "web")]
        Commands::Serve { host, port } => {
            init_tracing("info");
            let mut config = load_config(&cli)?;
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            actix_rt::System::new().block_on(adoption_simulator::web::start_server(config))?;
        }
    }

    Ok(())
}
