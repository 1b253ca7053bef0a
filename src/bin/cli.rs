//! tow-quote command line
//!
//! Loads the page data, lists service options or replays a scripted
//! interaction against the quote controller and submits the result.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tow_quote::{Catalog, ControllerOptions, HttpTransport, QuoteController, ScriptStep, SubmitTime};

#[derive(Parser)]
#[command(name = "tow-quote")]
#[command(version)]
#[command(about = "Towing quote form controller", long_about = None)]
struct Cli {
    /// Log debug output (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the service options of each tow type in dropdown order
    Services {
        #[command(flatten)]
        data: DataArgs,

        /// Only this tow type
        #[arg(long, value_name = "KEY")]
        tow_type: Option<String>,
    },

    /// Replay an event script, then print the payload, the form or the quote
    Run {
        #[command(flatten)]
        data: DataArgs,

        /// JSON array of steps: {"handler", "params"} or {"event", "index", "value"}
        #[arg(long, short = 'e', value_name = "PATH")]
        events: PathBuf,

        /// Quote endpoint path or URL
        #[arg(long, default_value = "/calculate")]
        endpoint: String,

        /// Base URL a relative endpoint is joined onto
        #[arg(long, value_name = "URL", default_value = "http://127.0.0.1:5000")]
        base_url: String,

        /// Maximum number of service blocks
        #[arg(long, default_value = "3")]
        max_services: usize,

        /// Print the request body instead of sending it
        #[arg(long)]
        dry_run: bool,

        /// Print the rendered form instead of sending
        #[arg(long, conflicts_with = "dry_run")]
        render: bool,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Rendered quote page with embedded JSON script blocks
    #[arg(long, value_name = "PATH", conflicts_with_all = ["pricing", "cars", "modifiers"])]
    page: Option<PathBuf>,

    /// Pricing table JSON
    #[arg(long, value_name = "PATH", requires = "cars")]
    pricing: Option<PathBuf>,

    /// Vehicle make/model table JSON
    #[arg(long, value_name = "PATH", requires = "pricing")]
    cars: Option<PathBuf>,

    /// Dynamic modifiers JSON
    #[arg(long, value_name = "PATH", requires = "pricing")]
    modifiers: Option<PathBuf>,
}

async fn read(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

impl DataArgs {
    async fn load(&self) -> anyhow::Result<Catalog> {
        if let Some(page) = &self.page {
            return Ok(Catalog::from_page(&read(page).await?)?);
        }

        let (Some(pricing), Some(cars)) = (&self.pricing, &self.cars) else {
            bail!("Either --page or --pricing with --cars is required");
        };

        let modifiers = match &self.modifiers {
            Some(path) => Some(read(path).await?),
            None => None,
        };

        Ok(Catalog::from_json(
            &read(pricing).await?,
            &read(cars).await?,
            modifiers.as_deref(),
        )?)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Command::Services { data, tow_type } => {
            let catalog = data.load().await?;
            list_services(&catalog, tow_type.as_deref())
        }
        Command::Run {
            data,
            events,
            endpoint,
            base_url,
            max_services,
            dry_run,
            render,
        } => {
            let catalog = data.load().await?;
            let steps: Vec<ScriptStep> = serde_json::from_str(&read(&events).await?)
                .with_context(|| format!("Invalid event script {}", events.display()))?;

            let options = ControllerOptions::new()
                .endpoint(endpoint)
                .max_services(max_services);
            let url = options.endpoint_url(Some(&base_url));
            let mut controller = QuoteController::new(catalog, options);

            for (i, step) in steps.iter().enumerate() {
                match controller.apply(step) {
                    Ok(outcome) if !outcome.success => {
                        eprintln!("step {}: {}", i + 1, outcome.error.unwrap_or_default());
                    }
                    Ok(_) => {}
                    Err(e) => eprintln!("step {}: {}", i + 1, e),
                }
            }

            if render {
                print!("{}", controller.render().to_html());
            } else if dry_run {
                let payload = controller.snapshot(SubmitTime::now())?;
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                let transport = HttpTransport::new(url);
                let result = controller.submit(&transport).await?;
                println!("{}", result.text);
            }
            Ok(())
        }
    }
}

fn list_services(catalog: &Catalog, only: Option<&str>) -> anyhow::Result<()> {
    let tow_types: Vec<&str> = match only {
        Some(tow) if catalog.pricing.contains_tow_type(tow) => vec![tow],
        Some(tow) => bail!("Unknown tow type: {}", tow),
        None => catalog.pricing.tow_types().collect(),
    };

    for tow in tow_types {
        println!("{}:", tow);
        for option in catalog.pricing.options_for(tow).unwrap_or_default() {
            println!("  {:<24} {}", option.key, option.label);
        }
    }
    Ok(())
}
