//! Switchboard - route a question through supervisor, researcher and coder agents
//!
//! Entry point with three modes:
//! - **serve** (default, `web` feature): run the HTTP server
//! - **ask**: run one query in-process and print the result as JSON
//! - **sample-config**: print a documented `.switchboard.toml`

use anyhow::Context;
use switchboard_core::{build_invoker, load_config, sample_config, Workflow};

/// Command-line arguments
enum Args {
    /// Start the HTTP server, optionally overriding the port
    Serve { port: Option<u16> },
    /// Run a single query
    Ask { query: String },
    /// Print a sample configuration file
    SampleConfig,
    /// Print usage
    Help,
}

impl Args {
    /// Parse command-line arguments
    fn parse() -> anyhow::Result<Self> {
        let mut args = std::env::args().skip(1);

        let Some(command) = args.next() else {
            return Ok(Args::Serve { port: None });
        };

        match command.as_str() {
            "serve" => {
                let mut port = None;
                while let Some(arg) = args.next() {
                    match arg.as_str() {
                        "--port" | "-p" => {
                            let value = args.next().context("--port needs a value")?;
                            port = Some(value.parse().context("invalid port")?);
                        }
                        _ => anyhow::bail!("unknown argument for serve: {}", arg),
                    }
                }
                Ok(Args::Serve { port })
            }
            "ask" => {
                let query = args.collect::<Vec<_>>().join(" ");
                if query.trim().is_empty() {
                    anyhow::bail!("ask needs a query, e.g. switchboard ask \"What is 17 * 4?\"");
                }
                Ok(Args::Ask { query })
            }
            "sample-config" => Ok(Args::SampleConfig),
            "help" | "--help" | "-h" => Ok(Args::Help),
            other => anyhow::bail!("unknown command: {} (try --help)", other),
        }
    }
}

const USAGE: &str = "\
Usage: switchboard [COMMAND]

Commands:
  serve [--port N]   Run the HTTP server (default)
  ask <query...>     Run one query and print the result as JSON
  sample-config      Print a sample .switchboard.toml
  help               Show this message
";

fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply
    dotenv::dotenv().ok();

    match Args::parse()? {
        Args::Help => {
            print!("{}", USAGE);
            Ok(())
        }
        Args::SampleConfig => {
            print!("{}", sample_config());
            Ok(())
        }
        Args::Ask { query } => ask(&query),
        Args::Serve { port } => serve(port),
    }
}

/// Run one query against the configured provider
fn ask(query: &str) -> anyhow::Result<()> {
    init_cli_tracing();

    let config = load_config(&std::env::current_dir()?)?;
    let invoker = build_invoker(&config)?;
    let workflow = Workflow::with_prompts(invoker, config.prompts.clone());

    let result = workflow.run(query)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Logs go to stderr so stdout stays valid JSON
fn init_cli_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("switchboard_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "web")]
fn serve(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = load_config(&std::env::current_dir()?)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(switchboard_server::run_server(config))
}

#[cfg(not(feature = "web"))]
fn serve(_port: Option<u16>) -> anyhow::Result<()> {
    anyhow::bail!("this build has no HTTP server; rebuild with the `web` feature or use `ask`")
}
