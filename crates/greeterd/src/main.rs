//! Greeter daemon - entry point.
//!
//! Resolves configuration, initialises logging, runs the server until a
//! shutdown signal arrives, and translates a returned error into a
//! non-zero exit code. This is the only place allowed to terminate the
//! process.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greeter_config::{AppConfig, Environment};
use greeter_server::Server;

/// Command-line arguments.
struct Args {
    /// Listen host override.
    host: Option<String>,
    /// Listen port override.
    port: Option<u16>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut host = None;
        let mut port = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--host" => {
                    host = args.next();
                    if host.is_none() {
                        eprintln!("--host requires a value");
                        std::process::exit(1);
                    }
                }
                "--port" | "-p" => match args.next().map(|v| v.parse::<u16>()) {
                    Some(Ok(value)) => port = Some(value),
                    _ => {
                        eprintln!("--port requires a number between 0 and 65535");
                        std::process::exit(1);
                    }
                },
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("greeterd {}", env!("CARGO_PKG_VERSION"));
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { host, port }
    }
}

fn print_help() {
    println!(
        r"Greeter daemon - minimal greeting HTTP server

USAGE:
    greeterd [OPTIONS]

OPTIONS:
        --host <HOST>    Host to bind to (default: 0.0.0.0)
    -p, --port <PORT>    Port to bind to (default: 18080)
    -h, --help           Print help information
    -v, --version        Print version information

ENVIRONMENT VARIABLES:
    GREETER_HOST    Listen host (default: 0.0.0.0)
    GREETER_PORT    Listen port (default: 18080)
    GREETER_ENV     Runtime environment, 'development' or 'production'
                    (default: development); selects the log format

A .env file in the working directory is loaded if present.

EXAMPLES:
    # Run on the default port
    greeterd

    # Run on a custom port with JSON logs
    GREETER_ENV=production greeterd --port 8080
"
    );
}

/// Initialises the tracing subscriber.
///
/// Development gets human-readable output; production gets JSON lines.
fn init_tracing(env: Environment) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "greeterd=info,greeter_server=info,warn".into());

    match env {
        Environment::Development => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
        Environment::Production => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine; a present one feeds the lookups below.
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet; this goes straight to stderr.
            eprintln!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    init_tracing(config.env);

    info!(
        host = %config.host,
        port = config.port,
        environment = %config.env,
        "starting greeterd v{}",
        env!("CARGO_PKG_VERSION")
    );

    let server = Server::builder()
        .host(config.host)
        .port(config.port)
        .build();

    if let Err(e) = server.run().await {
        error!(error = %e, "server terminated with error");
        std::process::exit(1);
    }

    info!("server shut down cleanly");
}
