use std::net::{IpAddr, SocketAddr};

use clap::{Parser, Subcommand};

use budget_resilience::api::{EvaluateArgs, evaluate_args, run_http_server};
use budget_resilience::telemetry::init_tracing;

#[derive(Parser, Debug)]
#[command(
    name = "budget-resilience",
    about = "Budget health, pay alignment and income-shock resilience scoring"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON evaluation API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(long, default_value = "0.0.0.0")]
        bind: IpAddr,
    },
    /// Evaluate one budget and print the result as JSON
    Evaluate(EvaluateArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, bind } => {
            if let Err(e) = run_http_server(SocketAddr::new(bind, port)).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Evaluate(args) => {
            let response = match evaluate_args(args) {
                Ok(response) => response,
                Err(e) => {
                    eprintln!("Invalid input: {e}");
                    std::process::exit(1);
                }
            };
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Failed to serialize result: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
