use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the contract gateway REST API", long_about = None)]
struct Cli {
    /// Base URL including the API prefix.
    #[arg(short, long, default_value = "http://localhost:5000/ethereum")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deposited balance of an address
    Balance { address: String },
    /// Ether held by the contract
    ContractBalance,
    /// Stored contract value
    Value,
    /// Whether the contract is paused
    Paused,
    /// Deposit ether (decimal string, e.g. 0.01)
    Deposit { amount: String },
    /// Withdraw ether (decimal string, e.g. 0.01)
    Withdraw { amount: String },
    /// Set the stored value
    SetValue { value: u64 },
    /// Pause or unpause the contract
    SetPaused {
        #[arg(action = clap::ArgAction::Set)]
        paused: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Balance { address } => client.get(format!("{}/balance/{}", base, address)),
        Commands::ContractBalance => client.get(format!("{}/contract-balance", base)),
        Commands::Value => client.get(format!("{}/value", base)),
        Commands::Paused => client.get(format!("{}/paused", base)),
        Commands::Deposit { amount } => client
            .post(format!("{}/deposit", base))
            .json(&json!({ "amount": amount })),
        Commands::Withdraw { amount } => client
            .post(format!("{}/withdraw", base))
            .json(&json!({ "amount": amount })),
        Commands::SetValue { value } => client
            .post(format!("{}/set-value", base))
            .json(&json!({ "value": value })),
        Commands::SetPaused { paused } => client
            .post(format!("{}/set-paused", base))
            .json(&json!({ "paused": paused })),
    };

    let res = request.send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body: Value = res.json().await.unwrap_or(Value::Null);

    if !status.is_success() {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no error message");
        eprintln!("Error ({}): {}", status, message);
        std::process::exit(1);
    }

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
