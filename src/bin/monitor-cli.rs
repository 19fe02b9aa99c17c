use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "monitor-cli")]
#[command(about = "Command-line client for the service monitor API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check monitor status
    Status,
    /// List monitored services
    Services,
    /// Run one cycle and print its report
    Check,
    /// Start one cycle in the background
    Run,
    /// List database connection configs
    Databases,
    /// Show one database connection config
    Database {
        id: i64,
    },
    /// Show recent health records
    Results {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Only records for this service id
        #[arg(short, long)]
        service: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => {
            client.get(format!("{}/api/monitoring/status", base)).send().await?
        }
        Commands::Services => {
            client.get(format!("{}/api/monitoring/services", base)).send().await?
        }
        Commands::Check => {
            client.post(format!("{}/api/monitoring/check", base)).send().await?
        }
        Commands::Run => {
            client.post(format!("{}/api/monitoring/run", base)).send().await?
        }
        Commands::Databases => {
            client.get(format!("{}/api/monitoring/databases", base)).send().await?
        }
        Commands::Database { id } => {
            client.get(format!("{}/api/monitoring/databases/{}", base, id)).send().await?
        }
        Commands::Results { limit, service } => {
            let mut query = vec![("limit", limit.to_string())];
            if let Some(id) = service {
                query.push(("service_id", id.to_string()));
            }
            client
                .get(format!("{}/api/monitoring/results", base))
                .query(&query)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: monitor API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
