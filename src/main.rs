use std::sync::Arc;

use clap::{Parser, Subcommand};
use futures::StreamExt;

use decoy_honeypot::monitor::{AlertSink, HttpAlertSink};
use decoy_honeypot::{
    generate, receiver, AlertEvent, DataCategory, MonitorConfig, ReceiverConfig, Result,
    RowStreamEngine, RuntimeConfig, StreamConfigUpdate, DEFAULT_ALERT_ENDPOINT,
};

#[derive(Parser)]
#[command(
    name = "honeypot",
    about = "Decoy sensitive data and access alerting"
)]
struct Cli {
    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the alert receiver service
    Listen {
        #[arg(long, env = "HONEYPOT_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "HONEYPOT_PORT", default_value_t = 8080)]
        port: u16,
        /// Alert journal file (newline-delimited JSON)
        #[arg(long, env = "HONEYPOT_JOURNAL", default_value = "honeypot_alerts.json")]
        journal: String,
        /// Forward every received alert to this webhook
        #[arg(long, env = "HONEYPOT_WEBHOOK_URL")]
        webhook: Option<String>,
    },
    /// Print generated fake values
    Generate {
        /// ssn, credit_card, api_key, password, email, phone, mixed
        #[arg(short, long, default_value = "mixed")]
        category: DataCategory,
        /// First seed
        #[arg(short, long, default_value_t = 1, allow_hyphen_values = true)]
        seed: i64,
        /// Number of consecutive seeds
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
    /// Print decoy rows as JSON lines
    Stream {
        #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
        start_id: i64,
        /// Row cap (0 = unbounded)
        #[arg(long, default_value_t = 10)]
        max_rows: u32,
        /// Delay before each row, 0..=1000 ms
        #[arg(long, default_value_t = 0)]
        delay_ms: u32,
        /// Perturb ids through the LCG
        #[arg(long)]
        randomize: bool,
    },
    /// Send one test alert and wait for the outcome
    Alert {
        #[arg(long, default_value = DEFAULT_ALERT_ENDPOINT)]
        endpoint: String,
        #[arg(long, default_value = "honeypot_test")]
        table: String,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        client: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("[honeypot] {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Listen {
            host,
            port,
            journal,
            webhook,
        } => {
            let config = ReceiverConfig {
                host,
                port,
                journal_path: journal,
                webhook_url: webhook,
                ..Default::default()
            };
            receiver::serve(&config, shutdown_signal()).await
        }
        Commands::Generate {
            category,
            seed,
            count,
        } => {
            for offset in 0..i64::from(count) {
                println!("{}", generate(seed.wrapping_add(offset), category));
            }
            Ok(())
        }
        Commands::Stream {
            start_id,
            max_rows,
            delay_ms,
            randomize,
        } => {
            let config = Arc::new(RuntimeConfig::default());
            config.set_stream_config(
                StreamConfigUpdate::default()
                    .max_rows(max_rows)
                    .delay_ms(delay_ms)
                    .randomize(randomize),
            )?;

            let mut rows = RowStreamEngine::new(config).stream_rows(start_id);
            while let Some(row) = rows.next().await {
                println!("{}", serde_json::to_string(&row)?);
            }
            Ok(())
        }
        Commands::Alert {
            endpoint,
            table,
            user,
            client,
        } => {
            let sink = HttpAlertSink::new(&MonitorConfig::default())?;
            let alert = AlertEvent::new(&table, user.as_deref(), client.as_deref());
            sink.deliver(&endpoint, &alert).await?;
            println!("alert for '{}' delivered to {}", table, endpoint);
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down honeypot receiver...");
}
