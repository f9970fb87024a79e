//! secure-api-client - command line front end
//!
//! Sends one request through the full client pipeline and prints the result
//! together with the metrics summary.

#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secure_api_client::utils::logging::init_logging;
use secure_api_client::{
    Config, HttpMethod, RequestOptions, SecureApiClient, SessionProvider, StaticSessionProvider,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "secure-api-client", version, about = "Resilient JSON API client")]
struct Cli {
    /// YAML configuration file; environment variables are used when absent
    #[arg(short, long, env = "SECURE_API_CLIENT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Send a single request
    Request {
        /// GET, POST, PUT, PATCH or DELETE
        method: HttpMethod,
        /// Endpoint path relative to the API root, e.g. /accounts
        endpoint: String,
        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,
        /// Do not attach the Authorization header
        #[arg(long)]
        skip_auth: bool,
        /// Bearer token
        #[arg(long, env = "API_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Load and validate the configuration, then print it as YAML
    CheckConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::from_env().context("loading configuration from environment")?,
    };
    Ok(config)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_ref()).await?;
    init_logging(&config.logging).context("initializing logging")?;

    match cli.command {
        Commands::CheckConfig => {
            print!("{}", config.to_yaml()?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Request {
            method,
            endpoint,
            data,
            skip_auth,
            token,
        } => {
            let body = data
                .as_deref()
                .map(serde_json::from_str::<serde_json::Value>)
                .transpose()
                .context("--data is not valid JSON")?;

            let mut builder = SecureApiClient::builder(config);
            if let Some(token) = token {
                let provider: Arc<dyn SessionProvider> =
                    Arc::new(StaticSessionProvider::from_token(token));
                builder = builder.session_provider(provider);
            }
            let client = builder.build().context("building client")?;

            let mut options = RequestOptions::new();
            if skip_auth {
                options = options.skip_auth();
            }

            info!(%method, %endpoint, "Sending request");
            let result = client.request(method, &endpoint, body, options).await;
            let code = match &result {
                Ok(success) => {
                    println!("{}", serde_json::to_string_pretty(success)?);
                    ExitCode::SUCCESS
                }
                Err(error) => {
                    println!("{}", serde_json::to_string_pretty(error)?);
                    ExitCode::FAILURE
                }
            };

            eprintln!(
                "{}",
                serde_json::to_string_pretty(&client.metrics_summary())?
            );
            client.shutdown().await;
            Ok(code)
        }
    }
}
