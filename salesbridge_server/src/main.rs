use clap::Parser;
use salesbridge_server::cli::{Cli, Commands};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    salesbridge_server::init_tracing()?;
    let cli = Cli::parse();

    let cmd = cli.command.unwrap_or(Commands::Serve {
        host: "0.0.0.0".to_string(),
        port: 8080,
    });

    match cmd {
        Commands::Serve { host, port } => {
            let addr: SocketAddr = format!("{host}:{port}").parse()?;
            let config = salesbridge_core::config::PipelineConfig::from_env()?;
            let state = salesbridge_server::server::AppState::from_config(config);
            salesbridge_server::server::serve(addr, state).await?;
        }
        Commands::GmailToken {
            client_id,
            client_secret,
            port,
        } => {
            let refresh_token = salesbridge_server::bootstrap::run_gmail_consent_flow(
                &client_id,
                &client_secret,
                port,
            )
            .await?;
            println!("\n--- GMAIL API CREDENTIALS ---");
            println!("Your Refresh Token is: {refresh_token}");
            println!(
                "\nStore this value in Google Secret Manager with the name 'gmail-refresh-token'."
            );
            println!("Keep the client id and client secret stored alongside it.");
            println!("-----------------------------\n");
        }
    }

    Ok(())
}
