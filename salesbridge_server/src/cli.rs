use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "salesbridge", version, about = "Salesforce → BigQuery sync bridge")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP trigger server (default if no subcommand given).
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value = "8080")]
        port: u16,
    },

    /// One-time interactive OAuth flow producing the Gmail refresh token.
    ///
    /// Store the printed value in Secret Manager as `gmail-refresh-token`
    /// before switching `NOTIFIER_BACKEND` to `gmail`.
    GmailToken {
        /// OAuth client id from the Google Cloud console.
        #[arg(long, env = "GMAIL_CLIENT_ID")]
        client_id: String,

        /// OAuth client secret.
        #[arg(long, env = "GMAIL_CLIENT_SECRET")]
        client_secret: String,

        /// Local port for the loopback redirect.
        #[arg(long, default_value = "8910")]
        port: u16,
    },
}
