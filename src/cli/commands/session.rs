use clap::Subcommand;
use serde_json::json;

use crate::auth::{CookieSessionStore, SessionKeys};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum SessionCommands {
    #[command(about = "Mint a session token for an address (development and testing)")]
    Issue {
        #[arg(help = "Wallet address the session proves")]
        address: String,
        #[arg(long, default_value_t = 1, help = "Chain id recorded in the claim")]
        chain_id: u64,
        #[arg(long, help = "Token lifetime in hours (defaults to SESSION_TTL_HOURS)")]
        ttl_hours: Option<u64>,
    },

    #[command(about = "Verify a session token and show its claim")]
    Inspect {
        #[arg(help = "Session token (cookie value)")]
        token: String,
    },
}

pub async fn handle(cmd: SessionCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session_config = &config::config().session;

    match cmd {
        SessionCommands::Issue { address, chain_id, ttl_hours } => {
            let ttl_hours = ttl_hours.unwrap_or(session_config.ttl_hours);
            let keys = SessionKeys::from_secret(&session_config.secret, ttl_hours)?;
            let store = CookieSessionStore::new(session_config.cookie_name.clone(), keys);
            let token = store.keys().issue(&address, chain_id)?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    &format!("Issued session for {}", address),
                    Some(json!({
                        "token": token,
                        "cookie": store.set_cookie_header(&token),
                        "expires_in_hours": ttl_hours,
                    })),
                ),
                OutputFormat::Text => {
                    println!("{}", store.set_cookie_header(&token));
                    Ok(())
                }
            }
        }
        SessionCommands::Inspect { token } => {
            let keys = SessionKeys::from_config(session_config)?;
            let claims = keys.decode(&token)?;
            let address = claims
                .address()
                .ok_or_else(|| anyhow::anyhow!("Session carries no SIWE address"))?;

            output_success(
                &output_format,
                &format!("Valid session for {}", address),
                Some(json!({
                    "siwe": claims.siwe,
                    "issued_at": claims.iat,
                    "expires_at": claims.exp,
                })),
            )
        }
    }
}
