use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::auth::TokenCodec;
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::types::Role;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a session token for a user id")]
    Issue {
        #[arg(long, help = "User id to place in the token")]
        user: String,
        #[arg(long, default_value = "USER", help = "USER or ADMIN")]
        role: Role,
        #[arg(long, help = "Lifetime in hours (defaults to the session TTL)")]
        ttl_hours: Option<i64>,
    },

    #[command(about = "Verify a session token and print its identity")]
    Verify {
        #[arg(help = "Token to verify")]
        token: String,
    },
}

pub fn handle(cmd: TokenCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let codec = TokenCodec::from_config(&config.security).context("JWT_SECRET must be set")?;

    match cmd {
        TokenCommands::Issue { user, role, ttl_hours } => {
            let ttl = match ttl_hours {
                Some(hours) => chrono::Duration::try_hours(hours)
                    .with_context(|| format!("--ttl-hours {} is out of range", hours))?,
                None => config.security.session_ttl(),
            };
            let token = codec.issue(&user, role, ttl)?;
            output_value(&output_format, "token", json!(token))
        }
        TokenCommands::Verify { token } => {
            let identity = codec
                .verify(&token)
                .context("token rejected")?
                .into_identity()
                .context("token payload rejected")?;
            output_value(
                &output_format,
                "identity",
                json!({
                    "subject": identity.subject,
                    "role": identity.role,
                    "issuedAt": identity.issued_at,
                    "expiresAt": identity.expires_at,
                }),
            )
        }
    }
}
