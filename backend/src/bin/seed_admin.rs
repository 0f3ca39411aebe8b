//! Seed the initial secretary account.
//!
//! The staff registration endpoints require an authenticated session, so a
//! fresh deployment needs one account created out of band:
//!
//! ```text
//! seed-admin --name "Fernanda Lima" --cpf 992.960.180-56 \
//!     --email fernanda@example.com --password change-me
//! ```

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use vetdesk::domain::staff::{StaffDraft, StaffRole};
use vetdesk::domain::{ErrorCode, StaffService};
use vetdesk::outbound::persistence::{DbPool, DieselStaffRepository, PoolConfig};

/// Create the first secretary account directly in the database.
#[derive(Debug, Parser)]
#[command(name = "seed-admin")]
struct Args {
    /// PostgreSQL connection string; falls back to `DATABASE_URL`.
    #[arg(long)]
    database_url: Option<String>,

    /// Full name of the secretary.
    #[arg(long)]
    name: String,

    /// CPF, punctuation allowed.
    #[arg(long)]
    cpf: String,

    /// Login email.
    #[arg(long)]
    email: String,

    /// Contact phone.
    #[arg(long)]
    phone: Option<String>,

    /// Initial password.
    #[arg(long)]
    password: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let args = Args::parse();

    let database_url = match &args.database_url {
        Some(url) => url.clone(),
        None => std::env::var("DATABASE_URL")
            .map_err(|_| std::io::Error::other("set --database-url or DATABASE_URL"))?,
    };
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("failed to build database pool: {e}")))?;
    let service = StaffService::new(Arc::new(DieselStaffRepository::new(pool)));

    let draft = StaffDraft::new(
        StaffRole::Secretary,
        &args.name,
        &args.cpf,
        Some(&args.email),
        args.phone.as_deref(),
        None,
        &args.password,
    )
    .map_err(|e| std::io::Error::other(format!("invalid account details: {e}")))?;

    match service.register(draft).await {
        Ok(account) => {
            info!(id = %account.id, email = ?account.email, "secretary account created");
            Ok(())
        }
        Err(error) if error.code() == ErrorCode::Conflict => {
            warn!(message = error.message(), "account already exists; nothing to do");
            Ok(())
        }
        Err(error) => Err(std::io::Error::other(format!(
            "failed to create account: {error}"
        ))),
    }
}
