//! Report persisted schedules that fail validation.
//! Resolution skips such rows at request time; run this after imports
//! or manual SQL edits to find them.
//!
//! Usage: audit-schedules [--tenant SLUG]
//!   --tenant SLUG  : Audit only this restaurant (optional, all if not specified)
//!
//! Exits with status 1 when at least one invalid schedule is found.

use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use menuboard_api::{
    db::tenant::active_slugs,
    middleware::tenant::is_valid_slug,
    services::{availability::compile, schedules::ScheduleService},
};

#[derive(Parser)]
#[command(name = "audit-schedules", about = "Find menu schedules that cannot be evaluated")]
struct Args {
    /// Restaurant slug to audit (optional, all if not specified)
    #[arg(long)]
    tenant: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable not set"))?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let tenants = match args.tenant {
        Some(slug) if is_valid_slug(&slug) => vec![slug],
        Some(slug) => anyhow::bail!("Invalid restaurant slug: {slug}"),
        None => active_slugs(&pool).await?,
    };
    tracing::info!("Auditing schedules for {} restaurant(s)", tenants.len());

    let mut invalid = 0usize;
    for slug in &tenants {
        let schedules = match ScheduleService::list_all(&pool, slug).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Could not load schedules for {}: {}", slug, e);
                continue;
            }
        };

        let (_, skipped) = compile(&schedules);
        for s in &skipped {
            println!("{slug}\t{}\t{}\t{}", s.id, s.code, s.reason);
        }
        tracing::info!("{}: {} schedule(s), {} invalid", slug, schedules.len(), skipped.len());
        invalid += skipped.len();
    }

    pool.close().await;
    verdict(invalid)
}

/// Turns the invalid-schedule count into the process outcome.
fn verdict(invalid: usize) -> anyhow::Result<()> {
    if invalid > 0 {
        anyhow::bail!("Found {invalid} invalid schedule(s)");
    }
    tracing::info!("All schedules valid");
    Ok(())
}
