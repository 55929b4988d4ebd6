//! Interview credit subcommands for operators.
//!
//! Grants are how credits enter the system; starting an interview consumes
//! them.

use anyhow::{Result, bail};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use intervu_core::interview::repository::CreditLedger;
use intervu_infra::sqlite::credit::SqliteCreditLedger;
use intervu_infra::sqlite::pool::DatabasePool;
use intervu_types::credit::Credit;

/// Credit subcommands.
#[derive(Subcommand)]
pub enum CreditsCommand {
    /// Grant a batch of credits to a user.
    Grant {
        /// User id (the `sub` claim of their token).
        #[arg(long)]
        user: Uuid,

        /// Credit type: `specialized` or `basic_<minutes>min`.
        #[arg(long = "type", default_value = "basic_15min")]
        credit_type: String,

        /// Number of interviews in the batch.
        #[arg(long, default_value = "1")]
        count: u32,

        /// Days until the batch expires.
        #[arg(long, default_value = "30")]
        days: i64,

        /// Longest interview (minutes) the batch covers. Omit for any length.
        #[arg(long)]
        duration: Option<u32>,
    },

    /// List a user's credit batches, soonest expiry first.
    List {
        /// User id.
        #[arg(long)]
        user: Uuid,
    },
}

/// Handle a credits subcommand.
pub async fn handle_credits_command(
    cmd: CreditsCommand,
    pool: &DatabasePool,
    json: bool,
) -> Result<()> {
    let ledger = SqliteCreditLedger::new(pool.clone());
    match cmd {
        CreditsCommand::Grant {
            user,
            credit_type,
            count,
            days,
            duration,
        } => grant(&ledger, user, &credit_type, count, days, duration, json).await,
        CreditsCommand::List { user } => list(&ledger, user, json).await,
    }
}

/// Whether `credit_type` names a type interviews can consume.
pub fn is_valid_credit_type(credit_type: &str) -> bool {
    if credit_type == "specialized" {
        return true;
    }
    credit_type
        .strip_prefix("basic_")
        .and_then(|rest| rest.strip_suffix("min"))
        .is_some_and(|minutes| minutes.parse::<u32>().is_ok_and(|m| m > 0))
}

async fn grant(
    ledger: &SqliteCreditLedger,
    user: Uuid,
    credit_type: &str,
    count: u32,
    days: i64,
    duration: Option<u32>,
    json: bool,
) -> Result<()> {
    if !is_valid_credit_type(credit_type) {
        bail!("invalid credit type '{credit_type}' (expected 'specialized' or 'basic_<minutes>min')");
    }
    if count == 0 {
        bail!("--count must be at least 1");
    }
    if days <= 0 {
        bail!("--days must be positive");
    }

    let credit = Credit::grant(
        user,
        credit_type,
        count,
        duration,
        chrono::Duration::days(days),
    );
    ledger.grant(&credit).await?;
    tracing::info!(user_id = %user, credit_id = %credit.id, credit_type, count, "Credits granted");

    if json {
        println!("{}", serde_json::to_string_pretty(&credit)?);
    } else {
        println!();
        println!(
            "  {} Granted {} x {} to {}",
            style("ok").green(),
            style(count).bold(),
            style(credit_type).cyan(),
            style(user).cyan(),
        );
        println!(
            "  {}",
            style(format!("Expires {}", credit.expires_at.format("%Y-%m-%d %H:%M UTC"))).dim()
        );
        println!();
    }
    Ok(())
}

async fn list(ledger: &SqliteCreditLedger, user: Uuid, json: bool) -> Result<()> {
    let credits = ledger.list_credits(&user).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&credits)?);
        return Ok(());
    }

    if credits.is_empty() {
        println!();
        println!("  No credits for {}.", style(user).cyan());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Type").fg(Color::White),
        Cell::new("Remaining").fg(Color::White),
        Cell::new("Duration").fg(Color::White),
        Cell::new("Expires").fg(Color::White),
    ]);

    let now = chrono::Utc::now();
    for credit in &credits {
        let expires = credit.expires_at.format("%Y-%m-%d").to_string();
        table.add_row(vec![
            Cell::new(&credit.credit_type).fg(Color::Cyan),
            Cell::new(credit.remaining),
            Cell::new(
                credit
                    .duration_minutes
                    .map(|m| format!("{m} min"))
                    .unwrap_or_else(|| "any".to_string()),
            ),
            if credit.expires_at <= now {
                Cell::new(format!("{expires} (expired)")).fg(Color::DarkGrey)
            } else {
                Cell::new(expires)
            },
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
