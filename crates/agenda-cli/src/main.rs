//! `agenda` CLI — query an appointments snapshot from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Would 09:30-10:30 collide with p1's agenda on 2024-01-10?
//! agenda check -i agenda.json --date 2024-01-10 --start 09:30 --end 10:30 --psychologist p1
//!
//! # Same, reading the snapshot from stdin and listing every collision
//! cat agenda.json | agenda check --date 2024-01-10 --start 09:30 --end 10:30 \
//!     --psychologist p1 --details
//!
//! # Free slots of at least 50 minutes within clinic hours
//! agenda free -i agenda.json --date 2024-01-10 --psychologist p1 --min-minutes 50
//!
//! # Permission table lookup
//! agenda can --role secretary --action view-reports
//! ```
//!
//! Set `RUST_LOG=agenda_engine=debug` to trace conflict decisions on stderr.

use std::io::{self, Read};
use std::process;

use agenda_engine::conflict::find_schedule_conflicts;
use agenda_engine::time::{format_time, parse_date};
use agenda_engine::{find_free_slots, has_permission, parse_snapshot, Action, Role, TimeRange};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Exit status for `check --fail-on-conflict` when the slot is taken.
const EXIT_CONFLICT: i32 = 2;

#[derive(Parser)]
#[command(
    name = "agenda",
    version,
    about = "Clinic agenda conflict checker"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a proposed booking conflicts with the agenda
    Check {
        /// Snapshot JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Day of the booking (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Start time (HH:mm)
        #[arg(long)]
        start: String,
        /// End time (HH:mm)
        #[arg(long)]
        end: String,
        /// Psychologist whose agenda is checked
        #[arg(long)]
        psychologist: String,
        /// The proposed entry is a blocked slot rather than a session
        #[arg(long)]
        block: bool,
        /// List every conflicting appointment
        #[arg(long)]
        details: bool,
        /// Print conflicts as JSON
        #[arg(long, conflicts_with = "details")]
        json: bool,
        /// Exit with status 2 when a conflict is found
        #[arg(long)]
        fail_on_conflict: bool,
    },
    /// List a psychologist's free slots for one day
    Free {
        /// Snapshot JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Day to inspect (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Psychologist whose agenda is inspected
        #[arg(long)]
        psychologist: String,
        /// Start of the working window (HH:mm)
        #[arg(long, default_value = "08:00")]
        day_start: String,
        /// End of the working window (HH:mm)
        #[arg(long, default_value = "20:00")]
        day_end: String,
        /// Only show slots at least this long
        #[arg(long, default_value_t = 0)]
        min_minutes: i64,
        /// Print slots as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up whether a role may perform an action
    Can {
        /// admin, psychologist or secretary
        #[arg(long)]
        role: String,
        /// e.g. book-appointment, block-time, view-reports
        #[arg(long)]
        action: String,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            input,
            date,
            start,
            end,
            psychologist,
            block,
            details,
            json,
            fail_on_conflict,
        } => {
            let raw = read_snapshot(input.as_deref())?;
            let snapshot = parse_snapshot(&raw).context("Failed to parse appointments snapshot")?;
            let day = parse_date(&date).context("Invalid --date")?;
            let proposed = TimeRange::parse(&start, &end).context("Invalid booking interval")?;

            let conflicts = find_schedule_conflicts(&snapshot, day, proposed, &psychologist, block);
            tracing::info!(%day, %proposed, psychologist = %psychologist, count = conflicts.len(), "checked booking");

            if json {
                println!("{}", serde_json::to_string_pretty(&conflicts)?);
            } else if conflicts.is_empty() {
                println!("free");
            } else {
                println!("conflict");
                if details {
                    for c in &conflicts {
                        let kind = if c.existing.kind.is_empty() {
                            "-"
                        } else {
                            c.existing.kind.as_str()
                        };
                        println!(
                            "  {} {} {} ({} min overlap)",
                            c.existing.range(),
                            c.existing.psychologist_id,
                            kind,
                            c.overlap_minutes
                        );
                    }
                }
            }

            if fail_on_conflict && !conflicts.is_empty() {
                process::exit(EXIT_CONFLICT);
            }
        }
        Commands::Free {
            input,
            date,
            psychologist,
            day_start,
            day_end,
            min_minutes,
            json,
        } => {
            let raw = read_snapshot(input.as_deref())?;
            let snapshot = parse_snapshot(&raw).context("Failed to parse appointments snapshot")?;
            let day = parse_date(&date).context("Invalid --date")?;
            let window =
                TimeRange::parse(&day_start, &day_end).context("Invalid working window")?;

            let slots: Vec<_> = find_free_slots(&snapshot, day, &psychologist, window)
                .into_iter()
                .filter(|s| s.duration_minutes >= min_minutes)
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                for slot in &slots {
                    println!(
                        "{}-{} ({} min)",
                        format_time(slot.start),
                        format_time(slot.end),
                        slot.duration_minutes
                    );
                }
            }
        }
        Commands::Can { role, action } => {
            let role: Role = role.parse().context("Invalid --role")?;
            let action: Action = action.parse().context("Invalid --action")?;
            if has_permission(role, action) {
                println!("allowed");
            } else {
                println!("denied");
            }
        }
    }

    Ok(())
}

/// Install a stderr subscriber driven by `RUST_LOG` (default: warnings only).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("agenda_engine=warn,agenda=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Snapshot JSON from `--input`, or from stdin when no file is given.
fn read_snapshot(path: Option<&str>) -> Result<String> {
    let Some(path) = path else {
        let mut raw = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut raw)
            .context("Failed to read snapshot from stdin")?;
        return Ok(raw);
    };
    std::fs::read_to_string(path).with_context(|| format!("Failed to read snapshot file: {path}"))
}
