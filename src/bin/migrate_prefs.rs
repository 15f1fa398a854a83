//! Run the legacy settings migration against a sled preference database.
//!
//! ```text
//! migrate_prefs <db-dir> [--dry-run]
//! ```
//!
//! Skipped rules are reported but never turn into a failing exit status: the
//! migration must not block whatever starts after it.

use anyhow::{Context, bail};
use pref_migrator::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut path = None;
    let mut dry_run = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--dry-run" => dry_run = true,
            "-h" | "--help" => {
                println!("usage: migrate_prefs <db-dir> [--dry-run]");
                return Ok(());
            }
            flag if flag.starts_with('-') => bail!("unknown option {}", flag),
            _ if path.is_some() => bail!("only one database directory may be given"),
            other => path = Some(other.to_string()),
        }
    }
    let Some(path) = path else {
        bail!("usage: migrate_prefs <db-dir> [--dry-run]");
    };

    let config = SledConfig::builder()
        .path(&path)
        .create_if_missing(false)
        .build();
    let db = SledPreferenceDatabase::open(&config)
        .with_context(|| format!("opening preference database at {}", path))?;

    let migrator = PreferenceMigrator::collect()
        .with_options(MigrationOptions::builder().dry_run(dry_run).build());
    let report = db.migrate(&migrator)?;

    for rule in &report.rules {
        match &rule.outcome {
            RuleOutcome::Applied(changes) => {
                println!("{:<26} applied", rule.rule);
                for change in changes {
                    println!("    {}", change);
                }
            }
            RuleOutcome::Unchanged => println!("{:<26} up to date", rule.rule),
            RuleOutcome::Skipped(reason) => println!("{:<26} skipped: {}", rule.rule, reason),
            RuleOutcome::Failed(error) => println!("{:<26} failed: {}", rule.rule, error),
        }
    }
    if report.dry_run {
        println!("dry run: no changes written");
    }
    Ok(())
}
