use clap::Parser;
use rmintel::config::CONFIG;
use rmintel::db::{raw_diesel_cxn_from_env, run_migrations};
use rmintel::reconcile::{plan_all, reconcile_all};
use rmintel::tactics::TacticalSchema;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
/// Brings every team's tactical entries in line with the checklist
struct Args {
    /// Checklist JSON file to use instead of the configured one
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Print what would change without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let schema = match &args.schema {
        Some(p) => TacticalSchema::from_json_file(p)?,
        None => CONFIG.tactical_schema()?,
    };
    let mut conn = raw_diesel_cxn_from_env()?;
    run_migrations(&mut conn).map_err(|e| anyhow::anyhow!("Error running migrations: {e}"))?;

    if args.dry_run {
        let plans = plan_all(&schema, &mut conn)?;
        for (team, plan) in plans.iter().filter(|(_, p)| !p.is_noop()) {
            println!(
                "{} - {}: would add {}, would delete {}",
                team.school,
                team.team,
                plan.to_add.len(),
                plan.to_delete.len()
            );
            for k in &plan.to_add {
                println!("    + {}: {}", k.category, k.item);
            }
        }
        let (adds, deletes) = plans.iter().fold((0, 0), |(a, d), (_, p)| {
            (a + p.to_add.len(), d + p.to_delete.len())
        });
        println!("{} teams, {adds} to add, {deletes} to delete", plans.len());
        return Ok(());
    }

    let summary = reconcile_all(&schema, &mut conn)?;
    for t in &summary.teams {
        println!(
            "{} - {}: added {}, deleted {}",
            t.school, t.team, t.added, t.deleted
        );
    }
    println!(
        "Added {}, deleted {}",
        summary.total_added, summary.total_deleted
    );
    Ok(())
}
