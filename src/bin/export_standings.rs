use clap::Parser;
use rmintel::config::CONFIG;
use rmintel::db::raw_diesel_cxn_from_env;
use rmintel::feeds::standings::{merge_standings, GroupRankFeed};
use rmintel::feeds::{load_snapshot, parse_document, FeedKind};
use rmintel::models::team::Team;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
/// Writes the current group standings to stdout as CSV
struct Args {
    /// Read standings from this file instead of the data directory's snapshot
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let feed: GroupRankFeed = match &args.file {
        Some(p) => parse_document(&std::fs::read_to_string(p)?),
        None => load_snapshot(&CONFIG.data_dir, FeedKind::GroupRank),
    };
    let teams = {
        let mut conn = raw_diesel_cxn_from_env()?;
        Team::all(&mut conn)?
    };
    let standings = merge_standings(&feed, &teams);

    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record([
        "zone",
        "group",
        "position",
        "college",
        "team",
        "record",
        "wins",
        "losses",
        "opponent_score",
        "base_hp_diff",
        "outpost_hp_diff",
        "total_damage",
        "local_team_id",
    ])?;
    for zone in &standings.zones {
        for group in &zone.groups {
            for (i, rec) in group.teams.iter().enumerate() {
                wtr.write_record(&[
                    zone.name.clone(),
                    group.name.clone(),
                    (i + 1).to_string(),
                    rec.college_name.clone(),
                    rec.team_name.clone(),
                    rec.record.clone().unwrap_or_default(),
                    rec.wins.to_string(),
                    rec.losses.to_string(),
                    rec.opponent_score.to_string(),
                    rec.base_hp_diff.to_string(),
                    rec.outpost_hp_diff.to_string(),
                    rec.total_damage.to_string(),
                    standings
                        .team_id_for(rec)
                        .map(|id| id.to_string())
                        .unwrap_or_default(),
                ])?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}
