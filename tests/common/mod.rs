#![allow(dead_code)]

use diesel::SqliteConnection;
use rmintel::db::{establish, run_migrations};
use rmintel::models::team::{NewTeam, Team};
use rmintel::tactics::TacticalSchema;

pub fn start_db() -> Result<SqliteConnection, anyhow::Error> {
    let mut db = establish(":memory:")?;
    run_migrations(&mut db).map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(db)
}

pub fn schema(json: &str) -> Result<TacticalSchema, anyhow::Error> {
    Ok(TacticalSchema::from_json_str(json)?)
}

/// two categories, four entries
pub fn small_schema() -> TacticalSchema {
    TacticalSchema::from_json_str(
        r#"[{"name": "英雄", "items": ["飞坡", "过洞"]}, {"name": "飞镖", "items": ["目标", "命中率"]}]"#,
    )
    .unwrap()
}

pub fn add_team(
    school: &str,
    team: &str,
    schema: &TacticalSchema,
    db: &mut SqliteConnection,
) -> Result<Team, anyhow::Error> {
    Ok(NewTeam::new(school, team).create(schema, db)?)
}
