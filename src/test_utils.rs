use crate::db::{establish, run_migrations};
use crate::models::team::{NewTeam, Team};
use crate::tactics::TacticalSchema;
use diesel::SqliteConnection;

pub fn setup_db() -> Result<SqliteConnection, anyhow::Error> {
    let mut db = establish(":memory:")?;
    run_migrations(&mut db).map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(db)
}

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

#[cfg(test)]
mod tests {
    use super::{add_team, setup_db, small_schema};
    use diesel::dsl::count;
    use diesel::prelude::*;

    #[test]
    fn test_database_init() -> anyhow::Result<()> {
        let mut db = setup_db()?;
        add_team("A大学", "A", &small_schema(), &mut db)?;
        let count = crate::schema::teams::table
            .select(count(crate::schema::teams::id))
            .get_result::<i64>(&mut db)?;
        assert_eq!(1, count);
        Ok(())
    }

    #[test]
    fn test_database_init_is_isolated() -> anyhow::Result<()> {
        // separate test to make sure the team from the previous test doesn't carry over
        let mut db = setup_db()?;
        add_team("A大学", "A", &small_schema(), &mut db)?;
        let count = crate::schema::teams::table
            .select(count(crate::schema::teams::id))
            .get_result::<i64>(&mut db)?;
        assert_eq!(1, count);
        Ok(())
    }
}
