use crate::constants::DEFAULT_GROUP;
use crate::models::tactical_data::{insert_bulk, NewTacticalData, TacticalData};
use crate::models::team_images::TeamImage;
use crate::schema::{tactical_data, team_images, teams};
use crate::tactics::TacticalSchema;
use crate::utils::epoch_timestamp;
use crate::{save_fn, update_fn};
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::info;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TeamError {
    #[error("No team with id {0}")]
    NotFound(i32),
    #[error("Team {school} - {team} already exists")]
    AlreadyExists { school: String, team: String },
    #[error("No image with id {0}")]
    ImageNotFound(i32),
    #[error("No tactical entry with id {0}")]
    EntryNotFound(i32),
    #[error("Database error: {0}")]
    DBError(#[from] diesel::result::Error),
}

#[derive(Queryable, Identifiable, AsChangeset, Debug, Serialize, Clone, PartialEq)]
#[diesel(table_name = teams, treat_none_as_null = true)]
pub struct Team {
    pub id: i32,
    pub school: String,
    pub team: String,
    pub rank: Option<i32>,
    /// examination rank; this is what echelons are computed from
    pub rank_exam: Option<i32>,
    pub money: Option<i32>,
    pub comment: Option<String>,
    #[diesel(column_name = team_group)]
    pub group: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Team {
    pub fn get_by_id(id: i32, conn: &mut SqliteConnection) -> Result<Option<Self>, diesel::result::Error> {
        teams::table.find(id).first(conn).optional()
    }

    /// like [Team::get_by_id] but a missing team is an error
    pub fn get_existing(id: i32, conn: &mut SqliteConnection) -> Result<Self, TeamError> {
        Self::get_by_id(id, conn)?.ok_or(TeamError::NotFound(id))
    }

    pub fn get_by_school_and_team(
        school: &str,
        team: &str,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Self>, diesel::result::Error> {
        teams::table
            .filter(teams::school.eq(school))
            .filter(teams::team.eq(team))
            .first(conn)
            .optional()
    }

    /// all teams, in creation order
    pub fn all(conn: &mut SqliteConnection) -> Result<Vec<Self>, diesel::result::Error> {
        teams::table.order(teams::id.asc()).load(conn)
    }

    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_GROUP)
    }

    pub fn tactical_data(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Vec<TacticalData>, diesel::result::Error> {
        TacticalData::for_team(self.id, conn)
    }

    pub fn images(&self, conn: &mut SqliteConnection) -> Result<Vec<TeamImage>, diesel::result::Error> {
        TeamImage::for_team(self.id, conn)
    }

    /// deletes this team along with all of its tactical data and images
    pub fn delete(self, conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
        conn.transaction(|conn| {
            let entries = diesel::delete(tactical_data::table.filter(tactical_data::team_id.eq(self.id)))
                .execute(conn)?;
            let images =
                diesel::delete(team_images::table.filter(team_images::team_id.eq(self.id))).execute(conn)?;
            diesel::delete(teams::table.find(self.id)).execute(conn)?;
            info!(
                "Deleted team {} - {} ({entries} tactical entries, {images} images)",
                self.school, self.team
            );
            Ok(())
        })
    }

    update_fn! {}
}

/// sets the group of every team that doesn't have one to the default. returns how many were updated
pub fn backfill_groups(conn: &mut SqliteConnection) -> Result<usize, diesel::result::Error> {
    let updated = diesel::update(teams::table.filter(teams::team_group.is_null()))
        .set(teams::team_group.eq(DEFAULT_GROUP))
        .execute(conn)?;
    if updated > 0 {
        info!("Set default group {DEFAULT_GROUP} on {updated} teams");
    }
    Ok(updated)
}

pub fn delete_team(id: i32, conn: &mut SqliteConnection) -> Result<(), TeamError> {
    let team = Team::get_existing(id, conn)?;
    team.delete(conn)?;
    Ok(())
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = teams)]
pub struct NewTeam {
    pub school: String,
    pub team: String,
    pub rank: Option<i32>,
    pub rank_exam: Option<i32>,
    pub money: Option<i32>,
    pub comment: Option<String>,
    pub team_group: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl NewTeam {
    pub fn new<S: Into<String>>(school: S, team: S) -> Self {
        let now = epoch_timestamp();
        Self {
            school: school.into(),
            team: team.into(),
            rank: None,
            rank_exam: None,
            money: None,
            comment: None,
            team_group: Some(DEFAULT_GROUP.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn ranks(mut self, rank: Option<i32>, rank_exam: Option<i32>) -> Self {
        self.rank = rank;
        self.rank_exam = rank_exam;
        self
    }

    pub fn money(mut self, money: Option<i32>) -> Self {
        self.money = money;
        self
    }

    pub fn comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = Some(comment.into());
        self
    }

    save_fn!(teams::table, Team);

    /// saves the team and gives it an empty tactical entry for every (category, item) in the
    /// checklist. fails with [TeamError::AlreadyExists] if the (school, team) pair is taken
    pub fn create(&self, schema: &TacticalSchema, conn: &mut SqliteConnection) -> Result<Team, TeamError> {
        conn.transaction(|conn| {
            if Team::get_by_school_and_team(&self.school, &self.team, conn)?.is_some() {
                return Err(TeamError::AlreadyExists {
                    school: self.school.clone(),
                    team: self.team.clone(),
                });
            }
            let team = self.save(conn)?;
            let entries = schema
                .keys()
                .map(|k| NewTacticalData::new(team.id, &k))
                .collect::<Vec<_>>();
            insert_bulk(&entries, conn)?;
            info!(
                "Created team {} - {} with {} tactical entries",
                team.school,
                team.team,
                entries.len()
            );
            Ok(team)
        })
    }
}
