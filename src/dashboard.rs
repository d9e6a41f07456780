use crate::echelons::{classify, Echelons};
use crate::models::tactical_data::{unfilled_counts, TacticalData};
use crate::models::team::{Team, TeamError};
use crate::models::team_images::{categorize_images, TeamImage};
use crate::tactics::TacticalSchema;
use diesel::SqliteConnection;
use serde::Serialize;
use std::collections::HashMap;

/// everything the team list needs
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub teams: Vec<Team>,
    /// team id -> number of tactical entries nobody has filled in
    pub unfilled: HashMap<i32, usize>,
}

impl Dashboard {
    pub fn load(conn: &mut SqliteConnection) -> Result<Self, diesel::result::Error> {
        Ok(Self {
            teams: Team::all(conn)?,
            unfilled: unfilled_counts(conn)?,
        })
    }

    pub fn echelons(&self) -> Echelons<'_, Team> {
        classify(&self.teams)
    }

    pub fn unfilled_for(&self, team_id: i32) -> usize {
        self.unfilled.get(&team_id).copied().unwrap_or(0)
    }
}

/// one team with its tactical entries and images grouped by checklist category
#[derive(Debug, Serialize)]
pub struct TeamSheet {
    pub team: Team,
    pub tactics: Vec<(String, Vec<TacticalData>)>,
    pub images: Vec<(String, Vec<TeamImage>)>,
}

pub fn team_sheet(
    id: i32,
    schema: &TacticalSchema,
    conn: &mut SqliteConnection,
) -> Result<TeamSheet, TeamError> {
    let team = Team::get_existing(id, conn)?;
    let tactics = schema.categorize(team.tactical_data(conn)?, |d| d.category.as_str());
    let images = categorize_images(schema, team.images(conn)?);
    Ok(TeamSheet {
        team,
        tactics,
        images,
    })
}
