use crate::models::team::TeamError;
use crate::schema::tactical_data;
use crate::save_fn;
use crate::tactics::TacticalKey;
use crate::utils::epoch_timestamp;
use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Queryable, Identifiable, Debug, Serialize, Clone, PartialEq)]
#[diesel(table_name = tactical_data)]
pub struct TacticalData {
    pub id: i32,
    pub team_id: i32,
    pub category: String,
    pub item: String,
    /// empty means nobody has filled this in yet
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TacticalData {
    pub fn key(&self) -> TacticalKey {
        TacticalKey::new(self.category.as_str(), self.item.as_str())
    }

    pub fn is_filled(&self) -> bool {
        !self.content.is_empty()
    }

    pub fn get_by_id(id: i32, conn: &mut SqliteConnection) -> Result<Option<Self>, diesel::result::Error> {
        tactical_data::table.find(id).first(conn).optional()
    }

    /// ordered by id, i.e. creation order
    pub fn for_team(team_id: i32, conn: &mut SqliteConnection) -> Result<Vec<Self>, diesel::result::Error> {
        tactical_data::table
            .filter(tactical_data::team_id.eq(team_id))
            .order(tactical_data::id.asc())
            .load(conn)
    }

    /// every entry for every team, ordered by id
    pub fn all(conn: &mut SqliteConnection) -> Result<Vec<Self>, diesel::result::Error> {
        tactical_data::table.order(tactical_data::id.asc()).load(conn)
    }
}

/// number of unfilled entries per team id. teams with no unfilled entries are absent
pub fn unfilled_counts(conn: &mut SqliteConnection) -> Result<HashMap<i32, usize>, diesel::result::Error> {
    let team_ids: Vec<i32> = tactical_data::table
        .filter(tactical_data::content.eq(""))
        .select(tactical_data::team_id)
        .load(conn)?;
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for id in team_ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    Ok(counts)
}

pub fn update_content(id: i32, content: &str, conn: &mut SqliteConnection) -> Result<(), TeamError> {
    let updated = diesel::update(tactical_data::table.find(id))
        .set((
            tactical_data::content.eq(content),
            tactical_data::updated_at.eq(epoch_timestamp()),
        ))
        .execute(conn)?;
    match updated {
        0 => Err(TeamError::EntryNotFound(id)),
        _ => Ok(()),
    }
}

/// removes a single entry. the team keeps the rest of its checklist
pub fn delete_entry(id: i32, conn: &mut SqliteConnection) -> Result<TacticalData, TeamError> {
    let entry = TacticalData::get_by_id(id, conn)?.ok_or(TeamError::EntryNotFound(id))?;
    diesel::delete(tactical_data::table.find(id)).execute(conn)?;
    Ok(entry)
}

pub fn insert_bulk(
    entries: &Vec<NewTacticalData>,
    conn: &mut SqliteConnection,
) -> Result<usize, diesel::result::Error> {
    if entries.is_empty() {
        return Ok(0);
    }
    diesel::insert_into(tactical_data::table)
        .values(entries)
        .execute(conn)
}

pub fn delete_bulk(ids: &[i32], conn: &mut SqliteConnection) -> Result<usize, diesel::result::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    diesel::delete(tactical_data::table.filter(tactical_data::id.eq_any(ids))).execute(conn)
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = tactical_data)]
pub struct NewTacticalData {
    team_id: i32,
    category: String,
    item: String,
    content: String,
    created_at: i64,
    updated_at: i64,
}

impl NewTacticalData {
    /// a new, empty entry
    pub fn new(team_id: i32, key: &TacticalKey) -> Self {
        let now = epoch_timestamp();
        Self {
            team_id,
            category: key.category.clone(),
            item: key.item.clone(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn content<S: Into<String>>(mut self, content: S) -> Self {
        self.content = content.into();
        self
    }

    save_fn!(tactical_data::table, TacticalData);
}
