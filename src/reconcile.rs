//! Keeps every team's tactical entries in line with the checklist.
//!
//! After [reconcile_all] runs, each team has exactly one entry per (category, item) in the
//! [TacticalSchema] and nothing else. Entries whose key survives are never touched, so filled-in
//! notes are kept across checklist changes.

use crate::models::tactical_data::{delete_bulk, insert_bulk, NewTacticalData, TacticalData};
use crate::models::team::Team;
use crate::tactics::{TacticalKey, TacticalSchema};
use diesel::{Connection, SqliteConnection};
use itertools::Itertools;
use log::{debug, info};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct TeamReconcilePlan {
    /// keys the team has no entry for
    pub to_add: Vec<TacticalKey>,
    /// ids of entries whose key isn't in the checklist (or that duplicate an earlier entry)
    pub to_delete: Vec<i32>,
}

impl TeamReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_delete.is_empty()
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct TeamReconcileSummary {
    pub team_id: i32,
    pub school: String,
    pub team: String,
    pub added: usize,
    pub deleted: usize,
}

#[derive(Debug, Default, Serialize, Clone, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// only teams that actually changed
    pub teams: Vec<TeamReconcileSummary>,
    pub total_added: usize,
    pub total_deleted: usize,
}

impl ReconcileSummary {
    pub fn is_noop(&self) -> bool {
        self.total_added == 0 && self.total_deleted == 0
    }
}

/// works out what one team needs, without touching the database
pub fn plan(schema: &TacticalSchema, existing: &[TacticalData]) -> TeamReconcilePlan {
    plan_with_keys(schema, &schema.key_set(), existing)
}

fn plan_with_keys(
    schema: &TacticalSchema,
    valid: &HashSet<TacticalKey>,
    existing: &[TacticalData],
) -> TeamReconcilePlan {
    let mut seen: HashSet<TacticalKey> = HashSet::with_capacity(existing.len());
    let mut to_delete = vec![];
    // lowest id wins if a key shows up twice
    for entry in existing.iter().sorted_by_key(|e| e.id) {
        let key = entry.key();
        if !valid.contains(&key) || !seen.insert(key) {
            to_delete.push(entry.id);
        }
    }
    let to_add = schema.keys().filter(|k| !seen.contains(k)).collect();
    TeamReconcilePlan { to_add, to_delete }
}

/// the plan for every team, in team order. read-only
pub fn plan_all(
    schema: &TacticalSchema,
    conn: &mut SqliteConnection,
) -> Result<Vec<(Team, TeamReconcilePlan)>, diesel::result::Error> {
    let teams = Team::all(conn)?;
    let mut by_team: HashMap<i32, Vec<TacticalData>> = TacticalData::all(conn)?
        .into_iter()
        .into_group_map_by(|e| e.team_id);
    let valid = schema.key_set();
    Ok(teams
        .into_iter()
        .map(|team| {
            let existing = by_team.remove(&team.id).unwrap_or_default();
            let p = plan_with_keys(schema, &valid, &existing);
            (team, p)
        })
        .collect())
}

/// brings every team in line with `schema`. the whole pass is a single transaction: if anything
/// fails, nothing is written
pub fn reconcile_all(
    schema: &TacticalSchema,
    conn: &mut SqliteConnection,
) -> Result<ReconcileSummary, diesel::result::Error> {
    info!("Reconciling tactical data ({} checklist entries)", schema.len());
    conn.transaction(|conn| {
        let plans = plan_all(schema, conn)?;
        if plans.is_empty() {
            info!("No teams found, nothing to reconcile");
            return Ok(ReconcileSummary::default());
        }
        let mut summary = ReconcileSummary::default();
        for (team, p) in plans {
            if p.is_noop() {
                debug!("Team {} - {} is up to date", team.school, team.team);
                continue;
            }
            let new_entries = p
                .to_add
                .iter()
                .map(|k| NewTacticalData::new(team.id, k))
                .collect::<Vec<_>>();
            let added = insert_bulk(&new_entries, conn)?;
            let deleted = delete_bulk(&p.to_delete, conn)?;
            if deleted > 0 {
                info!(
                    "Deleted {deleted} stale tactical entries for team {} - {}",
                    team.school, team.team
                );
            }
            if added > 0 {
                info!(
                    "Added {added} new tactical entries for team {} - {}",
                    team.school, team.team
                );
            }
            summary.total_added += added;
            summary.total_deleted += deleted;
            summary.teams.push(TeamReconcileSummary {
                team_id: team.id,
                school: team.school,
                team: team.team,
                added,
                deleted,
            });
        }
        if summary.is_noop() {
            info!("Tactical data is already up to date");
        } else {
            info!(
                "Tactical data reconciled: added {}, deleted {}",
                summary.total_added, summary.total_deleted
            );
        }
        Ok(summary)
    })
}
