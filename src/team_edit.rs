//! Applying an edit-form submission to a team.
//!
//! The form only sends what the editor touched, so every field is optional. Tactical entries come
//! in as `content_<id>` and entries the page knows it didn't touch as `unchanged_content_<id>`.
//! Entries that show up in neither are "omitted"; whether that means "clear it" or "leave it alone"
//! is an [OmissionPolicy] the caller picks.

use crate::models::tactical_data::{update_content, TacticalData};
use crate::models::team::{Team, TeamError};
use crate::utils::epoch_timestamp;
use diesel::{Connection, SqliteConnection};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const CONTENT_PREFIX: &str = "content_";
const UNCHANGED_PREFIX: &str = "unchanged_content_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OmissionPolicy {
    /// omitted entries keep their content (partial / background saves)
    #[default]
    Keep,
    /// omitted entries are emptied (full-form saves)
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamEditForm {
    pub school: Option<String>,
    pub team: Option<String>,
    pub group: Option<String>,
    pub rank: Option<String>,
    pub rank_exam: Option<String>,
    pub money: Option<String>,
    pub comment: Option<String>,
    /// tactical entry id -> submitted content
    pub tactics: HashMap<i32, String>,
    /// tactical entry ids the client says it didn't touch
    pub unchanged: HashSet<i32>,
}

impl TeamEditForm {
    /// builds a form out of raw (name, value) pairs. unknown names and malformed ids are dropped
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (k, v) in fields {
            let k = k.as_ref();
            // has to be checked before the content_ prefix, it's a superset
            if let Some(id) = k.strip_prefix(UNCHANGED_PREFIX) {
                match id.parse() {
                    Ok(id) => {
                        form.unchanged.insert(id);
                    }
                    Err(_) => debug!("Ignoring bad form field {k}"),
                }
                continue;
            }
            if let Some(id) = k.strip_prefix(CONTENT_PREFIX) {
                match id.parse() {
                    Ok(id) => {
                        form.tactics.insert(id, v.into());
                    }
                    Err(_) => debug!("Ignoring bad form field {k}"),
                }
                continue;
            }
            let slot = match k {
                "school" => &mut form.school,
                "team" => &mut form.team,
                "group" => &mut form.group,
                "rank" => &mut form.rank,
                "rank_exam" => &mut form.rank_exam,
                "money" => &mut form.money,
                "comment" => &mut form.comment,
                _ => {
                    debug!("Ignoring unknown form field {k}");
                    continue;
                }
            };
            *slot = Some(v.into());
        }
        form
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TacticalDiff {
    pub unchanged: Vec<i32>,
    /// (entry id, new content)
    pub changed: Vec<(i32, String)>,
    /// filled entries that are being emptied
    pub retracted: Vec<i32>,
}

impl TacticalDiff {
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty() || !self.retracted.is_empty()
    }
}

/// sorts each of the team's entries into unchanged / changed / retracted. submitted ids that
/// don't belong to `entries` are ignored
pub fn diff_tactics(
    entries: &[TacticalData],
    form: &TeamEditForm,
    policy: OmissionPolicy,
) -> TacticalDiff {
    let mut diff = TacticalDiff::default();
    for entry in entries {
        if let Some(content) = form.tactics.get(&entry.id) {
            if *content != entry.content {
                diff.changed.push((entry.id, content.clone()));
            } else {
                diff.unchanged.push(entry.id);
            }
        } else if form.unchanged.contains(&entry.id) {
            diff.unchanged.push(entry.id);
        } else if policy == OmissionPolicy::Clear && entry.is_filled() {
            diff.retracted.push(entry.id);
        } else {
            diff.unchanged.push(entry.id);
        }
    }
    diff
}

/// `None` means leave the field alone; `Some(None)` means clear it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamFieldChanges {
    pub school: Option<String>,
    pub team: Option<String>,
    pub group: Option<String>,
    pub rank: Option<Option<i32>>,
    pub rank_exam: Option<Option<i32>>,
    pub money: Option<Option<i32>>,
    pub comment: Option<String>,
}

impl TeamFieldChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn renames(&self) -> bool {
        self.school.is_some() || self.team.is_some()
    }

    pub fn apply(&self, team: &mut Team) {
        if let Some(s) = &self.school {
            team.school = s.clone();
        }
        if let Some(t) = &self.team {
            team.team = t.clone();
        }
        if let Some(g) = &self.group {
            team.group = Some(g.clone());
        }
        if let Some(r) = self.rank {
            team.rank = r;
        }
        if let Some(r) = self.rank_exam {
            team.rank_exam = r;
        }
        if let Some(m) = self.money {
            team.money = m;
        }
        if let Some(c) = &self.comment {
            team.comment = Some(c.clone());
        }
    }
}

/// non-empty and different
fn text_change(submitted: &Option<String>, current: &str) -> Option<String> {
    submitted
        .as_ref()
        .filter(|s| !s.is_empty() && s.as_str() != current)
        .cloned()
}

/// blank clears the field, garbage is ignored
fn int_change(submitted: &Option<String>, current: Option<i32>) -> Option<Option<i32>> {
    let raw = submitted.as_ref()?.trim();
    if raw.is_empty() {
        return current.map(|_| None);
    }
    match raw.parse::<i32>() {
        Ok(n) if Some(n) != current => Some(Some(n)),
        Ok(_) => None,
        Err(e) => {
            debug!("Ignoring non-numeric input {raw:?}: {e}");
            None
        }
    }
}

pub fn diff_fields(team: &Team, form: &TeamEditForm) -> TeamFieldChanges {
    TeamFieldChanges {
        school: text_change(&form.school, &team.school),
        team: text_change(&form.team, &team.team),
        group: text_change(&form.group, team.group()),
        rank: int_change(&form.rank, team.rank),
        rank_exam: int_change(&form.rank_exam, team.rank_exam),
        money: int_change(&form.money, team.money),
        comment: form
            .comment
            .as_ref()
            .filter(|c| Some(*c) != team.comment.as_ref())
            .cloned(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EditOutcome {
    /// the team as it is after the edit
    pub team: Team,
    pub fields: TeamFieldChanges,
    pub tactics: TacticalDiff,
}

impl EditOutcome {
    pub fn has_changes(&self) -> bool {
        !self.fields.is_empty() || self.tactics.has_changes()
    }
}

/// applies `form` to team `id` in one transaction. nothing is written (and `updated_at` is left
/// alone) when nothing changed
pub fn edit_team(
    id: i32,
    form: &TeamEditForm,
    policy: OmissionPolicy,
    conn: &mut SqliteConnection,
) -> Result<EditOutcome, TeamError> {
    conn.transaction(|conn| {
        let mut team = Team::get_existing(id, conn)?;
        let entries = team.tactical_data(conn)?;
        let tactics = diff_tactics(&entries, form, policy);
        let fields = diff_fields(&team, form);

        if fields.renames() {
            let school = fields.school.as_deref().unwrap_or(&team.school);
            let name = fields.team.as_deref().unwrap_or(&team.team);
            if let Some(other) = Team::get_by_school_and_team(school, name, conn)? {
                if other.id != team.id {
                    return Err(TeamError::AlreadyExists {
                        school: school.to_string(),
                        team: name.to_string(),
                    });
                }
            }
        }

        for (entry_id, content) in &tactics.changed {
            update_content(*entry_id, content, conn)?;
        }
        for entry_id in &tactics.retracted {
            update_content(*entry_id, "", conn)?;
        }
        let outcome_has_changes = !fields.is_empty() || tactics.has_changes();
        if outcome_has_changes {
            fields.apply(&mut team);
            team.updated_at = epoch_timestamp();
            team.update(conn)?;
            info!(
                "Updated team {} - {}: {} tactical entries changed, {} cleared",
                team.school,
                team.team,
                tactics.changed.len(),
                tactics.retracted.len()
            );
        } else {
            debug!("No changes for team {}", team.id);
        }
        Ok(EditOutcome {
            team,
            fields,
            tactics,
        })
    })
}
