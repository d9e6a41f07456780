use crate::models::team::{Team, TeamError};
use crate::schema::team_images;
use crate::tactics::TacticalSchema;
use crate::utils::epoch_timestamp;
use crate::{delete_fn, save_fn};
use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::Serialize;

/// a reference photo of one of a team's robots. the file itself lives wherever the upload handler
/// put it; this is just the bookkeeping
#[derive(Queryable, Identifiable, Debug, Serialize, Clone, PartialEq)]
#[diesel(table_name = team_images)]
pub struct TeamImage {
    pub id: i32,
    pub team_id: i32,
    /// one of the tactical checklist categories
    pub robot_type: String,
    pub filename: String,
    pub description: Option<String>,
    pub uploaded_at: i64,
}

impl TeamImage {
    pub fn get_by_id(id: i32, conn: &mut SqliteConnection) -> Result<Option<Self>, diesel::result::Error> {
        team_images::table.find(id).first(conn).optional()
    }

    pub fn for_team(team_id: i32, conn: &mut SqliteConnection) -> Result<Vec<Self>, diesel::result::Error> {
        team_images::table
            .filter(team_images::team_id.eq(team_id))
            .order(team_images::id.asc())
            .load(conn)
    }

    delete_fn!(team_images::table);
}

const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// going by the extension only; the upload handler is on the hook for actually decoding it
pub fn is_allowed_image(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// records an already-stored image file against team `team_id`
pub fn add_image(
    team_id: i32,
    robot_type: &str,
    filename: &str,
    description: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<TeamImage, TeamError> {
    let team = Team::get_existing(team_id, conn)?;
    let image = NewTeamImage::new(&team, robot_type, filename, description).save(conn)?;
    Ok(image)
}

/// removes the image's row and hands it back so the caller can clean up the file
pub fn delete_image(id: i32, conn: &mut SqliteConnection) -> Result<TeamImage, TeamError> {
    let image = TeamImage::get_by_id(id, conn)?.ok_or(TeamError::ImageNotFound(id))?;
    image.clone().delete(conn)?;
    Ok(image)
}

/// images bucketed by robot type, in checklist order
pub fn categorize_images(
    schema: &TacticalSchema,
    images: Vec<TeamImage>,
) -> Vec<(String, Vec<TeamImage>)> {
    schema.categorize(images, |i| i.robot_type.as_str())
}

#[derive(Insertable, Debug)]
#[diesel(table_name = team_images)]
pub struct NewTeamImage {
    team_id: i32,
    robot_type: String,
    filename: String,
    description: Option<String>,
    uploaded_at: i64,
}

impl NewTeamImage {
    pub fn new<S: Into<String>>(team: &Team, robot_type: S, filename: S, description: Option<S>) -> Self {
        Self {
            team_id: team.id,
            robot_type: robot_type.into(),
            filename: filename.into(),
            description: description.map(Into::into),
            uploaded_at: epoch_timestamp(),
        }
    }

    save_fn!(team_images::table, TeamImage);
}
