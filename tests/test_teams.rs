mod common;

use common::{add_team, small_schema, start_db};
use rmintel::dashboard::{team_sheet, Dashboard};
use rmintel::models::tactical_data::{delete_entry, update_content, TacticalData};
use rmintel::models::team::{backfill_groups, delete_team, NewTeam, Team, TeamError};
use rmintel::models::team_images::{add_image, delete_image, TeamImage};
use rmintel::seed::{initialize, StoreInit, PREDEFINED_TEAMS};
use rmintel::tactics::TacticalSchema;
use rmintel::team_edit::{edit_team, OmissionPolicy, TeamEditForm};

#[test]
fn test_create_team_gets_full_checklist() -> anyhow::Result<()> {
    let mut db = start_db()?;
    let schema = small_schema();
    let team = NewTeam::new("A大学", "A")
        .ranks(Some(3), Some(10))
        .money(Some(50))
        .create(&schema, &mut db)?;
    assert_eq!(Some("A"), team.group.as_deref());
    assert_eq!(Some(10), team.rank_exam);

    let entries = team.tactical_data(&mut db)?;
    assert_eq!(schema.len(), entries.len());
    assert!(entries.iter().all(|e| !e.is_filled()));
    assert_eq!(
        schema.keys().collect::<Vec<_>>(),
        entries.iter().map(|e| e.key()).collect::<Vec<_>>()
    );
    Ok(())
}

#[test]
fn test_duplicate_team_is_rejected() -> anyhow::Result<()> {
    let mut db = start_db()?;
    add_team("A大学", "A", &small_schema(), &mut db)?;
    let res = NewTeam::new("A大学", "A").create(&small_schema(), &mut db);
    assert!(matches!(res, Err(TeamError::AlreadyExists { .. })));
    // same school, different team name is fine
    add_team("A大学", "A2", &small_schema(), &mut db)?;
    assert_eq!(2, Team::all(&mut db)?.len());
    assert_eq!(8, TacticalData::all(&mut db)?.len());
    Ok(())
}

#[test]
fn test_delete_team_cascades() -> anyhow::Result<()> {
    let mut db = start_db()?;
    let a = add_team("A大学", "A", &small_schema(), &mut db)?;
    let b = add_team("B大学", "B", &small_schema(), &mut db)?;
    add_image(a.id, "英雄", "1_hero.jpg", Some("front"), &mut db)?;
    add_image(b.id, "英雄", "2_hero.jpg", None, &mut db)?;

    delete_team(a.id, &mut db)?;

    assert_eq!(None, Team::get_by_id(a.id, &mut db)?);
    assert!(TacticalData::for_team(a.id, &mut db)?.is_empty());
    assert!(TeamImage::for_team(a.id, &mut db)?.is_empty());
    assert_eq!(4, TacticalData::for_team(b.id, &mut db)?.len());
    assert_eq!(1, TeamImage::for_team(b.id, &mut db)?.len());

    assert!(matches!(
        delete_team(a.id, &mut db),
        Err(TeamError::NotFound(id)) if id == a.id
    ));
    Ok(())
}

#[test]
fn test_images() -> anyhow::Result<()> {
    let mut db = start_db()?;
    let a = add_team("A大学", "A", &small_schema(), &mut db)?;
    assert!(matches!(
        add_image(a.id + 100, "英雄", "x.jpg", None, &mut db),
        Err(TeamError::NotFound(_))
    ));
    let img = add_image(a.id, "飞镖", "dart.jpg", Some("dart"), &mut db)?;
    add_image(a.id, "步兵3", "ghost.jpg", None, &mut db)?;

    let sheet = team_sheet(a.id, &small_schema(), &mut db)?;
    let counts = sheet
        .images
        .iter()
        .map(|(c, imgs)| (c.as_str(), imgs.len()))
        .collect::<Vec<_>>();
    // images for categories that aren't in the checklist aren't shown
    assert_eq!(vec![("英雄", 0), ("飞镖", 1)], counts);

    let deleted = delete_image(img.id, &mut db)?;
    assert_eq!("dart.jpg", deleted.filename);
    assert!(matches!(
        delete_image(img.id, &mut db),
        Err(TeamError::ImageNotFound(_))
    ));
    Ok(())
}

fn entry_id(team: &Team, category: &str, item: &str, db: &mut diesel::SqliteConnection) -> anyhow::Result<i32> {
    team.tactical_data(db)?
        .into_iter()
        .find(|d| d.category == category && d.item == item)
        .map(|d| d.id)
        .ok_or(anyhow::anyhow!("no entry {category}/{item}"))
}

fn content(id: i32, db: &mut diesel::SqliteConnection) -> anyhow::Result<String> {
    Ok(TacticalData::get_by_id(id, db)?
        .ok_or(anyhow::anyhow!("no entry {id}"))?
        .content)
}

#[test]
fn test_unknown_entry_is_not_found() -> anyhow::Result<()> {
    let mut db = start_db()?;
    let a = add_team("A大学", "A", &small_schema(), &mut db)?;
    let before = TacticalData::all(&mut db)?;
    assert!(matches!(
        update_content(424242, "x", &mut db),
        Err(TeamError::EntryNotFound(424242))
    ));
    assert!(matches!(
        delete_entry(424242, &mut db),
        Err(TeamError::EntryNotFound(424242))
    ));
    assert_eq!(before, TacticalData::all(&mut db)?);

    let hole = entry_id(&a, "英雄", "过洞", &mut db)?;
    delete_entry(hole, &mut db)?;
    assert_eq!(3, TacticalData::for_team(a.id, &mut db)?.len());
    Ok(())
}

#[test]
fn test_edit_team_keep_and_clear() -> anyhow::Result<()> {
    let mut db = start_db()?;
    let a = add_team("A大学", "A", &small_schema(), &mut db)?;
    let fly = entry_id(&a, "英雄", "飞坡", &mut db)?;
    let hole = entry_id(&a, "英雄", "过洞", &mut db)?;
    let target = entry_id(&a, "飞镖", "目标", &mut db)?;
    update_content(hole, "能过", &mut db)?;
    update_content(target, "前哨站", &mut db)?;

    // partial save: only fly is sent, the others keep their content
    let form = TeamEditForm::from_fields(vec![(format!("content_{fly}"), "能飞".to_string())]);
    let outcome = edit_team(a.id, &form, OmissionPolicy::Keep, &mut db)?;
    assert!(outcome.has_changes());
    assert_eq!(vec![(fly, "能飞".to_string())], outcome.tactics.changed);
    assert_eq!("能飞", content(fly, &mut db)?);
    assert_eq!("能过", content(hole, &mut db)?);
    assert_eq!("前哨站", content(target, &mut db)?);

    // full save: target is marked unchanged, hole is omitted so it gets cleared
    let form = TeamEditForm::from_fields(vec![
        (format!("content_{fly}"), "能飞".to_string()),
        (format!("unchanged_content_{target}"), String::new()),
    ]);
    let outcome = edit_team(a.id, &form, OmissionPolicy::Clear, &mut db)?;
    assert!(outcome.tactics.changed.is_empty());
    assert_eq!(vec![hole], outcome.tactics.retracted);
    assert_eq!("能飞", content(fly, &mut db)?);
    assert_eq!("", content(hole, &mut db)?);
    assert_eq!("前哨站", content(target, &mut db)?);
    Ok(())
}

#[test]
fn test_edit_team_fields() -> anyhow::Result<()> {
    let mut db = start_db()?;
    let a = NewTeam::new("A大学", "A")
        .ranks(Some(5), Some(6))
        .create(&small_schema(), &mut db)?;
    let form = TeamEditForm::from_fields(vec![
        ("team", "Alpha"),
        ("group", "B"),
        ("rank", ""),
        ("rank_exam", "not a number"),
        ("money", "120"),
        ("comment", "强队"),
    ]);
    let outcome = edit_team(a.id, &form, OmissionPolicy::Keep, &mut db)?;
    assert!(outcome.has_changes());

    let a = Team::get_existing(a.id, &mut db)?;
    assert_eq!("A大学", a.school);
    assert_eq!("Alpha", a.team);
    assert_eq!("B", a.group());
    assert_eq!(None, a.rank);
    assert_eq!(Some(6), a.rank_exam);
    assert_eq!(Some(120), a.money);
    assert_eq!(Some("强队".to_string()), a.comment);

    // same thing again changes nothing
    let again = edit_team(a.id, &form, OmissionPolicy::Keep, &mut db)?;
    assert!(!again.has_changes());
    assert_eq!(a, Team::get_existing(a.id, &mut db)?);
    Ok(())
}

#[test]
fn test_edit_team_rename_collision() -> anyhow::Result<()> {
    let mut db = start_db()?;
    add_team("A大学", "A", &small_schema(), &mut db)?;
    let b = add_team("B大学", "B", &small_schema(), &mut db)?;
    let form = TeamEditForm::from_fields(vec![("school", "A大学"), ("team", "A")]);
    assert!(matches!(
        edit_team(b.id, &form, OmissionPolicy::Keep, &mut db),
        Err(TeamError::AlreadyExists { .. })
    ));
    assert_eq!("B大学", Team::get_existing(b.id, &mut db)?.school);

    assert!(matches!(
        edit_team(999, &TeamEditForm::default(), OmissionPolicy::Keep, &mut db),
        Err(TeamError::NotFound(999))
    ));
    Ok(())
}

#[test]
fn test_seed_then_reconcile() -> anyhow::Result<()> {
    let mut db = start_db()?;
    let schema = TacticalSchema::default();
    match initialize(&schema, &mut db)? {
        StoreInit::Seeded(n) => assert_eq!(PREDEFINED_TEAMS.len(), n),
        other => panic!("expected a seed, got {other:?}"),
    }
    assert_eq!(
        PREDEFINED_TEAMS.len() * schema.len(),
        TacticalData::all(&mut db)?.len()
    );

    match initialize(&schema, &mut db)? {
        StoreInit::Reconciled {
            summary,
            groups_backfilled,
        } => {
            assert!(summary.is_noop());
            assert_eq!(0, groups_backfilled);
        }
        other => panic!("expected a reconcile, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_backfill_groups() -> anyhow::Result<()> {
    let mut db = start_db()?;
    let a = add_team("A大学", "A", &small_schema(), &mut db)?;
    let mut a2 = a.clone();
    a2.group = None;
    a2.update(&mut db)?;
    assert_eq!(1, backfill_groups(&mut db)?);
    assert_eq!(Some("A".to_string()), Team::get_existing(a.id, &mut db)?.group);
    Ok(())
}

#[test]
fn test_dashboard() -> anyhow::Result<()> {
    let mut db = start_db()?;
    let schema = small_schema();
    let a = NewTeam::new("A大学", "A")
        .ranks(None, Some(2))
        .create(&schema, &mut db)?;
    let b = NewTeam::new("B大学", "B")
        .ranks(None, Some(1))
        .create(&schema, &mut db)?;
    let c = add_team("C大学", "C", &schema, &mut db)?;
    for d in a.tactical_data(&mut db)? {
        update_content(d.id, "done", &mut db)?;
    }
    update_content(entry_id(&b, "英雄", "飞坡", &mut db)?, "x", &mut db)?;

    let dash = Dashboard::load(&mut db)?;
    assert_eq!(0, dash.unfilled_for(a.id));
    assert_eq!(3, dash.unfilled_for(b.id));
    assert_eq!(4, dash.unfilled_for(c.id));

    let echelons = dash.echelons();
    assert_eq!(
        vec![b.id, a.id],
        echelons.gold.iter().map(|t| t.id).collect::<Vec<_>>()
    );
    assert!(echelons.silver.is_empty());
    Ok(())
}

#[test]
fn test_team_sheet_groups_tactics() -> anyhow::Result<()> {
    let mut db = start_db()?;
    let a = add_team("A大学", "A", &small_schema(), &mut db)?;
    let sheet = team_sheet(a.id, &small_schema(), &mut db)?;
    let shape = sheet
        .tactics
        .iter()
        .map(|(c, ds)| (c.as_str(), ds.iter().map(|d| d.item.as_str()).collect::<Vec<_>>()))
        .collect::<Vec<_>>();
    assert_eq!(
        vec![("英雄", vec!["飞坡", "过洞"]), ("飞镖", vec!["目标", "命中率"])],
        shape
    );
    assert!(matches!(
        team_sheet(a.id + 1, &small_schema(), &mut db),
        Err(TeamError::NotFound(_))
    ));
    Ok(())
}
