//! Startup: a brand new store gets the predefined roster, an existing one gets reconciled.

use crate::models::team::{backfill_groups, NewTeam, Team, TeamError};
use crate::reconcile::{reconcile_all, ReconcileSummary};
use crate::tactics::TacticalSchema;
use diesel::{Connection, SqliteConnection};
use log::info;

pub struct PredefinedTeam {
    pub school: &'static str,
    pub team: &'static str,
    pub rank: i32,
    pub rank_exam: i32,
    pub money: i32,
}

const fn t(school: &'static str, team: &'static str, rank: i32, rank_exam: i32, money: i32) -> PredefinedTeam {
    PredefinedTeam {
        school,
        team,
        rank,
        rank_exam,
        money,
    }
}

pub const PREDEFINED_TEAMS: &[PredefinedTeam] = &[
    t("演示大学", "DEMO", 99, 99, -100),
    t("北京科技大学", "Reborn", 47, 15, 75),
    t("北京理工大学", "追梦", 28, 91, 50),
    t("大连理工大学", "凌BUG", 34, 76, -25),
    t("东北大学", "TDT", 3, 5, 0),
    t("东华大学", "DIODE", 111, 95, 25),
    t("东南大学", "3SE", 24, 85, -25),
    t("哈尔滨工业大学（威海）", "HERO", 22, 25, 100),
    t("河北工业大学", "山海机甲", 109, 32, -25),
    t("华中科技大学", "狼牙", 25, 47, -25),
    t("吉林大学", "TARS_Go", 31, 37, 0),
    t("江苏大学", "Aurora", 161, 61, -25),
    t("辽宁科技大学", "COD", 51, 62, 0),
    t("南京航空航天大学", "长空御风", 6, 19, 75),
    t("南京理工大学", "Alliance", 38, 26, 75),
    t("宁波工程学院", "New Legends", 146, 70, -75),
    t("齐鲁工业大学", "Adam", 42, 67, -25),
    t("青岛大学", "未来", 89, 71, 0),
    t("山东科技大学", "SmartRobot", 36, 81, -25),
    t("山东理工大学", "齐奇", 68, 89, 0),
    t("上海工程技术大学", "木鸢Birdiebot", 13, 90, -25),
    t("上海科技大学", "Magician", 66, 84, -25),
    t("首都师范大学", "PIE", 30, 42, -25),
    t("太原工业学院", "火线", 23, 7, 25),
    t("天津大学", "北洋机甲", 46, 20, 75),
    t("同济大学", "SuperPower", 68, 13, 175),
    t("西安理工大学", "NEXT E", 95, 68, 0),
    t("燕山大学", "燕鹰", 73, 86, 75),
    t("浙江纺织服装职业技术学院", "RoboFuture", 54, 87, 0),
    t("浙江理工大学", "钱塘蛟", 120, 73, 25),
    t("中北大学", "606", 64, 34, 50),
    t("中国矿业大学", "CUBOT", 44, 40, 0),
    t("中国石油大学（北京）", "SPR", 58, 92, 75),
];

impl PredefinedTeam {
    fn new_team(&self) -> NewTeam {
        NewTeam::new(self.school, self.team)
            .ranks(Some(self.rank), Some(self.rank_exam))
            .money(Some(self.money))
            .comment("")
    }
}

#[derive(Debug)]
pub enum StoreInit {
    /// the store was empty; this many teams were added
    Seeded(usize),
    /// the store already had teams
    Reconciled {
        summary: ReconcileSummary,
        groups_backfilled: usize,
    },
}

/// inserts the predefined roster (each with a full set of empty tactical entries) if there are no
/// teams yet. returns how many teams were added
pub fn seed_if_empty(schema: &TacticalSchema, conn: &mut SqliteConnection) -> Result<usize, TeamError> {
    conn.transaction(|conn| {
        if !Team::all(conn)?.is_empty() {
            return Ok(0);
        }
        for p in PREDEFINED_TEAMS {
            p.new_team().create(schema, conn)?;
        }
        info!("Seeded {} predefined teams", PREDEFINED_TEAMS.len());
        Ok(PREDEFINED_TEAMS.len())
    })
}

pub fn initialize(schema: &TacticalSchema, conn: &mut SqliteConnection) -> Result<StoreInit, TeamError> {
    let seeded = seed_if_empty(schema, conn)?;
    if seeded > 0 {
        return Ok(StoreInit::Seeded(seeded));
    }
    let summary = reconcile_all(schema, conn)?;
    let groups_backfilled = backfill_groups(conn)?;
    Ok(StoreInit::Reconciled {
        summary,
        groups_backfilled,
    })
}
