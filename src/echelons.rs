use crate::models::team::Team;
use enum_iterator::{all, Sequence};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence, Serialize)]
pub enum Echelon {
    Gold,
    Silver,
    Bronze,
    Iron,
}

impl Echelon {
    /// how many teams fit in this tier
    pub fn size(&self) -> usize {
        match self {
            Echelon::Gold => 4,
            Echelon::Silver => 4,
            Echelon::Bronze => 8,
            Echelon::Iron => 16,
        }
    }

    /// number of ranked teams that come before this tier
    fn offset(&self) -> usize {
        all::<Echelon>()
            .take_while(|e| e != self)
            .map(|e| e.size())
            .sum()
    }
}

/// anything with an examination rank
pub trait ExamRanked {
    fn rank_exam(&self) -> Option<i32>;
}

impl ExamRanked for Team {
    fn rank_exam(&self) -> Option<i32> {
        self.rank_exam
    }
}

#[derive(Debug, Serialize)]
pub struct Echelons<'a, T> {
    pub gold: Vec<&'a T>,
    pub silver: Vec<&'a T>,
    pub bronze: Vec<&'a T>,
    pub iron: Vec<&'a T>,
}

impl<'a, T> Echelons<'a, T> {
    pub fn get(&self, echelon: Echelon) -> &[&'a T] {
        match echelon {
            Echelon::Gold => &self.gold,
            Echelon::Silver => &self.silver,
            Echelon::Bronze => &self.bronze,
            Echelon::Iron => &self.iron,
        }
    }

    fn get_mut(&mut self, echelon: Echelon) -> &mut Vec<&'a T> {
        match echelon {
            Echelon::Gold => &mut self.gold,
            Echelon::Silver => &mut self.silver,
            Echelon::Bronze => &mut self.bronze,
            Echelon::Iron => &mut self.iron,
        }
    }
}

/// tiers teams by examination rank (lower is better). teams without one are left out entirely,
/// as is everybody past the last tier. teams with the same rank keep their input order
pub fn classify<T: ExamRanked>(teams: &[T]) -> Echelons<'_, T> {
    let mut ranked = teams
        .iter()
        .filter_map(|t| t.rank_exam().map(|r| (r, t)))
        .collect::<Vec<_>>();
    // sort_by_key is stable
    ranked.sort_by_key(|(r, _)| *r);

    let mut echelons = Echelons {
        gold: vec![],
        silver: vec![],
        bronze: vec![],
        iron: vec![],
    };
    for echelon in all::<Echelon>() {
        let start = echelon.offset().min(ranked.len());
        let end = (start + echelon.size()).min(ranked.len());
        echelons
            .get_mut(echelon)
            .extend(ranked[start..end].iter().map(|(_, t)| *t));
    }
    echelons
}
