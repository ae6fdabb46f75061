use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::model::{
    error::ValidationError,
    freshman,
    parameters::Parameters,
    structures::{
        fencer::{Fencer, FencerDeclaration},
        k_factor_regime::KFactorRegime,
        rating_state::RatingState
    }
};

/// A line of the public ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedFencer {
    pub rank: usize,
    pub name: String,
    pub rating: i64,
    pub rating_exact: f64,
    pub total_weighting: f64,
    pub regime: KFactorRegime
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreshmanEstimate {
    pub name: String,
    pub hidden: bool,
    /// 0.0 if the freshman has not fenced enough yet
    pub estimate: f64,
    pub total_weighting: f64
}

/// What [`Roster::adopt_results`] copies into the initial ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adoption {
    /// Current ratings of rated fencers become their initial ratings
    RatedFencers,
    /// Freshmen with an estimate are promoted to rated fencers
    Freshmen
}

/// All fencers, keyed by name, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    fencers: IndexMap<String, Fencer>
}

impl Roster {
    pub fn new() -> Roster {
        Roster {
            fencers: IndexMap::new()
        }
    }

    pub fn from_declarations(
        declarations: &[FencerDeclaration],
        parameters: &Parameters
    ) -> Result<Roster, ValidationError> {
        let mut roster = Roster::new();

        for declaration in declarations {
            roster.insert(Fencer::from_declaration(declaration, parameters)?)?;
        }

        Ok(roster)
    }

    /// Adds a fencer and returns its index.
    pub fn insert(&mut self, fencer: Fencer) -> Result<usize, ValidationError> {
        if self.fencers.contains_key(&fencer.name) {
            return Err(ValidationError::DuplicateFencer(fencer.name));
        }

        let (index, _) = self.fencers.insert_full(fencer.name.clone(), fencer);
        Ok(index)
    }

    pub fn get(&self, name: &str) -> Option<&Fencer> {
        self.fencers.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Fencer> {
        self.fencers.get_mut(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fencers.get_index_of(name)
    }

    pub fn by_index(&self, index: usize) -> Option<&Fencer> {
        self.fencers.get_index(index).map(|(_, fencer)| fencer)
    }

    pub(crate) fn by_index_mut(&mut self, index: usize) -> Option<&mut Fencer> {
        self.fencers.get_index_mut(index).map(|(_, fencer)| fencer)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fencers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fencers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fencers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fencer> {
        self.fencers.values()
    }

    /// Fencers shown in rankings and plots: not hidden, no freshman, not foreign.
    pub fn is_visible(fencer: &Fencer) -> bool {
        !(fencer.hidden || fencer.is_freshman() || fencer.foreign)
    }

    /// Indices of the visible fencers, in roster order.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.fencers
            .values()
            .enumerate()
            .filter(|(_, fencer)| Roster::is_visible(fencer))
            .map(|(index, _)| index)
            .collect()
    }

    /// Visible fencers by descending rating. Equal ratings are ordered by name.
    pub fn visible_ranking(&self, parameters: &Parameters) -> Vec<RankedFencer> {
        self.fencers
            .values()
            .filter(|fencer| Roster::is_visible(fencer))
            .filter_map(|fencer| Some((fencer, fencer.known_rating()?)))
            .sorted_by(|(a, a_rating), (b, b_rating)| {
                b_rating.total_cmp(a_rating).then_with(|| a.name.cmp(&b.name))
            })
            .enumerate()
            .map(|(i, (fencer, rating))| RankedFencer {
                rank: i + 1,
                name: fencer.name.clone(),
                rating: rating.round() as i64,
                rating_exact: rating,
                total_weighting: fencer.total_weighting(),
                regime: fencer.regime(parameters)
            })
            .collect()
    }

    /// All freshmen with their current estimate, best first.
    pub fn freshman_estimates(&self, parameters: &Parameters) -> Vec<FreshmanEstimate> {
        self.fencers
            .values()
            .filter(|fencer| fencer.is_freshman())
            .map(|fencer| FreshmanEstimate {
                name: fencer.name.clone(),
                hidden: fencer.hidden,
                estimate: freshman::estimate(fencer, parameters),
                total_weighting: fencer.total_weighting()
            })
            .sorted_by(|a, b| b.estimate.total_cmp(&a.estimate).then_with(|| a.name.cmp(&b.name)))
            .collect()
    }

    /// Ratings of all non-freshmen, indexed like the roster.
    pub fn known_ratings(&self) -> Vec<Option<f64>> {
        self.fencers.values().map(Fencer::known_rating).collect()
    }

    /// Forgets what the freshmen fenced in a previous pass. Ratings and the
    /// total weightings of rated fencers are kept.
    pub(crate) fn reset_freshman_tallies(&mut self) {
        for fencer in self.fencers.values_mut() {
            fencer.reset_tally();
        }
    }

    /// Makes the results of a calculation the new starting point, e.g. after
    /// bootstrapping, so that a caller can write them back. Ratings are
    /// rounded like they are displayed. Returns the number of fencers changed.
    pub fn adopt_results(&mut self, adoption: Adoption, parameters: &Parameters) -> usize {
        let mut changed = 0;

        for fencer in self.fencers.values_mut().filter(|fencer| !fencer.foreign) {
            match (adoption, *fencer.rating_state()) {
                (Adoption::RatedFencers, RatingState::Known(rating)) => {
                    fencer.initial_rating = rating.round();
                    changed += 1;
                }
                (Adoption::Freshmen, RatingState::Estimating { .. }) => {
                    let estimate = freshman::estimate(fencer, parameters).round();
                    if estimate > 0.0 && fencer.promote(estimate, parameters) {
                        debug!(fencer = %fencer.name, estimate, "Freshman promoted");
                        changed += 1;
                    }
                }
                _ => {}
            }
        }

        changed
    }

    /// Declarations reproducing the current roster, e.g. to be written back.
    pub fn declarations(&self) -> Vec<FencerDeclaration> {
        self.fencers
            .values()
            .map(|fencer| {
                let name = if fencer.hidden {
                    format!("({})", fencer.name)
                } else {
                    fencer.name.clone()
                };

                FencerDeclaration {
                    name,
                    rating: if fencer.foreign { 0.0 } else { fencer.initial_rating },
                    initial_total_weighting: fencer.initial_total_weighting
                }
            })
            .collect()
    }
}
