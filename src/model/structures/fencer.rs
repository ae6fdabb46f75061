use serde::{Deserialize, Serialize};

use crate::model::{
    error::ValidationError,
    parameters::Parameters,
    structures::{k_factor_regime::KFactorRegime, rating_state::RatingState}
};

/// A fencer as declared in the input.
///
/// - A name in parentheses, e.g. `(Jane Doe)`, marks a hidden fencer.
/// - A name containing `<N>`, e.g. `John Smith <1850>`, marks a foreign
///   fencer with the fixed rating N. The declared `rating` is ignored.
/// - A `rating` of 0 marks a freshman.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FencerDeclaration {
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub initial_total_weighting: f64
}

impl FencerDeclaration {
    pub fn new(name: impl Into<String>, rating: f64) -> FencerDeclaration {
        FencerDeclaration {
            name: name.into(),
            rating,
            initial_total_weighting: 0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fencer {
    pub name: String,
    pub hidden: bool,
    pub foreign: bool,
    /// The rating this fencer started with; 0 for freshmen
    pub initial_rating: f64,
    pub initial_total_weighting: f64,
    /// Bouts fenced so far, in units of bouts fenced to 5 points
    total_weighting: f64,
    /// Set once a written rating reached the top threshold, never reset
    top_regime: bool,
    state: RatingState
}

impl Fencer {
    /// Creates a visible fencer. Names containing `<` are foreign fencers.
    pub fn new(
        name: impl Into<String>,
        initial_rating: f64,
        initial_total_weighting: f64,
        parameters: &Parameters
    ) -> Result<Fencer, ValidationError> {
        let name = name.into();

        if !initial_total_weighting.is_finite() || initial_total_weighting < 0.0 {
            return Err(ValidationError::InvalidDeclaration {
                name,
                reason: format!("initial total weighting {initial_total_weighting} is invalid")
            });
        }

        if is_foreign_name(&name) {
            let rating = foreign_rating(&name).ok_or_else(|| ValidationError::InvalidForeignRating(name.clone()))?;

            return Ok(Fencer {
                name,
                hidden: false,
                foreign: true,
                initial_rating: rating,
                initial_total_weighting,
                total_weighting: initial_total_weighting,
                top_regime: false,
                state: RatingState::Known(rating)
            });
        }

        if !initial_rating.is_finite() || initial_rating < 0.0 {
            return Err(ValidationError::InvalidDeclaration {
                name,
                reason: format!("initial rating {initial_rating} is invalid")
            });
        }

        // A freshman's weighting must match its tallied opponent ratings
        if initial_rating == 0.0 && initial_total_weighting != 0.0 {
            return Err(ValidationError::InvalidDeclaration {
                name,
                reason: "a freshman cannot have an initial total weighting".to_string()
            });
        }

        let mut fencer = Fencer {
            name,
            hidden: false,
            foreign: false,
            initial_rating,
            initial_total_weighting,
            total_weighting: initial_total_weighting,
            top_regime: false,
            state: RatingState::estimating()
        };

        if initial_rating != 0.0 {
            fencer.state = RatingState::Known(initial_rating);
            fencer.write_rating(initial_rating, parameters);
        }

        Ok(fencer)
    }

    pub fn from_declaration(declaration: &FencerDeclaration, parameters: &Parameters) -> Result<Fencer, ValidationError> {
        let raw = declaration.name.trim();
        let hidden = raw.starts_with('(');

        let name = if hidden {
            raw.strip_prefix('(')
                .and_then(|n| n.strip_suffix(')'))
                .map(str::trim)
                .ok_or_else(|| ValidationError::InvalidDeclaration {
                    name: declaration.name.clone(),
                    reason: "hidden fencer name is missing its closing parenthesis".to_string()
                })?
        } else {
            raw
        };

        if name.is_empty() {
            return Err(ValidationError::InvalidDeclaration {
                name: declaration.name.clone(),
                reason: "name is empty".to_string()
            });
        }

        let mut fencer = Fencer::new(
            name,
            declaration.rating,
            declaration.initial_total_weighting,
            parameters
        )?;
        fencer.hidden = hidden;

        Ok(fencer)
    }

    pub fn is_freshman(&self) -> bool {
        self.state.is_estimating()
    }

    pub fn rating_state(&self) -> &RatingState {
        &self.state
    }

    /// The rating of a rated (or foreign) fencer; `None` for freshmen.
    pub fn known_rating(&self) -> Option<f64> {
        self.state.known()
    }

    pub fn total_weighting(&self) -> f64 {
        self.total_weighting
    }

    pub fn is_top_regime(&self) -> bool {
        self.top_regime
    }

    pub fn regime(&self, parameters: &Parameters) -> KFactorRegime {
        if self.total_weighting < parameters.freshman_weighting_threshold {
            KFactorRegime::Freshman
        } else if self.top_regime {
            KFactorRegime::Top
        } else {
            KFactorRegime::Others
        }
    }

    pub fn k_factor(&self, parameters: &Parameters) -> f64 {
        self.regime(parameters).k_factor(parameters)
    }

    /// Writes a new rating, applying the rating floor. Freshmen and foreign
    /// fencers are never written.
    pub(crate) fn write_rating(&mut self, rating: f64, parameters: &Parameters) {
        if self.foreign {
            return;
        }

        if let RatingState::Known(current) = &mut self.state {
            *current = rating.max(parameters.minimal_rating);

            if *current >= parameters.rating_top_threshold {
                self.top_regime = true;
            }
        }
    }

    pub(crate) fn set_total_weighting(&mut self, total_weighting: f64) {
        if !self.foreign && !self.is_freshman() {
            self.total_weighting = total_weighting;
        }
    }

    /// Adds one bout to a freshman's statistics. `result` and
    /// `opponent_rating` are already multiplied by `weighting`.
    pub(crate) fn add_tally(&mut self, weighting: f64, result: f64, opponent_rating: f64) {
        if let RatingState::Estimating {
            total_result,
            total_opponent_rating
        } = &mut self.state
        {
            self.total_weighting += weighting;
            *total_result += result;
            *total_opponent_rating += opponent_rating;
        }
    }

    /// Clears a freshman's statistics. Rated fencers keep their total
    /// weighting, so they do not fall back into the freshmen k factor.
    pub(crate) fn reset_tally(&mut self) {
        if self.state.is_estimating() {
            self.total_weighting = self.initial_total_weighting;
            self.state = RatingState::estimating();
        }
    }

    /// Turns a freshman into a rated fencer starting at `rating`.
    /// Returns false if the fencer was not a freshman.
    pub fn promote(&mut self, rating: f64, parameters: &Parameters) -> bool {
        if !self.is_freshman() || self.foreign {
            return false;
        }

        self.state = RatingState::Known(rating);
        self.write_rating(rating, parameters);
        self.initial_rating = self.known_rating().unwrap_or(rating);

        true
    }
}

pub fn is_foreign_name(name: &str) -> bool {
    name.contains('<')
}

/// Parses the fixed rating out of a foreign fencer's name, e.g. `Smith <1850>`.
fn foreign_rating(name: &str) -> Option<f64> {
    let start = name.find('<')? + 1;
    let end = start + name[start..].find('>')?;
    let digits = &name[start..end];

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let rating: u32 = digits.parse().ok()?;

    (rating > 0).then_some(rating as f64)
}
