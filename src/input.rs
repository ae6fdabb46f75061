use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    error::{FeloError, ValidationError},
    felo_model::FeloModel,
    parameters::Parameters,
    roster::Roster,
    structures::{bout::Bout, fencer::FencerDeclaration}
};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error
    },

    #[error("Invalid Felo input: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Felo(#[from] FeloError)
}

impl From<ValidationError> for InputError {
    fn from(e: ValidationError) -> Self {
        InputError::Felo(e.into())
    }
}

/// A bout as written in the input file. The date string may carry an index,
/// e.g. `2006-03-01.2`; a missing `fencedTo` means the higher score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoutRecord {
    pub date: String,
    pub first: String,
    pub second: String,
    pub points_first: u32,
    pub points_second: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fenced_to: Option<u32>
}

impl BoutRecord {
    pub fn to_bout(&self) -> Result<Bout, ValidationError> {
        let (date, index) = Bout::parse_date_string(&self.date)?;

        Ok(Bout::new(
            date,
            index,
            self.first.trim(),
            self.second.trim(),
            self.points_first,
            self.points_second,
            self.fenced_to
        ))
    }

    pub fn from_bout(bout: &Bout) -> BoutRecord {
        BoutRecord {
            date: bout.date_string(),
            first: bout.first_fencer.clone(),
            second: bout.second_fencer.clone(),
            points_first: bout.points_first,
            points_second: bout.points_second,
            fenced_to: Some(bout.fenced_to)
        }
    }
}

/// The JSON document the command line tool reads: one group of fencers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeloInput {
    pub parameters: Parameters,
    pub fencers: Vec<FencerDeclaration>,
    pub bouts: Vec<BoutRecord>
}

impl FeloInput {
    pub fn from_json(json: &str) -> Result<FeloInput, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<FeloInput, InputError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.display().to_string(),
            source
        })?;

        FeloInput::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, InputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates the input and builds the model.
    pub fn into_model(self) -> Result<FeloModel, InputError> {
        let bouts = self
            .bouts
            .iter()
            .map(BoutRecord::to_bout)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeloModel::new(self.parameters, &self.fencers, bouts)?)
    }

    /// Replaces the fencer declarations with those of `roster`, e.g. after
    /// [`Roster::adopt_results`]. Foreign fencers only referenced in bouts are
    /// not declared.
    pub fn write_back(&mut self, roster: &Roster) {
        let declared = roster.declarations();

        self.fencers = declared
            .into_iter()
            .filter(|declaration| {
                !declaration.name.contains('<')
                    || self.fencers.iter().any(|existing| existing.name.trim() == declaration.name)
            })
            .collect();
    }
}
