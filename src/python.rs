use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use std::collections::HashMap;
use std::path::Path;

use crate::config::{self, ConfigError};
use crate::error::SeasonError;
use crate::grouping::Grouping;
use crate::outcome::OutcomeVector;
use crate::seeding::SlotOverrides;

fn season_err(e: SeasonError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn config_err(e: ConfigError) -> PyErr {
    match e {
        ConfigError::FileNotFound { .. } | ConfigError::Io { .. } => {
            PyIOError::new_err(e.to_string())
        }
        other => PyValueError::new_err(other.to_string()),
    }
}

/// A modelled league race.
#[pyclass(name = "Grouping")]
#[derive(Clone)]
pub struct PyGrouping {
    inner: Grouping,
}

#[pymethods]
impl PyGrouping {
    /// Load one of the shipped groupings ("al" or "nl").
    #[staticmethod]
    pub fn builtin(name: &str) -> PyResult<Self> {
        let inner = config::builtin(name).map_err(config_err)?;
        Ok(PyGrouping { inner })
    }

    /// Load a grouping from a TOML file.
    #[staticmethod]
    pub fn from_toml(path: &str) -> PyResult<Self> {
        let inner = config::load_grouping(Path::new(path)).map_err(config_err)?;
        Ok(PyGrouping { inner })
    }

    /// Merge tiebreaks from a CSV file (team1,team2,winner).
    pub fn read_tiebreaks(&mut self, path: &str) -> PyResult<()> {
        let extra = crate::tiebreak::TiebreakTable::read_from_file(Path::new(path))
            .map_err(config_err)?;
        self.inner = self.inner.with_tiebreaks(&extra);
        Ok(())
    }

    #[getter]
    pub fn name(&self) -> String {
        self.inner.name().to_string()
    }

    pub fn series_ids(&self) -> Vec<String> {
        self.inner.series_ids().into_iter().map(String::from).collect()
    }

    /// Resolve standings and seeding.
    ///
    /// Returns a map of team to (wins, losses, category).
    #[pyo3(signature = (outcomes, overrides = None))]
    pub fn resolve(
        &self,
        outcomes: HashMap<String, u32>,
        overrides: Option<HashMap<String, String>>,
    ) -> PyResult<HashMap<String, (u32, u32, String)>> {
        let outcomes: OutcomeVector = outcomes.into_iter().collect();
        let overrides: SlotOverrides = overrides.unwrap_or_default().into_iter().collect();
        let res = self.inner.resolve(&outcomes, &overrides).map_err(season_err)?;

        Ok(res
            .seeding
            .assignments()
            .filter_map(|(team, category)| {
                let rec = res.standings.get(team)?;
                Some((team.to_string(), (rec.wins, rec.losses, category.to_string())))
            })
            .collect())
    }

    /// Percentage of outcome vectors placing each team in each category.
    #[pyo3(signature = (overrides = None))]
    pub fn enumerate(
        &self,
        overrides: Option<HashMap<String, String>>,
    ) -> PyResult<HashMap<String, HashMap<String, f64>>> {
        let overrides: SlotOverrides = overrides.unwrap_or_default().into_iter().collect();
        let agg = self.inner.enumerate_with(&overrides).map_err(season_err)?;

        Ok(agg
            .teams()
            .map(|team| {
                let pcts = agg
                    .categories(team)
                    .map(|(cat, _)| (cat.to_string(), agg.percentage(team, cat)))
                    .collect();
                (team.to_string(), pcts)
            })
            .collect())
    }

    fn __repr__(&self) -> String {
        format!(
            "Grouping({:?}, {} teams, {} series)",
            self.inner.name(),
            self.inner.records().len(),
            self.inner.series().len()
        )
    }
}

/// Python module definition
#[pymodule]
fn playoff_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGrouping>()?;

    m.add("DEFAULT_SERIES_LENGTH", crate::constants::DEFAULT_SERIES_LENGTH)?;
    m.add("DEFAULT_WILD_CARD_SLOTS", crate::constants::DEFAULT_WILD_CARD_SLOTS)?;
    m.add("BUILTIN_GROUPINGS", config::BUILTIN_GROUPINGS.to_vec())?;

    Ok(())
}
