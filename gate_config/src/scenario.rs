//! Timed operator actions for headless runs.
//!
//! CSV schema, exact headers required:
//! at_s,action,value
//!
//! Example:
//! at_s,action,value
//! 0.0,open,
//! 6.5,obstacle1,1
//! 8.0,obstacle1,0
//! 9.0,open,
//! 20.0,force_delta,72
use serde::Deserialize;
use std::io::Read;

/// One operator action, named as in the `action` column.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioAction {
    Open,
    Close,
    /// Set obstacle sensor 1; `value` must be 0 or 1.
    Obstacle1,
    /// Set obstacle sensor 2; `value` must be 0 or 1.
    Obstacle2,
    Toggle1,
    Toggle2,
    /// Add `value` to the sensed force.
    ForceDelta,
    /// Clear obstacles and force.
    Reset,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ScenarioRow {
    /// Simulation time (s) at which the action is applied.
    pub at_s: f64,
    pub action: ScenarioAction,
    pub value: Option<f64>,
}

/// Validated scenario, sorted by time. Rows with equal times keep file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    steps: Vec<ScenarioRow>,
}

impl Scenario {
    pub fn from_rows(mut rows: Vec<ScenarioRow>) -> eyre::Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            let line = idx + 2;
            if !(row.at_s.is_finite() && row.at_s >= 0.0) {
                eyre::bail!("scenario row {line}: at_s must be a finite time >= 0");
            }
            match row.action {
                ScenarioAction::Obstacle1 | ScenarioAction::Obstacle2 => match row.value {
                    Some(v) if v == 0.0 || v == 1.0 => {}
                    _ => eyre::bail!("scenario row {line}: obstacle value must be 0 or 1"),
                },
                ScenarioAction::ForceDelta => match row.value {
                    Some(v) if v.is_finite() => {}
                    _ => eyre::bail!("scenario row {line}: force_delta needs a finite value"),
                },
                ScenarioAction::Open
                | ScenarioAction::Close
                | ScenarioAction::Toggle1
                | ScenarioAction::Toggle2
                | ScenarioAction::Reset => {}
            }
        }
        rows.sort_by(|a, b| a.at_s.total_cmp(&b.at_s));
        Ok(Self { steps: rows })
    }

    pub fn steps(&self) -> &[ScenarioRow] {
        &self.steps
    }
}

/// Parse a scenario from any CSV source.
pub fn parse_scenario_csv<R: Read>(reader: R) -> eyre::Result<Scenario> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read scenario CSV headers: {}", e))?
        .clone();
    let expected = ["at_s", "action", "value"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "scenario CSV must have headers 'at_s,action,value', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<ScenarioRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid scenario row {}: {}", idx + 2, e);
            }
        }
    }

    Scenario::from_rows(rows)
}

pub fn load_scenario_csv(path: &std::path::Path) -> eyre::Result<Scenario> {
    let file = std::fs::File::open(path)
        .map_err(|e| eyre::eyre!("open scenario CSV {:?}: {}", path, e))?;
    parse_scenario_csv(file)
}
