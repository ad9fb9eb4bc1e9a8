//! CSV population loader.
//!
//! # CSV format
//!
//! One row per citizen.  Only `x`, `y` and `age` are required; the other
//! columns may be empty or absent.
//!
//! ```csv
//! x,y,age,profession,education,nav,ticks_per_tile,home_x,home_y
//! 2,3,34,clerk,secondary,pedestrian,1,2,2
//! 5,3,9,,,,,5,2
//! ```
//!
//! `home_x` / `home_y` name any tile of the citizen's home building; the
//! simulation builder resolves it to a `BuildingId`.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use tc_core::{NavKind, Position};

use crate::{AgentError, AgentResult, CitizenBuilder, EducationLevel, Profession};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CitizenRecord {
    x:   i32,
    y:   i32,
    age: u32,
    #[serde(default)]
    profession:     Option<String>,
    #[serde(default)]
    education:      Option<String>,
    #[serde(default)]
    nav:            Option<String>,
    #[serde(default)]
    ticks_per_tile: Option<u32>,
    #[serde(default)]
    home_x:         Option<i32>,
    #[serde(default)]
    home_y:         Option<i32>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load one `CitizenBuilder` per row of a CSV file, in file order.
pub fn load_citizens_csv(path: &Path) -> AgentResult<Vec<CitizenBuilder>> {
    let file = std::fs::File::open(path).map_err(AgentError::Io)?;
    load_citizens_reader(file)
}

/// Like [`load_citizens_csv`] but accepts any `Read` source.
pub fn load_citizens_reader<R: Read>(reader: R) -> AgentResult<Vec<CitizenBuilder>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut builders = Vec::new();

    for (row, result) in csv_reader.deserialize::<CitizenRecord>().enumerate() {
        // +2: one for the header, one for 1-based line numbers.
        let line = row + 2;
        let r = result.map_err(|e| AgentError::Parse(format!("line {line}: {e}")))?;
        builders.push(to_builder(r, line)?);
    }

    Ok(builders)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn to_builder(r: CitizenRecord, line: usize) -> AgentResult<CitizenBuilder> {
    let profession = parse_column(r.profession.as_deref(), Profession::parse, "profession", line)?;
    let education  = parse_column(r.education.as_deref(), EducationLevel::parse, "education", line)?;
    let nav        = parse_column(r.nav.as_deref(), NavKind::parse, "nav", line)?;

    let mut b = CitizenBuilder::new(Position::new(r.x, r.y))
        .age(r.age)
        .profession(profession.unwrap_or_default())
        .education(education.unwrap_or_default())
        .nav(nav.unwrap_or_default())
        .speed(r.ticks_per_tile.unwrap_or(1));

    match (r.home_x, r.home_y) {
        (Some(x), Some(y)) => b = b.home_at(Position::new(x, y)),
        (None, None) => {}
        _ => {
            return Err(AgentError::Parse(format!(
                "line {line}: home_x and home_y must be given together"
            )))
        }
    }
    Ok(b)
}

fn parse_column<T>(
    value:  Option<&str>,
    parse:  fn(&str) -> Option<T>,
    column: &str,
    line:   usize,
) -> AgentResult<Option<T>> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse(s)
            .map(Some)
            .ok_or_else(|| AgentError::Parse(format!("line {line}: invalid {column} {s:?}"))),
    }
}
