use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::errors::ReportError;

use super::repo_types::{CarboRate, ReferenceRow};
use super::services::NutritionReference;

const REQUIRED_FIELDS: usize = 5;
const FLAG_MARKER: &str = "x";

/// Loads the reference table from a CSV file on disk.
pub fn load_reference(path: &Path) -> anyhow::Result<NutritionReference> {
    let file = File::open(path).with_context(|| format!("open reference {}", path.display()))?;
    let reference =
        read_reference(file).with_context(|| format!("parse reference {}", path.display()))?;
    if reference.is_empty() {
        warn!(path = %path.display(), "nutrition reference has no entries");
    }
    info!(path = %path.display(), entries = reference.len(), "nutrition reference loaded");
    Ok(reference)
}

/// Parses `id,title,amount,unit,carbo[,x]` rows. The first row is a header,
/// rows starting with `#` are comments.
pub fn read_reference<R: Read>(reader: R) -> Result<NutritionReference, ReportError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.get(0).is_some_and(|f| f.starts_with('#')) {
            continue;
        }
        if record.len() < 2 {
            continue;
        }
        if record.len() < REQUIRED_FIELDS {
            return Err(ReportError::MalformedReferenceRow {
                line,
                fields: record.len(),
            });
        }
        rows.push(parse_row(&record, line)?);
    }
    debug!(rows = rows.len(), "reference rows parsed");
    NutritionReference::from_rows(rows)
}

fn parse_row(record: &StringRecord, line: u64) -> Result<ReferenceRow, ReportError> {
    let field = |i: usize| record.get(i).unwrap_or_default();
    let number = |i: usize, name: &'static str| {
        field(i)
            .parse::<f64>()
            .map_err(|_| ReportError::InvalidReferenceNumber {
                line,
                field: name,
                value: field(i).to_string(),
            })
    };

    Ok(ReferenceRow {
        id: field(0).to_string(),
        title: field(1).to_string(),
        rate: CarboRate {
            amount: number(2, "amount")?,
            unit: field(3).to_string(),
            carbo: number(4, "carbo")?,
        },
        flagged: record.get(5).is_some_and(|f| f.trim() == FLAG_MARKER),
    })
}
