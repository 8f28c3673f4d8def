//! Bulk record import: parse, validate, reconcile, merge.
//!
//! The pipeline is shared by every [`Importable`] record kind. A batch is
//! merged all-or-nothing: if any field fails validation nothing is added.
//! Rows whose natural key already exists in the store are skipped and
//! reported, which does not invalidate the rest of the batch.

use crate::amount::Amount;
use crate::date::RecordDate;
use crate::error::Result;
use crate::parser::{parse_rows, ImportRow};
use crate::schema::{parse_flag, References, Schema, ValidationError};
use crate::store::{Record, RecordId, Store};
use crate::vocab::Vocabulary;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;

/// Who is importing, and when. Stamped on every created record.
#[derive(Debug, Clone)]
pub struct ImportContext {
    pub actor: String,
    pub at: DateTime<Utc>,
}

impl ImportContext {
    pub fn now(actor: &str) -> Self {
        ImportContext {
            actor: actor.to_string(),
            at: Utc::now(),
        }
    }
}

/// A valid row skipped because its natural key is already taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    pub row: usize,
    /// Display form of the colliding natural key.
    pub key: String,
}

impl fmt::Display for DuplicateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.key)
    }
}

/// Outcome of one import call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Ids of the records that were merged.
    pub imported: Vec<RecordId>,
    pub duplicates: Vec<DuplicateRecord>,
    pub errors: Vec<ValidationError>,
}

impl ImportReport {
    /// `true` when validation failed and nothing was merged.
    pub fn is_rejected(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Typed access to the fields of a validated row, by header name.
pub struct RowReader<'a> {
    schema: &'static Schema,
    row: &'a ImportRow,
}

impl<'a> RowReader<'a> {
    pub fn new(schema: &'static Schema, row: &'a ImportRow) -> Self {
        RowReader { schema, row }
    }

    pub fn index(&self) -> usize {
        self.row.index
    }

    /// Raw text of the column with `header`.
    pub fn text(&self, header: &str) -> &'a str {
        match self.schema.position(header) {
            Some(column) => self.row.field(column),
            None => "",
        }
    }

    /// Raw text, or `None` when the field is empty.
    pub fn optional(&self, header: &str) -> Option<String> {
        let value = self.text(header);
        (!value.is_empty()).then(|| value.to_string())
    }

    fn invalid(&self, header: &str) -> ValidationError {
        let field = self
            .schema
            .columns
            .iter()
            .find(|c| c.header == header)
            .map(|c| c.field)
            .unwrap_or(header);
        ValidationError {
            row: self.row.index,
            field: field.to_string(),
            value: self.text(header).to_string(),
        }
    }

    pub fn member<V: Vocabulary>(&self, header: &str) -> std::result::Result<V, ValidationError> {
        V::parse(self.text(header)).ok_or_else(|| self.invalid(header))
    }

    pub fn flag(&self, header: &str) -> std::result::Result<bool, ValidationError> {
        parse_flag(self.text(header)).ok_or_else(|| self.invalid(header))
    }

    pub fn amount(&self, header: &str) -> std::result::Result<Amount, ValidationError> {
        Amount::parse_localized(self.text(header)).ok_or_else(|| self.invalid(header))
    }

    pub fn date(&self, header: &str) -> std::result::Result<RecordDate, ValidationError> {
        RecordDate::from_display(self.text(header)).ok_or_else(|| self.invalid(header))
    }
}

/// A record kind that can be bulk-imported.
pub trait Importable: Record<Key = RecordId> {
    /// Natural key compared against existing records.
    type NaturalKey: PartialEq + fmt::Display;

    fn schema() -> &'static Schema;

    fn natural_key(&self) -> Self::NaturalKey;

    /// Natural key of a row that passed validation.
    fn row_key(row: &RowReader<'_>) -> Self::NaturalKey;

    /// Builds the typed record for a row that passed validation.
    fn from_row(
        id: RecordId,
        row: &RowReader<'_>,
        ctx: &ImportContext,
    ) -> std::result::Result<Self, ValidationError>;
}

/// New records and skipped duplicates for a validated batch.
#[derive(Debug)]
pub struct Reconciliation<T> {
    pub records: Vec<T>,
    pub duplicates: Vec<DuplicateRecord>,
    /// Conversion failures; empty for any batch that passed validation.
    pub errors: Vec<ValidationError>,
}

/// Splits validated data rows into new records and duplicates.
///
/// Each row is compared with the existing records only, by a linear scan.
/// New records receive consecutive ids starting at `first_id`.
pub fn reconcile<'a, T, I>(
    rows: &[ImportRow],
    existing: I,
    first_id: RecordId,
    detect_duplicates: bool,
    ctx: &ImportContext,
) -> Reconciliation<T>
where
    T: Importable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let known: Vec<T::NaturalKey> = if detect_duplicates {
        existing.into_iter().map(|r| r.natural_key()).collect()
    } else {
        Vec::new()
    };

    let mut result = Reconciliation {
        records: Vec::new(),
        duplicates: Vec::new(),
        errors: Vec::new(),
    };

    for row in rows {
        let reader = RowReader::new(T::schema(), row);

        if detect_duplicates {
            let key = T::row_key(&reader);
            if known.iter().any(|k| k == &key) {
                debug!("Row {}: {} '{}' already exists, skipping", row.index, T::KIND, key);
                result.duplicates.push(DuplicateRecord {
                    row: row.index,
                    key: key.to_string(),
                });
                continue;
            }
        }

        let id = first_id + result.records.len() as RecordId;
        match T::from_row(id, &reader, ctx) {
            Ok(record) => result.records.push(record),
            Err(e) => result.errors.push(e),
        }
    }

    result
}

/// Runs the whole pipeline for `text` against `store`.
///
/// Validation failures and duplicates are reported in the returned
/// [`ImportReport`]; `Err` is only returned if the text cannot be read.
pub fn import_into<T: Importable>(
    store: &mut Store<T>,
    text: &str,
    refs: &References,
    detect_duplicates: bool,
    ctx: &ImportContext,
) -> Result<ImportReport> {
    let rows = parse_rows(text)?;
    let validation = T::schema().validate(&rows, refs);

    if !validation.is_valid() {
        warn!(
            "{} import rejected: {} invalid field(s)",
            T::KIND,
            validation.errors.len()
        );
        return Ok(ImportReport {
            errors: validation.errors,
            ..ImportReport::default()
        });
    }

    if !detect_duplicates {
        debug!("{} import: duplicate detection disabled", T::KIND);
    }

    let outcome = reconcile::<T, _>(
        &rows[1..],
        store.list(),
        store.next_id(),
        detect_duplicates,
        ctx,
    );

    if !outcome.errors.is_empty() {
        warn!(
            "{} import rejected: {} row(s) could not be converted",
            T::KIND,
            outcome.errors.len()
        );
        return Ok(ImportReport {
            errors: outcome.errors,
            ..ImportReport::default()
        });
    }

    let imported: Vec<RecordId> = outcome.records.iter().map(|r| r.key()).collect();
    store.extend(outcome.records);

    info!(
        "{} import: {} imported, {} duplicate(s) skipped",
        T::KIND,
        imported.len(),
        outcome.duplicates.len()
    );

    Ok(ImportReport {
        imported,
        duplicates: outcome.duplicates,
        errors: Vec::new(),
    })
}
