//! Column schemas and row validation.
//!
//! A [`Schema`] is the static description of one import format: the exact
//! header line and one [`Rule`] per column. [`Schema::validate`] checks a
//! parsed batch against it and collects every failing field rather than
//! stopping at the first one.

use crate::parser::ImportRow;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Field name reported when the header line does not match.
pub const HEADER_FIELD: &str = "Headers";

/// Value reported when the header line does not match.
pub const HEADER_MISMATCH: &str = "Invalid headers format";

/// Reference lists a column can be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// Categories of the accounts currently in the chart of accounts.
    AccountCategory,
}

/// Validation rule applied to a single field.
#[derive(Clone, Copy)]
pub enum Rule {
    /// Anything goes, including the empty string.
    Text,
    /// Exact membership in a closed vocabulary.
    OneOf(fn(&str) -> bool),
    /// `TRUE` or `FALSE`, uppercase.
    Boolean,
    /// Decimal number with `,` or `.` as separator.
    Decimal,
    /// `DD/MM/YYYY`, format only.
    Date,
    /// Optional `H:MM` or `HH:MM`, 24-hour clock.
    Time,
    /// Exact membership in a reference list supplied at validation time.
    Known(Reference),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Text => f.write_str("Text"),
            Rule::OneOf(_) => f.write_str("OneOf"),
            Rule::Boolean => f.write_str("Boolean"),
            Rule::Decimal => f.write_str("Decimal"),
            Rule::Date => f.write_str("Date"),
            Rule::Time => f.write_str("Time"),
            Rule::Known(r) => write!(f, "Known({:?})", r),
        }
    }
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").expect("date pattern is valid")
    })
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("time pattern is valid")
    })
}

/// Splits a `DD/MM/YYYY` string into `(day, month, year)` text slices.
///
/// Returns `None` unless the string matches the date format exactly.
/// No calendar check is made, so `31/02/2024` is accepted.
pub fn split_date(raw: &str) -> Option<(&str, &str, &str)> {
    let caps = date_pattern().captures(raw)?;
    Some((
        caps.get(1)?.as_str(),
        caps.get(2)?.as_str(),
        caps.get(3)?.as_str(),
    ))
}

/// Parses the `TRUE` / `FALSE` literal.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "TRUE" => Some(true),
        "FALSE" => Some(false),
        _ => None,
    }
}

/// Reference lists available to [`Rule::Known`] columns.
#[derive(Debug, Clone, Default)]
pub struct References {
    account_categories: Vec<String>,
}

impl References {
    /// No reference data; every `Known` check fails.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_account_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        References {
            account_categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Linear membership test against the requested list.
    pub fn contains(&self, reference: Reference, value: &str) -> bool {
        match reference {
            Reference::AccountCategory => self.account_categories.iter().any(|c| c == value),
        }
    }
}

impl Rule {
    /// Returns `true` if `value` satisfies the rule.
    pub fn accepts(&self, value: &str, refs: &References) -> bool {
        match self {
            Rule::Text => true,
            Rule::OneOf(member) => member(value),
            Rule::Boolean => parse_flag(value).is_some(),
            Rule::Decimal => crate::amount::Amount::parse_localized(value).is_some(),
            Rule::Date => date_pattern().is_match(value),
            Rule::Time => value.is_empty() || time_pattern().is_match(value),
            Rule::Known(reference) => refs.contains(*reference, value),
        }
    }
}

/// One column of an import format.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Literal header text.
    pub header: &'static str,
    /// Name reported in validation errors.
    pub field: &'static str,
    pub rule: Rule,
}

impl ColumnSpec {
    /// A column whose error name equals its header.
    pub const fn new(header: &'static str, rule: Rule) -> Self {
        ColumnSpec {
            header,
            field: header,
            rule,
        }
    }

    /// A column reporting errors under a name different from its header.
    pub const fn named(header: &'static str, field: &'static str, rule: Rule) -> Self {
        ColumnSpec {
            header,
            field,
            rule,
        }
    }
}

/// A field that failed its column rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub row: usize,
    pub field: String,
    pub value: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: Invalid {} - \"{}\"", self.row, self.field, self.value)
    }
}

/// Outcome of validating a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub errors: Vec<ValidationError>,
}

impl Validation {
    /// A batch is valid iff no field failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Static description of an import format.
#[derive(Debug)]
pub struct Schema {
    pub columns: &'static [ColumnSpec],
}

impl Schema {
    pub const fn new(columns: &'static [ColumnSpec]) -> Self {
        Schema { columns }
    }

    /// The expected header line.
    pub fn header_line(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.header)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Position of the column with the given header.
    pub fn position(&self, header: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.header == header)
    }

    /// Validates a parsed batch; `rows[0]` must be the header.
    ///
    /// A header mismatch yields a single error at row 0 and skips every
    /// data row. Otherwise each column rule runs on each data row, and
    /// errors come out in row order, then column order.
    pub fn validate(&self, rows: &[ImportRow], refs: &References) -> Validation {
        let header_ok = rows
            .first()
            .map(|header| header.joined() == self.header_line())
            .unwrap_or(false);

        if !header_ok {
            return Validation {
                errors: vec![ValidationError {
                    row: 0,
                    field: HEADER_FIELD.to_string(),
                    value: HEADER_MISMATCH.to_string(),
                }],
            };
        }

        let mut errors = Vec::new();
        for row in &rows[1..] {
            for (column, spec) in self.columns.iter().enumerate() {
                let value = row.field(column);
                if !spec.rule.accepts(value, refs) {
                    errors.push(ValidationError {
                        row: row.index,
                        field: spec.field.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }

        Validation { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_rows;
    use crate::vocab::{CostCenter, Vocabulary};

    static COLUMNS: &[ColumnSpec] = &[
        ColumnSpec::new("Flag", Rule::Boolean),
        ColumnSpec::named("Center", "CostCenter", Rule::OneOf(CostCenter::contains)),
        ColumnSpec::new("When", Rule::Date),
        ColumnSpec::new("At", Rule::Time),
        ColumnSpec::new("Sum", Rule::Decimal),
        ColumnSpec::new("Note", Rule::Text),
    ];
    static SCHEMA: Schema = Schema::new(COLUMNS);

    fn validate(text: &str) -> Validation {
        SCHEMA.validate(&parse_rows(text).unwrap(), &References::none())
    }

    #[test]
    fn test_valid_batch() {
        let v = validate("Flag;Center;When;At;Sum;Note\nTRUE;Local;01/03/2024;9:05;12,5;hello\n");
        assert!(v.is_valid());
    }

    #[test]
    fn test_header_mismatch_short_circuits() {
        let v = validate("flag;Center;When;At;Sum;Note\nnope;nope;nope;nope;nope;nope\n");
        assert_eq!(v.errors.len(), 1);
        assert_eq!(v.errors[0].row, 0);
        assert_eq!(v.errors[0].field, "Headers");
        assert!(!v.is_valid());
    }

    #[test]
    fn test_header_order_matters() {
        let v = validate("Center;Flag;When;At;Sum;Note\n");
        assert_eq!(v.errors.len(), 1);
        assert_eq!(v.errors[0].field, HEADER_FIELD);
    }

    #[test]
    fn test_empty_input_is_header_mismatch() {
        let v = validate("");
        assert_eq!(v.errors.len(), 1);
        assert_eq!(v.errors[0].row, 0);
    }

    #[test]
    fn test_header_only_is_valid() {
        assert!(validate("Flag;Center;When;At;Sum;Note").is_valid());
    }

    #[test]
    fn test_collects_every_failing_field_in_column_order() {
        let v = validate("Flag;Center;When;At;Sum;Note\ntrue;local;1/3/2024;24:00;x;\n");
        let fields: Vec<_> = v.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["Flag", "CostCenter", "When", "At", "Sum"]);
        assert!(v.errors.iter().all(|e| e.row == 1));
    }

    #[test]
    fn test_row_major_order() {
        let v = validate("Flag;Center;When;At;Sum;Note\nX;Any;01/01/2024;;1;\nTRUE;Y;01/01/2024;;1;\n");
        assert_eq!(v.errors.len(), 2);
        assert_eq!((v.errors[0].row, v.errors[0].field.as_str()), (1, "Flag"));
        assert_eq!((v.errors[1].row, v.errors[1].field.as_str()), (2, "CostCenter"));
    }

    #[test]
    fn test_short_row_checks_missing_fields_as_empty() {
        let v = validate("Flag;Center;When;At;Sum;Note\nTRUE\n");
        let fields: Vec<_> = v.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["CostCenter", "When", "Sum"]);
        assert!(v.errors.iter().all(|e| e.value.is_empty()));
    }

    #[test]
    fn test_time_rule() {
        let refs = References::none();
        assert!(Rule::Time.accepts("", &refs));
        assert!(Rule::Time.accepts("0:00", &refs));
        assert!(Rule::Time.accepts("09:30", &refs));
        assert!(Rule::Time.accepts("23:59", &refs));
        assert!(!Rule::Time.accepts("24:00", &refs));
        assert!(!Rule::Time.accepts("12:60", &refs));
        assert!(!Rule::Time.accepts("12:5", &refs));
        assert!(!Rule::Time.accepts(" 12:00", &refs));
    }

    #[test]
    fn test_date_rule_is_format_only() {
        let refs = References::none();
        assert!(Rule::Date.accepts("31/02/2024", &refs));
        assert!(Rule::Date.accepts("01/03/2024", &refs));
        assert!(!Rule::Date.accepts("2024-03-01", &refs));
        assert!(!Rule::Date.accepts("1/3/2024", &refs));
        assert!(!Rule::Date.accepts("01/03/24", &refs));
        assert!(!Rule::Date.accepts("", &refs));
    }

    #[test]
    fn test_boolean_rule_is_uppercase_only() {
        let refs = References::none();
        assert!(Rule::Boolean.accepts("TRUE", &refs));
        assert!(Rule::Boolean.accepts("FALSE", &refs));
        assert!(!Rule::Boolean.accepts("true", &refs));
        assert!(!Rule::Boolean.accepts("TRUE ", &refs));
    }

    #[test]
    fn test_known_rule() {
        let refs = References::with_account_categories(["Diezmo Regular"]);
        let rule = Rule::Known(Reference::AccountCategory);
        assert!(rule.accepts("Diezmo Regular", &refs));
        assert!(!rule.accepts("Diezmo regular", &refs));
        assert!(!rule.accepts("Diezmo Regular", &References::none()));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let rows = parse_rows("Flag;Center;When;At;Sum;Note\nX;Y;Z;W;V;U\n").unwrap();
        let first = SCHEMA.validate(&rows, &References::none());
        let second = SCHEMA.validate(&rows, &References::none());
        assert_eq!(first, second);
    }

    #[test]
    fn test_split_date() {
        assert_eq!(split_date("05/11/2023"), Some(("05", "11", "2023")));
        assert_eq!(split_date("5/11/2023"), None);
    }

    #[test]
    fn test_error_display() {
        let e = ValidationError {
            row: 3,
            field: "Amount".into(),
            value: "abc".into(),
        };
        assert_eq!(e.to_string(), "Row 3: Invalid Amount - \"abc\"");
    }
}
