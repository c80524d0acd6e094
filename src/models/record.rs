//! Catalog record model (books and periodicals) and related types

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::record_id::RecordId;
use crate::error::{AppError, AppResult};

/// Year a new book form starts with
pub const DEFAULT_YEAR: i32 = 2000;

/// Record kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Book,
    Periodical,
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::Book => write!(f, "book"),
            RecordType::Periodical => write!(f, "periodical"),
        }
    }
}

/// Publication rhythm of a periodical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    #[default]
    Weekly,
    Monthly,
    Daily,
}

impl std::str::FromStr for Periodicity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Periodicity::Weekly),
            "monthly" => Ok(Periodicity::Monthly),
            "daily" => Ok(Periodicity::Daily),
            other => Err(AppError::BadRequest(format!("Unknown periodicity: {}", other))),
        }
    }
}

/// Bibliographic details of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookDetails {
    /// Publication year (1900 to the current year)
    #[validate(range(min = 1900))]
    pub year: i32,
    pub publisher: String,
    pub author: String,
}

/// Issue details of a periodical
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PeriodicalDetails {
    /// Publication date (YYYY-MM-DD)
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub date: NaiveDate,
    pub periodicity: Periodicity,
}

/// Details payload, told apart by its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Details {
    Book(BookDetails),
    Periodical(PeriodicalDetails),
}

impl Details {
    pub fn record_type(&self) -> RecordType {
        match self {
            Details::Book(_) => RecordType::Book,
            Details::Periodical(_) => RecordType::Periodical,
        }
    }
}

/// Kind-specific part of a record. Only books carry copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Book {
        details: BookDetails,
        /// Copy identifiers, in shelf order
        #[serde(default)]
        copies: Vec<String>,
    },
    Periodical {
        details: PeriodicalDetails,
    },
}

impl Content {
    pub fn record_type(&self) -> RecordType {
        match self {
            Content::Book { .. } => RecordType::Book,
            Content::Periodical { .. } => RecordType::Periodical,
        }
    }

    pub fn details(&self) -> Details {
        match self {
            Content::Book { details, .. } => Details::Book(details.clone()),
            Content::Periodical { details } => Details::Periodical(details.clone()),
        }
    }

    pub fn copies(&self) -> &[String] {
        match self {
            Content::Book { copies, .. } => copies,
            Content::Periodical { .. } => &[],
        }
    }
}

/// Full record as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Record {
    #[schema(value_type = String, example = "65f1a2b3c4d5e6f708192a3b")]
    pub id: RecordId,
    pub title: String,
    pub available: bool,
    #[serde(flatten)]
    pub content: Content,
}

impl Record {
    pub fn record_type(&self) -> RecordType {
        self.content.record_type()
    }
}

/// Create record request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(flatten)]
    pub content: Content,
}

fn default_available() -> bool {
    true
}

impl NewRecord {
    /// Check the book year bounds. Empty strings are accepted everywhere.
    pub fn validate(&self) -> AppResult<()> {
        match &self.content {
            Content::Book { details, .. } => validate_book(details),
            Content::Periodical { .. } => Ok(()),
        }
    }

    pub fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            title: self.title,
            available: self.available,
            content: self.content,
        }
    }
}

/// Partial update request: only the fields present are overwritten.
/// The record type never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecordPatch {
    pub title: Option<String>,
    pub available: Option<bool>,
    pub details: Option<Details>,
    pub copies: Option<Vec<String>>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.available.is_none()
            && self.details.is_none()
            && self.copies.is_none()
    }

    /// Check the patch against the type of the record it applies to
    pub fn validate_for(&self, record_type: RecordType) -> AppResult<()> {
        match &self.details {
            Some(details) if details.record_type() != record_type => {
                return Err(AppError::Validation(format!(
                    "Cannot apply {} details to a {}",
                    details.record_type(),
                    record_type
                )));
            }
            Some(Details::Book(book)) => validate_book(book)?,
            _ => {}
        }
        if self.copies.is_some() && record_type != RecordType::Book {
            return Err(AppError::Validation(
                "Copies can only be set on books".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_book(details: &BookDetails) -> AppResult<()> {
    let current_year = Utc::now().year();
    details
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if details.year > current_year {
        return Err(AppError::Validation(format!(
            "year: {} is after the current year {}",
            details.year, current_year
        )));
    }
    Ok(())
}

/// Listing filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Books,
    Periodicals,
}

impl TypeFilter {
    pub fn record_type(&self) -> Option<RecordType> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Books => Some(RecordType::Book),
            TypeFilter::Periodicals => Some(RecordType::Periodical),
        }
    }
}

/// Query parameters of the listing endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecordQuery {
    /// all, books or periodicals
    #[serde(rename = "type", default)]
    #[param(inline)]
    pub record_type: TypeFilter,
}

/// Result of a mutating operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WriteOutcome {
    /// Number of records the identifier matched
    pub matched: u64,
    /// Number of records actually changed or removed
    pub affected: u64,
    /// Message for the operator
    pub message: String,
}

impl WriteOutcome {
    pub fn updated(matched: u64, modified: u64) -> Self {
        let message = match (matched, modified) {
            (0, _) => "No record matched".to_string(),
            (_, 0) => "Record unchanged".to_string(),
            _ => "Record updated".to_string(),
        };
        Self {
            matched,
            affected: modified,
            message,
        }
    }

    pub fn deleted(deleted: u64) -> Self {
        let message = if deleted == 0 {
            "No record matched".to_string()
        } else {
            "Record deleted".to_string()
        };
        Self {
            matched: deleted,
            affected: deleted,
            message,
        }
    }
}
