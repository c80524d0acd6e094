//! Form-shaped record input.
//!
//! A form carries every field of both kinds; only the ones matching the
//! selected type are kept. Copies arrive as one comma-separated string.
//! Fields follow url-encoded form conventions: a checked box posts `on`,
//! an unchecked box posts nothing, and an untouched input posts an empty
//! string.

use chrono::{NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer};
use serde_with::{serde_as, NoneAsEmptyString};
use utoipa::ToSchema;

use super::record::{
    BookDetails, Content, NewRecord, PeriodicalDetails, Periodicity, RecordType, DEFAULT_YEAR,
};

/// Split a comma-separated copies field, keeping order and empty entries
pub fn parse_copies(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

/// Inverse of [`parse_copies`], used to prefill an edit form
pub fn join_copies(copies: &[String]) -> String {
    copies.join(",")
}

/// Create record form
#[serde_as]
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecordForm {
    #[serde(default)]
    pub title: String,
    /// Checkbox: `on`, `true` or `1` when checked, absent when not
    #[serde(default, deserialize_with = "checkbox")]
    #[schema(value_type = Option<String>, example = "on")]
    pub available: bool,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    // Book fields
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub year: Option<i32>,
    pub publisher: Option<String>,
    pub author: Option<String>,
    /// Copies separated by commas
    pub copies: Option<String>,
    // Periodical fields
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[schema(value_type = Option<Periodicity>)]
    pub periodicity: Option<Periodicity>,
}

fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "" | "off" | "false" | "0" | "no" => Ok(false),
        other => Err(de::Error::invalid_value(
            de::Unexpected::Str(other),
            &"a checkbox value (on, true, 1, off, false, 0)",
        )),
    }
}

impl From<RecordForm> for NewRecord {
    fn from(form: RecordForm) -> Self {
        let content = match form.record_type {
            RecordType::Book => Content::Book {
                details: BookDetails {
                    year: form.year.unwrap_or(DEFAULT_YEAR),
                    publisher: form.publisher.unwrap_or_default(),
                    author: form.author.unwrap_or_default(),
                },
                copies: parse_copies(form.copies.as_deref().unwrap_or_default()),
            },
            RecordType::Periodical => Content::Periodical {
                details: PeriodicalDetails {
                    date: form.date.unwrap_or_else(|| Utc::now().date_naive()),
                    periodicity: form.periodicity.unwrap_or_default(),
                },
            },
        };
        NewRecord {
            title: form.title,
            available: form.available,
            content,
        }
    }
}
