//! Stored document shape of the `ouvrages` collection.
//!
//! Documents keep the field names the catalog has always used (`titre`,
//! `dispo`, `détails`, ...) so records written before this server existed
//! stay readable. The misspelled `peridicité` key is part of that format.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, BoolFromInt};

use super::record::{
    BookDetails, Content, Details, NewRecord, PeriodicalDetails, Periodicity, Record, RecordPatch,
    RecordType, DEFAULT_YEAR,
};
use super::record_id::RecordId;
use crate::error::{AppError, AppResult};

/// JSON object stored for one record
pub type Document = Map<String, Value>;

/// Key of the identifier inside a document
pub const ID_KEY: &str = "_id";

/// Key of the record type inside a document
pub const TYPE_KEY: &str = "type";

impl RecordType {
    /// Value of the `type` key in stored documents
    pub fn document_tag(&self) -> &'static str {
        match self {
            RecordType::Book => "livres",
            RecordType::Periodical => "periodique",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Periodicite {
    Hebdomadaire,
    Mensuel,
    Journalier,
}

impl From<Periodicity> for Periodicite {
    fn from(p: Periodicity) -> Self {
        match p {
            Periodicity::Weekly => Periodicite::Hebdomadaire,
            Periodicity::Monthly => Periodicite::Mensuel,
            Periodicity::Daily => Periodicite::Journalier,
        }
    }
}

impl From<Periodicite> for Periodicity {
    fn from(p: Periodicite) -> Self {
        match p {
            Periodicite::Hebdomadaire => Periodicity::Weekly,
            Periodicite::Mensuel => Periodicity::Monthly,
            Periodicite::Journalier => Periodicity::Daily,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LivreDetails {
    #[serde(rename = "année", default = "default_annee", deserialize_with = "lenient_annee")]
    annee: i32,
    #[serde(default)]
    edition: String,
    #[serde(default)]
    auteur: String,
}

fn default_annee() -> i32 {
    DEFAULT_YEAR
}

/// Older documents hold years as strings, floats or nothing at all.
/// Anything that is not a whole year reads as [`DEFAULT_YEAR`].
fn lenient_annee<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let year = match &value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    Ok(year.unwrap_or(DEFAULT_YEAR))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PeriodiqueDetails {
    date: NaiveDate,
    #[serde(rename = "peridicité")]
    periodicite: Periodicite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
enum Contenu {
    #[serde(rename = "livres")]
    Livre {
        #[serde(rename = "détails")]
        details: LivreDetails,
        #[serde(rename = "exemplaires", default)]
        exemplaires: Vec<String>,
    },
    #[serde(rename = "periodique")]
    Periodique {
        #[serde(rename = "détails")]
        details: PeriodiqueDetails,
    },
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Ouvrage {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    #[serde(rename = "titre", default)]
    titre: String,
    #[serde_as(as = "BoolFromInt")]
    #[serde(rename = "dispo")]
    dispo: bool,
    #[serde(flatten)]
    contenu: Contenu,
}

impl From<BookDetails> for LivreDetails {
    fn from(d: BookDetails) -> Self {
        Self {
            annee: d.year,
            edition: d.publisher,
            auteur: d.author,
        }
    }
}

impl From<PeriodicalDetails> for PeriodiqueDetails {
    fn from(d: PeriodicalDetails) -> Self {
        Self {
            date: d.date,
            periodicite: d.periodicity.into(),
        }
    }
}

impl From<Content> for Contenu {
    fn from(content: Content) -> Self {
        match content {
            Content::Book { details, copies } => Contenu::Livre {
                details: details.into(),
                exemplaires: copies,
            },
            Content::Periodical { details } => Contenu::Periodique {
                details: details.into(),
            },
        }
    }
}

impl From<Contenu> for Content {
    fn from(contenu: Contenu) -> Self {
        match contenu {
            Contenu::Livre {
                details,
                exemplaires,
            } => Content::Book {
                details: BookDetails {
                    year: details.annee,
                    publisher: details.edition,
                    author: details.auteur,
                },
                copies: exemplaires,
            },
            Contenu::Periodique { details } => Content::Periodical {
                details: PeriodicalDetails {
                    date: details.date,
                    periodicity: details.periodicite.into(),
                },
            },
        }
    }
}

fn to_document<T: Serialize>(value: &T) -> AppResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Internal(format!(
            "Expected a JSON object, got {}",
            other
        ))),
    }
}

/// Build the document to insert for a new record (without `_id`)
pub fn new_document(record: NewRecord) -> AppResult<Document> {
    to_document(&Ouvrage {
        id: None,
        titre: record.title,
        dispo: record.available,
        contenu: record.content.into(),
    })
}

/// Read a stored document back into a record
pub fn record_from_document(doc: Document) -> AppResult<Record> {
    let ouvrage: Ouvrage = serde_json::from_value(Value::Object(doc))?;
    let id = ouvrage
        .id
        .ok_or_else(|| AppError::Internal("Stored document has no _id".to_string()))?;
    Ok(Record {
        id,
        title: ouvrage.titre,
        available: ouvrage.dispo,
        content: ouvrage.contenu.into(),
    })
}

/// Translate a patch into the top-level keys to overwrite
pub fn patch_document(patch: &RecordPatch) -> AppResult<Document> {
    let mut set = Document::new();
    if let Some(title) = &patch.title {
        set.insert("titre".to_string(), Value::from(title.clone()));
    }
    if let Some(available) = patch.available {
        set.insert("dispo".to_string(), Value::from(u8::from(available)));
    }
    if let Some(details) = &patch.details {
        let value = match details {
            Details::Book(book) => serde_json::to_value(LivreDetails::from(book.clone()))?,
            Details::Periodical(periodical) => {
                serde_json::to_value(PeriodiqueDetails::from(periodical.clone()))?
            }
        };
        set.insert("détails".to_string(), value);
    }
    if let Some(copies) = &patch.copies {
        set.insert("exemplaires".to_string(), serde_json::to_value(copies)?);
    }
    Ok(set)
}

/// Record type of a stored document, if it carries a known tag
pub fn document_type(doc: &Document) -> Option<RecordType> {
    match doc.get(TYPE_KEY).and_then(Value::as_str) {
        Some("livres") => Some(RecordType::Book),
        Some("periodique") => Some(RecordType::Periodical),
        _ => None,
    }
}
