//! Data models for the catalog

pub mod document;
pub mod form;
pub mod record;
pub mod record_id;

// Re-export commonly used types
pub use document::Document;
pub use form::RecordForm;
pub use record::{
    BookDetails, Content, Details, NewRecord, PeriodicalDetails, Periodicity, Record,
    RecordPatch, RecordQuery, RecordType, TypeFilter, WriteOutcome,
};
pub use record_id::{ObjectId, RecordId};
