//! Case records and their persisted document shape.
//!
//! A record is stored as `{ uid, codigo, descripcion, estado, creado, vencimiento }`.
//! `uid` and `estado` are required; everything else defaults to empty text.

use crate::connectors::store::{DocumentFields, RawDocument};
use crate::dates;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading records out of raw documents.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The document is missing a required field or carries a bad value
    #[error("Document {id} is malformed: {reason}")]
    MalformedDocument { id: String, reason: String },
    #[error("Unknown status '{0}'")]
    UnknownStatus(String),
}

/// The four board columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "En Proceso")]
    InProgress,
    #[serde(rename = "En Pausa")]
    Paused,
    #[serde(rename = "Completada")]
    Completed,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Pending,
        Status::InProgress,
        Status::Paused,
        Status::Completed,
    ];

    /// The label persisted in `estado` and shown as the column title.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "Pendiente",
            Status::InProgress => "En Proceso",
            Status::Paused => "En Pausa",
            Status::Completed => "Completada",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Status {
    type Err = RecordError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.label() == label)
            .ok_or_else(|| RecordError::UnknownStatus(label.to_string()))
    }
}

/// One tracked case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub created_on: String,
    pub due_on: String,
}

impl Record {
    /// Returns the record with both dates in sortable form.
    pub fn normalized(self) -> Self {
        Self {
            created_on: dates::to_sortable(&self.created_on),
            due_on: dates::to_sortable(&self.due_on),
            ..self
        }
    }
}

/// The user-editable part of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub created_on: String,
    pub due_on: String,
}

impl RecordFields {
    /// Builds the persisted document for `owner_id`. Dates are written in display form.
    pub fn to_document(&self, owner_id: &str) -> DocumentFields {
        let mut fields = DocumentFields::new();
        fields.insert("uid".into(), Value::from(owner_id));
        fields.insert("codigo".into(), Value::from(self.title.as_str()));
        fields.insert("descripcion".into(), Value::from(self.description.as_str()));
        fields.insert("estado".into(), Value::from(self.status.label()));
        fields.insert("creado".into(), Value::from(dates::to_display(&self.created_on)));
        fields.insert("vencimiento".into(), Value::from(dates::to_display(&self.due_on)));
        fields
    }
}

/// Document payload for a status-only change.
pub fn status_document(status: Status) -> DocumentFields {
    let mut fields = DocumentFields::new();
    fields.insert("estado".into(), Value::from(status.label()));
    fields
}

#[derive(Deserialize)]
struct StoredRecord {
    uid: String,
    estado: String,
    #[serde(default)]
    codigo: Option<String>,
    #[serde(default)]
    descripcion: Option<String>,
    #[serde(default)]
    creado: Option<String>,
    #[serde(default)]
    vencimiento: Option<String>,
}

impl TryFrom<RawDocument> for Record {
    type Error = RecordError;

    fn try_from(document: RawDocument) -> Result<Self, Self::Error> {
        let RawDocument { id, fields } = document;
        let stored: StoredRecord =
            serde_json::from_value(Value::Object(fields)).map_err(|e| {
                RecordError::MalformedDocument {
                    id: id.clone(),
                    reason: e.to_string(),
                }
            })?;
        let status = stored
            .estado
            .parse::<Status>()
            .map_err(|e| RecordError::MalformedDocument {
                id: id.clone(),
                reason: e.to_string(),
            })?;
        Ok(Record {
            id,
            owner_id: stored.uid,
            title: stored.codigo.unwrap_or_default(),
            description: stored.descripcion.unwrap_or_default(),
            status,
            created_on: stored.creado.unwrap_or_default(),
            due_on: stored.vencimiento.unwrap_or_default(),
        })
    }
}
