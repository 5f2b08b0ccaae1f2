//! The draft behind the "new record" and "edit record" forms.
//!
//! Form dates are held in sortable form, the way a date input reports them.
//! They are converted to display form only when the record is written.

use crate::dates;
use crate::record::{Record, RecordFields, Status};
use chrono::{Days, NaiveDate};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Description is required")]
    DescriptionRequired,
    #[error("Creation date is required")]
    CreatedOnRequired,
    #[error("Due date is required")]
    DueOnRequired,
}

/// Whether submitting the form creates a record or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordForm {
    mode: FormMode,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub created_on: String,
    pub due_on: String,
}

impl RecordForm {
    /// A blank create form: pending, created today, due `due_in_days` later.
    pub fn new(today: NaiveDate, due_in_days: u32) -> Self {
        let due = today
            .checked_add_days(Days::new(u64::from(due_in_days)))
            .unwrap_or(today);
        Self {
            mode: FormMode::Create,
            title: String::new(),
            description: String::new(),
            status: Status::Pending,
            created_on: dates::sortable(today),
            due_on: dates::sortable(due),
        }
    }

    /// An edit form prefilled from `record`.
    pub fn edit(record: &Record) -> Self {
        Self {
            mode: FormMode::Edit(record.id.clone()),
            title: record.title.clone(),
            description: record.description.clone(),
            status: record.status,
            created_on: dates::to_sortable(&record.created_on),
            due_on: dates::to_sortable(&record.due_on),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn validate(&self) -> Result<RecordFields, FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::TitleRequired);
        }
        if self.description.trim().is_empty() {
            return Err(FormError::DescriptionRequired);
        }
        if self.created_on.trim().is_empty() {
            return Err(FormError::CreatedOnRequired);
        }
        if self.due_on.trim().is_empty() {
            return Err(FormError::DueOnRequired);
        }
        Ok(RecordFields {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            created_on: self.created_on.clone(),
            due_on: self.due_on.clone(),
        })
    }
}

/// Statuses a card can be moved to from its card menu.
pub fn available_moves(record: &Record) -> Vec<Status> {
    Status::ALL
        .into_iter()
        .filter(|status| *status != record.status)
        .collect()
}
