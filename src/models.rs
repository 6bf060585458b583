use super::{db_ops::Notes, errors::ValidationError};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_CHARS: usize = 200;

/// A snapshot of one row of the `notes` table. Changing it changes nothing
/// in storage; go through [`Notes`] for that.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct NotesList {
    pub items: Vec<Note>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NoteCreate {
    pub title: String,
    pub content: String,
}

/// `None` means "leave it alone". There is no way to clear a title, but
/// `Some("")` does clear the content.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NoteUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Payloads check their own field constraints before anything touches
/// storage.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::new("title", "must not be empty"));
    }
    if len > TITLE_MAX_CHARS {
        return Err(ValidationError::new(
            "title",
            format!("must be at most {TITLE_MAX_CHARS} characters"),
        ));
    }
    Ok(())
}

impl Validate for NoteCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

impl Validate for NoteUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub notes: Notes,
}
