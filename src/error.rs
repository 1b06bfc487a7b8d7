use thiserror::Error;

use crate::data::{LabId, RegistrationId, SemesterId, TeachingId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Registration {0} does not exist")]
    RegistrationNotFound(RegistrationId),

    #[error("Semester {0} does not exist")]
    SemesterNotFound(SemesterId),

    #[error("Stored grid is {found} but the semester requires {expected}")]
    GridDimensionMismatch { expected: String, found: String },

    #[error("Stored grid belongs to labs {found:?} but the active labs are {expected:?}")]
    GridLabMismatch {
        expected: Vec<LabId>,
        found: Vec<LabId>,
    },

    #[error("Semester {semester_id} cannot be scheduled: {reason}")]
    InvalidSemester {
        semester_id: SemesterId,
        reason: String,
    },

    #[error("Scheduling run passed its deadline before committing")]
    DeadlineExceeded,

    #[error("Teaching {teaching_id} cannot be scheduled: {reason}")]
    InvalidTeaching {
        teaching_id: TeachingId,
        reason: String,
    },

    #[error("File not found or could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned by an earlier panic")]
    StorePoisoned,
}

pub type Result<T> = std::result::Result<T, Error>;
