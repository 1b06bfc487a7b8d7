use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::error::Result;

// Type aliases for clarity
pub type LabId = u32;
pub type TeachingId = u32;
pub type SemesterId = u32;
pub type RegistrationId = u32;
pub type Week = u32;
pub type DayOfWeek = u32;
pub type Period = u32;

/// Periods in one teaching day.
pub const PERIODS_PER_DAY: u32 = 15;
/// Days in one teaching week.
pub const DAYS_PER_WEEK: u32 = 7;
/// Longest semester a run accepts.
pub const MAX_WEEKS_PER_SEMESTER: u32 = 104;

fn default_true() -> bool {
    true
}

/// Represents a physical lab with a given seating capacity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Lab {
    pub id: LabId,
    pub capacity: u32,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// A recurring weekly class that needs lab time on a number of weeks.
///
/// `start_period..=end_period` is inclusive and lies within one day.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Teaching {
    pub id: TeachingId,
    pub registration_id: RegistrationId,
    pub day_of_week: DayOfWeek,
    pub start_period: Period,
    pub end_period: Period,
    pub number_of_students: u32,
    pub number_of_practical_weeks: u32,
    #[serde(default)]
    pub deleted: bool,
}

impl Teaching {
    pub fn periods(&self) -> impl Iterator<Item = Period> {
        self.start_period..=self.end_period
    }
}

/// One academic term and its committed occupancy snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: SemesterId,
    pub number_of_weeks: u32,
    #[serde(default)]
    pub grid: Option<GridSnapshot>,
}

/// Stored occupancy of a semester.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    /// Owner of each block of `PERIODS_PER_DAY` rows, in row order.
    pub lab_ids: Vec<LabId>,
    /// `labs * PERIODS_PER_DAY` rows by `weeks * DAYS_PER_WEEK` columns, `true` = occupied.
    pub cells: Vec<Vec<bool>>,
}

/// A registration batch scoping which teachings a run considers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: RegistrationId,
    pub semester_id: SemesterId,
}

/// One committed (lab, teaching, week) assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabUsage {
    pub id: Uuid,
    pub lab_id: LabId,
    pub teaching_id: TeachingId,
    pub semester_id: SemesterId,
    pub week: Week,
    pub day_of_week: DayOfWeek,
    pub start_period: Period,
    pub end_period: Period,
}

/// Input of one scheduling run.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub registration_id: RegistrationId,
    pub is_new: bool,
}

/// Why a teaching was left without lab time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum UnscheduledReason {
    /// Fewer free, non-adjacent weeks than required were found.
    InsufficientWeeks { found: u32, required: u32 },
    /// Enough weeks were found only by combining several labs.
    SplitAcrossLabs { labs: Vec<LabId> },
}

/// Per-teaching result of a run, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum TeachingOutcome {
    #[serde(rename_all = "camelCase")]
    Scheduled {
        teaching_id: TeachingId,
        /// `None` only when no practical weeks were required.
        lab_id: Option<LabId>,
        weeks: Vec<Week>,
    },
    #[serde(rename_all = "camelCase")]
    Unscheduled {
        teaching_id: TeachingId,
        reason: UnscheduledReason,
    },
}

impl TeachingOutcome {
    pub fn teaching_id(&self) -> TeachingId {
        match self {
            TeachingOutcome::Scheduled { teaching_id, .. }
            | TeachingOutcome::Unscheduled { teaching_id, .. } => *teaching_id,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, TeachingOutcome::Scheduled { .. })
    }
}

/// The final output of a scheduling run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub registration_id: RegistrationId,
    pub semester_id: SemesterId,
    pub scheduled: usize,
    pub unscheduled: Vec<TeachingId>,
    pub outcomes: Vec<TeachingOutcome>,
    pub lab_usages: Vec<LabUsage>,
}

/// Everything the in-memory store is seeded with.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub semesters: Vec<Semester>,
    #[serde(default)]
    pub registrations: Vec<Registration>,
    #[serde(default)]
    pub labs: Vec<Lab>,
    #[serde(default)]
    pub teachings: Vec<Teaching>,
    #[serde(default)]
    pub lab_usages: Vec<LabUsage>,
}

impl Dataset {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
