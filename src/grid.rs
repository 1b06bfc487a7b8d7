//! Occupancy grid of one semester.
//!
//! Rows are `lab * PERIODS_PER_DAY + period`, columns are
//! `week * DAYS_PER_WEEK + day_of_week`. A `true` cell is committed.

use crate::data::{DAYS_PER_WEEK, DayOfWeek, PERIODS_PER_DAY, Period, Week};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    labs: usize,
    weeks: u32,
    cells: Vec<Vec<bool>>,
}

impl OccupancyGrid {
    /// All cells free, for a brand-new schedule.
    ///
    /// Callers bound `weeks` by `MAX_WEEKS_PER_SEMESTER` first.
    pub fn empty(labs: usize, weeks: u32) -> Self {
        let height = labs * PERIODS_PER_DAY as usize;
        let width = weeks as usize * DAYS_PER_WEEK as usize;
        Self {
            labs,
            weeks,
            cells: vec![vec![false; width]; height],
        }
    }

    /// Deep copy of a stored snapshot, for an incremental run.
    ///
    /// Fails when the snapshot does not have the shape `labs` and `weeks` imply.
    pub fn from_snapshot(snapshot: &[Vec<bool>], labs: usize, weeks: u32) -> Result<Self> {
        let height = labs * PERIODS_PER_DAY as usize;
        let width = weeks as usize * DAYS_PER_WEEK as usize;
        let ragged = snapshot.iter().find(|row| row.len() != width);
        if snapshot.len() != height || ragged.is_some() {
            let found_width = ragged.or(snapshot.first()).map_or(0, |row| row.len());
            return Err(Error::GridDimensionMismatch {
                expected: format!("{height}x{width}"),
                found: format!("{}x{}", snapshot.len(), found_width),
            });
        }
        Ok(Self {
            labs,
            weeks,
            cells: snapshot.to_vec(),
        })
    }

    pub fn labs(&self) -> usize {
        self.labs
    }

    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    /// Maps a (lab, period, week, day) address to its (row, column).
    pub fn cell(lab: usize, period: Period, week: Week, day_of_week: DayOfWeek) -> (usize, usize) {
        debug_assert!(period < PERIODS_PER_DAY && day_of_week < DAYS_PER_WEEK);
        let row = lab * PERIODS_PER_DAY as usize + period as usize;
        let column = week as usize * DAYS_PER_WEEK as usize + day_of_week as usize;
        (row, column)
    }

    pub fn is_free(&self, lab: usize, period: Period, week: Week, day_of_week: DayOfWeek) -> bool {
        let (row, column) = Self::cell(lab, period, week, day_of_week);
        !self.cells[row][column]
    }

    pub fn mark_occupied(&mut self, lab: usize, period: Period, week: Week, day_of_week: DayOfWeek) {
        let (row, column) = Self::cell(lab, period, week, day_of_week);
        debug_assert!(!self.cells[row][column], "cell ({row}, {column}) marked twice");
        self.cells[row][column] = true;
    }

    pub fn is_range_free(
        &self,
        lab: usize,
        periods: impl IntoIterator<Item = Period>,
        week: Week,
        day_of_week: DayOfWeek,
    ) -> bool {
        periods
            .into_iter()
            .all(|period| self.is_free(lab, period, week, day_of_week))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| **cell).count()
    }

    /// Copy of the cells in the layout stored on the semester.
    pub fn snapshot(&self) -> Vec<Vec<bool>> {
        self.cells.clone()
    }

    pub fn into_snapshot(self) -> Vec<Vec<bool>> {
        self.cells
    }
}
