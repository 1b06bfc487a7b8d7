//! Greedy allocation of teachings to labs and weeks.
//!
//! Teachings are processed once each in ranking order. A teaching is
//! committed only when the search yields exactly the required number of
//! weeks, all in one lab; otherwise it is skipped without touching the grid.

use itertools::Itertools;
use log::{debug, info};
use std::time::Instant;
use uuid::Uuid;

use crate::data::{
    Lab, LabUsage, SemesterId, Teaching, TeachingOutcome, UnscheduledReason,
};
use crate::grid::OccupancyGrid;
use crate::ranking::{rank_labs, rank_teachings};
use crate::search::{CandidateSlot, find_candidate_slots};

/// Records and outcomes produced by one allocation pass.
#[derive(Debug, Clone, Default)]
pub struct Allocation {
    pub lab_usages: Vec<LabUsage>,
    pub outcomes: Vec<TeachingOutcome>,
}

impl Allocation {
    pub fn scheduled_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_scheduled()).count()
    }
}

/// Allocates `teachings` into `grid`.
///
/// `labs` must be in the grid's lab-axis order.
pub fn allocate(
    teachings: &[Teaching],
    labs: &[Lab],
    semester_id: SemesterId,
    grid: &mut OccupancyGrid,
) -> Allocation {
    let start_time = Instant::now();
    info!(
        "Allocating {} teachings over {} labs and {} weeks...",
        teachings.len(),
        labs.len(),
        grid.weeks()
    );

    let ranked_labs = rank_labs(labs);
    let mut allocation = Allocation::default();

    for teaching in rank_teachings(teachings) {
        let candidates = find_candidate_slots(teaching, &ranked_labs, grid);
        let outcome = match check_candidates(teaching, &candidates) {
            Ok(()) => commit(teaching, &candidates, semester_id, grid, &mut allocation.lab_usages),
            Err(reason) => TeachingOutcome::Unscheduled {
                teaching_id: teaching.id,
                reason,
            },
        };
        debug!("Teaching {}: {:?}", teaching.id, outcome);
        allocation.outcomes.push(outcome);
    }

    info!(
        "Allocated {}/{} teachings ({} lab usages) in {:.2?}",
        allocation.scheduled_count(),
        teachings.len(),
        allocation.lab_usages.len(),
        start_time.elapsed()
    );
    allocation
}

fn check_candidates(
    teaching: &Teaching,
    candidates: &[CandidateSlot],
) -> Result<(), UnscheduledReason> {
    let required = teaching.number_of_practical_weeks;
    if candidates.len() != required as usize {
        return Err(UnscheduledReason::InsufficientWeeks {
            found: candidates.len() as u32,
            required,
        });
    }
    let labs: Vec<_> = candidates.iter().map(|slot| slot.lab_id).unique().collect();
    if labs.len() > 1 {
        return Err(UnscheduledReason::SplitAcrossLabs { labs });
    }
    Ok(())
}

fn commit(
    teaching: &Teaching,
    candidates: &[CandidateSlot],
    semester_id: SemesterId,
    grid: &mut OccupancyGrid,
    lab_usages: &mut Vec<LabUsage>,
) -> TeachingOutcome {
    for slot in candidates {
        for period in teaching.periods() {
            grid.mark_occupied(slot.lab_index, period, slot.week, teaching.day_of_week);
        }
        lab_usages.push(LabUsage {
            id: Uuid::new_v4(),
            lab_id: slot.lab_id,
            teaching_id: teaching.id,
            semester_id,
            week: slot.week,
            day_of_week: teaching.day_of_week,
            start_period: teaching.start_period,
            end_period: teaching.end_period,
        });
    }

    TeachingOutcome::Scheduled {
        teaching_id: teaching.id,
        lab_id: candidates.first().map(|slot| slot.lab_id),
        weeks: candidates.iter().map(|slot| slot.week).collect(),
    }
}
