//! Candidate week search for a single teaching.
//!
//! Labs are visited in ranked order and weeks in increasing order. The
//! adjacency guard only rejects a week whose predecessor is already chosen,
//! which is enough as long as weeks are scanned forward within a lab.
//! Candidates are not cleared between labs.

use log::trace;

use crate::data::{LabId, Teaching, Week};
use crate::grid::OccupancyGrid;
use crate::ranking::RankedLab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSlot {
    pub lab_index: usize,
    pub lab_id: LabId,
    pub week: Week,
}

pub fn find_candidate_slots(
    teaching: &Teaching,
    labs: &[RankedLab<'_>],
    grid: &OccupancyGrid,
) -> Vec<CandidateSlot> {
    let required = teaching.number_of_practical_weeks as usize;
    let mut candidates: Vec<CandidateSlot> = Vec::new();

    'labs: for ranked in labs {
        for week in 0..grid.weeks() {
            if candidates.len() >= required {
                break 'labs;
            }
            if is_candidate_week(teaching, ranked, week, grid, &candidates) {
                trace!(
                    "Teaching {} candidate: lab {} week {}",
                    teaching.id, ranked.lab.id, week
                );
                candidates.push(CandidateSlot {
                    lab_index: ranked.index,
                    lab_id: ranked.lab.id,
                    week,
                });
            }
        }
    }

    candidates
}

fn is_candidate_week(
    teaching: &Teaching,
    ranked: &RankedLab<'_>,
    week: Week,
    grid: &OccupancyGrid,
    chosen: &[CandidateSlot],
) -> bool {
    // no duplicate weeks
    if chosen.iter().any(|slot| slot.week == week) {
        return false;
    }
    // previous week already taken
    if chosen.iter().any(|slot| slot.week + 1 == week) {
        return false;
    }
    grid.is_range_free(ranked.index, teaching.periods(), week, teaching.day_of_week)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Lab;
    use crate::ranking::rank_labs;

    fn teaching(weeks: u32) -> Teaching {
        Teaching {
            id: 1,
            registration_id: 1,
            day_of_week: 1,
            start_period: 1,
            end_period: 3,
            number_of_students: 30,
            number_of_practical_weeks: weeks,
            deleted: false,
        }
    }

    fn labs(capacities: &[u32]) -> Vec<Lab> {
        capacities
            .iter()
            .enumerate()
            .map(|(i, capacity)| Lab {
                id: 100 + i as u32,
                capacity: *capacity,
                active: true,
            })
            .collect()
    }

    fn weeks_of(slots: &[CandidateSlot]) -> Vec<Week> {
        slots.iter().map(|slot| slot.week).collect()
    }

    #[test]
    fn test_skips_adjacent_weeks() {
        let labs = labs(&[30]);
        let grid = OccupancyGrid::empty(1, 10);
        let slots = find_candidate_slots(&teaching(4), &rank_labs(&labs), &grid);
        assert_eq!(weeks_of(&slots), vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_stops_at_required_count() {
        let labs = labs(&[30, 30]);
        let grid = OccupancyGrid::empty(2, 10);
        let slots = find_candidate_slots(&teaching(2), &rank_labs(&labs), &grid);
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|slot| slot.lab_id == 100));
    }

    #[test]
    fn test_prefers_biggest_lab() {
        let labs = labs(&[20, 60, 40]);
        let grid = OccupancyGrid::empty(3, 6);
        let slots = find_candidate_slots(&teaching(2), &rank_labs(&labs), &grid);
        assert!(slots.iter().all(|slot| slot.lab_id == 101 && slot.lab_index == 1));
    }

    #[test]
    fn test_partially_occupied_range_blocks_week() {
        let labs = labs(&[30]);
        let mut grid = OccupancyGrid::empty(1, 6);
        // only period 3 of week 0 is taken, still blocks the 1..=3 range
        grid.mark_occupied(0, 3, 0, 1);
        // other day of week 2 does not matter
        grid.mark_occupied(0, 2, 2, 4);
        let slots = find_candidate_slots(&teaching(3), &rank_labs(&labs), &grid);
        assert_eq!(weeks_of(&slots), vec![1, 3, 5]);
    }

    #[test]
    fn test_too_few_weeks_returns_partial_list() {
        let labs = labs(&[30]);
        let grid = OccupancyGrid::empty(1, 4);
        let slots = find_candidate_slots(&teaching(3), &rank_labs(&labs), &grid);
        assert_eq!(weeks_of(&slots), vec![0, 2]);
    }

    #[test]
    fn test_candidates_accumulate_across_labs() {
        let labs = labs(&[40, 30]);
        let mut grid = OccupancyGrid::empty(2, 6);
        // big lab only free on week 3
        for week in [0, 1, 2, 4, 5] {
            grid.mark_occupied(0, 2, week, 1);
        }
        let slots = find_candidate_slots(&teaching(3), &rank_labs(&labs), &grid);
        let found: Vec<(LabId, Week)> = slots.iter().map(|s| (s.lab_id, s.week)).collect();
        // scan restarts at week 0 in the second lab, so week 2 sits next to week 3
        assert_eq!(found, vec![(100, 3), (101, 0), (101, 2)]);
    }

    #[test]
    fn test_more_weeks_than_semester_has() {
        let labs = labs(&[30]);
        let grid = OccupancyGrid::empty(1, 10);
        let slots = find_candidate_slots(&teaching(u32::MAX), &rank_labs(&labs), &grid);
        assert_eq!(weeks_of(&slots), vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_zero_required_weeks() {
        let labs = labs(&[30]);
        let grid = OccupancyGrid::empty(1, 4);
        assert!(find_candidate_slots(&teaching(0), &rank_labs(&labs), &grid).is_empty());
    }
}
