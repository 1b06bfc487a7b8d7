//! Allocation priority. Both orderings are stable so ties keep input order.

use itertools::Itertools;

use crate::data::{Lab, Teaching};

/// A lab together with its position on the grid's lab axis.
#[derive(Debug, Clone, Copy)]
pub struct RankedLab<'a> {
    pub index: usize,
    pub lab: &'a Lab,
}

/// Larger classes first.
pub fn rank_teachings(teachings: &[Teaching]) -> Vec<&Teaching> {
    teachings
        .iter()
        .sorted_by(|a, b| b.number_of_students.cmp(&a.number_of_students))
        .collect()
}

/// Bigger rooms first. `labs` must be in grid order.
pub fn rank_labs(labs: &[Lab]) -> Vec<RankedLab<'_>> {
    labs.iter()
        .enumerate()
        .map(|(index, lab)| RankedLab { index, lab })
        .sorted_by(|a, b| b.lab.capacity.cmp(&a.lab.capacity))
        .collect()
}
