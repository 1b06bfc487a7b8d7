//! One scheduling run end to end: lookups, validation, allocation, commit.

use log::{info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::allocator::allocate;
use crate::data::{
    DAYS_PER_WEEK, GridSnapshot, LabId, MAX_WEEKS_PER_SEMESTER, PERIODS_PER_DAY, Registration,
    RunReport, ScheduleRequest, Semester, SemesterId, Teaching, TeachingOutcome,
};
use crate::error::{Error, Result};
use crate::grid::OccupancyGrid;
use crate::store::SchedulingStore;

pub struct LabScheduler<S> {
    store: Arc<S>,
    /// Held only while a run on that semester is in flight.
    semester_locks: Mutex<HashMap<SemesterId, Arc<Mutex<()>>>>,
}

impl<S: SchedulingStore> LabScheduler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            semester_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the allocator for every teaching of a registration.
    ///
    /// Runs against the same semester are serialised. Fatal input errors are
    /// returned before anything is written.
    pub fn run(&self, request: &ScheduleRequest) -> Result<RunReport> {
        self.run_with_deadline(request, None)
    }

    /// Like [`run`](Self::run), but nothing is committed once `deadline` has passed.
    pub fn run_with_deadline(
        &self,
        request: &ScheduleRequest,
        deadline: Option<Instant>,
    ) -> Result<RunReport> {
        let registration = self.store.registration(request.registration_id)?;
        let semester_lock = self.semester_lock(registration.semester_id)?;
        let result = match semester_lock.lock() {
            Ok(_guard) => self.run_locked(&registration, request.is_new, deadline),
            Err(_) => Err(Error::StorePoisoned),
        };
        self.release_semester_lock(registration.semester_id, semester_lock);
        result
    }

    fn run_locked(
        &self,
        registration: &Registration,
        is_new: bool,
        deadline: Option<Instant>,
    ) -> Result<RunReport> {
        let semester = self.store.semester(registration.semester_id)?;
        validate_semester(&semester)?;
        let teachings = self.store.teachings_for_registration(registration.id)?;
        let labs = self.store.active_labs()?;
        teachings.iter().try_for_each(validate_teaching)?;
        let lab_ids: Vec<LabId> = labs.iter().map(|lab| lab.id).collect();

        let mut grid = match (&semester.grid, is_new) {
            (Some(snapshot), false) => {
                if snapshot.lab_ids != lab_ids {
                    return Err(Error::GridLabMismatch {
                        expected: lab_ids,
                        found: snapshot.lab_ids.clone(),
                    });
                }
                OccupancyGrid::from_snapshot(&snapshot.cells, labs.len(), semester.number_of_weeks)?
            }
            _ => OccupancyGrid::empty(labs.len(), semester.number_of_weeks),
        };
        info!(
            "Run for registration {} on semester {} (new: {}, {} cells already occupied)",
            registration.id,
            semester.id,
            is_new,
            grid.occupied_count()
        );

        let allocation = allocate(&teachings, &labs, semester.id, &mut grid);
        let unscheduled: Vec<_> = allocation
            .outcomes
            .iter()
            .filter(|o| !o.is_scheduled())
            .map(TeachingOutcome::teaching_id)
            .collect();
        if !unscheduled.is_empty() {
            warn!(
                "{} teachings of registration {} left unscheduled: {:?}",
                unscheduled.len(),
                registration.id,
                unscheduled
            );
        }

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            warn!(
                "Run for registration {} passed its deadline, discarding {} lab usages",
                registration.id,
                allocation.lab_usages.len()
            );
            return Err(Error::DeadlineExceeded);
        }
        self.store.commit_run(
            semester.id,
            GridSnapshot {
                lab_ids,
                cells: grid.into_snapshot(),
            },
            allocation.lab_usages.clone(),
            is_new,
        )?;

        Ok(RunReport {
            registration_id: registration.id,
            semester_id: semester.id,
            scheduled: allocation.scheduled_count(),
            unscheduled,
            outcomes: allocation.outcomes,
            lab_usages: allocation.lab_usages,
        })
    }

    fn semester_lock(&self, semester_id: SemesterId) -> Result<Arc<Mutex<()>>> {
        let mut locks = self.semester_locks.lock().map_err(|_| Error::StorePoisoned)?;
        Ok(locks.entry(semester_id).or_default().clone())
    }

    fn release_semester_lock(&self, semester_id: SemesterId, lock: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.semester_locks.lock() else {
            return;
        };
        // clones are only handed out under the map lock, so two means map + ours
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&semester_id);
        }
    }
}

fn validate_semester(semester: &Semester) -> Result<()> {
    if semester.number_of_weeks > MAX_WEEKS_PER_SEMESTER {
        return Err(Error::InvalidSemester {
            semester_id: semester.id,
            reason: format!(
                "{} weeks exceeds the limit of {}",
                semester.number_of_weeks, MAX_WEEKS_PER_SEMESTER
            ),
        });
    }
    Ok(())
}
