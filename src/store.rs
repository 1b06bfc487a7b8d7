//! Lookups and persistence the scheduler depends on.

use log::info;
use std::sync::{Mutex, MutexGuard};

use crate::data::{
    Dataset, GridSnapshot, Lab, LabUsage, Registration, RegistrationId, Semester, SemesterId,
    Teaching,
};
use crate::error::{Error, Result};

pub trait SchedulingStore: Send + Sync {
    fn registration(&self, id: RegistrationId) -> Result<Registration>;

    fn semester(&self, id: SemesterId) -> Result<Semester>;

    /// Teachings of a registration that are not soft-deleted.
    fn teachings_for_registration(&self, id: RegistrationId) -> Result<Vec<Teaching>>;

    /// Active labs, in grid order.
    fn active_labs(&self) -> Result<Vec<Lab>>;

    fn lab_usages(&self, semester_id: SemesterId) -> Result<Vec<LabUsage>>;

    /// Stores the outcome of one run in a single step.
    ///
    /// With `replace_existing` the semester's previous lab usages are dropped.
    fn commit_run(
        &self,
        semester_id: SemesterId,
        grid: GridSnapshot,
        lab_usages: Vec<LabUsage>,
        replace_existing: bool,
    ) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: Mutex<Dataset>,
}

impl InMemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        info!(
            "Store seeded with {} semesters, {} registrations, {} labs, {} teachings, {} lab usages",
            dataset.semesters.len(),
            dataset.registrations.len(),
            dataset.labs.len(),
            dataset.teachings.len(),
            dataset.lab_usages.len()
        );
        Self {
            data: Mutex::new(dataset),
        }
    }

    fn data(&self) -> Result<MutexGuard<'_, Dataset>> {
        self.data.lock().map_err(|_| Error::StorePoisoned)
    }
}

impl SchedulingStore for InMemoryStore {
    fn registration(&self, id: RegistrationId) -> Result<Registration> {
        self.data()?
            .registrations
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(Error::RegistrationNotFound(id))
    }

    fn semester(&self, id: SemesterId) -> Result<Semester> {
        self.data()?
            .semesters
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(Error::SemesterNotFound(id))
    }

    fn teachings_for_registration(&self, id: RegistrationId) -> Result<Vec<Teaching>> {
        Ok(self
            .data()?
            .teachings
            .iter()
            .filter(|t| t.registration_id == id && !t.deleted)
            .cloned()
            .collect())
    }

    fn active_labs(&self) -> Result<Vec<Lab>> {
        Ok(self.data()?.labs.iter().filter(|l| l.active).cloned().collect())
    }

    fn lab_usages(&self, semester_id: SemesterId) -> Result<Vec<LabUsage>> {
        Ok(self
            .data()?
            .lab_usages
            .iter()
            .filter(|u| u.semester_id == semester_id)
            .cloned()
            .collect())
    }

    fn commit_run(
        &self,
        semester_id: SemesterId,
        grid: GridSnapshot,
        lab_usages: Vec<LabUsage>,
        replace_existing: bool,
    ) -> Result<()> {
        let mut data = self.data()?;
        let semester = data
            .semesters
            .iter_mut()
            .find(|s| s.id == semester_id)
            .ok_or(Error::SemesterNotFound(semester_id))?;
        semester.grid = Some(grid);
        if replace_existing {
            data.lab_usages.retain(|u| u.semester_id != semester_id);
        }
        data.lab_usages.extend(lab_usages);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset {
            semesters: vec![Semester {
                id: 1,
                number_of_weeks: 2,
                grid: None,
            }],
            registrations: vec![Registration {
                id: 7,
                semester_id: 1,
            }],
            labs: vec![
                Lab {
                    id: 10,
                    capacity: 30,
                    active: true,
                },
                Lab {
                    id: 11,
                    capacity: 50,
                    active: false,
                },
            ],
            teachings: vec![
                Teaching {
                    id: 1,
                    registration_id: 7,
                    day_of_week: 0,
                    start_period: 0,
                    end_period: 0,
                    number_of_students: 10,
                    number_of_practical_weeks: 1,
                    deleted: false,
                },
                Teaching {
                    id: 2,
                    registration_id: 7,
                    day_of_week: 0,
                    start_period: 0,
                    end_period: 0,
                    number_of_students: 10,
                    number_of_practical_weeks: 1,
                    deleted: true,
                },
            ],
            lab_usages: Vec::new(),
        }
    }

    #[test]
    fn test_lookups_filter_inactive_and_deleted() {
        let store = InMemoryStore::new(dataset());
        let teachings = store.teachings_for_registration(7).unwrap();
        assert_eq!(teachings.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
        let labs = store.active_labs().unwrap();
        assert_eq!(labs.iter().map(|l| l.id).collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn test_missing_records() {
        let store = InMemoryStore::new(dataset());
        assert!(matches!(store.registration(8), Err(Error::RegistrationNotFound(8))));
        assert!(matches!(store.semester(2), Err(Error::SemesterNotFound(2))));
    }

    #[test]
    fn test_dataset_from_json() {
        let raw = r#"{
            "semesters": [{ "id": 1, "numberOfWeeks": 16 }],
            "registrations": [{ "id": 3, "semesterId": 1 }],
            "labs": [{ "id": 10, "capacity": 40 }],
            "teachings": [{
                "id": 5, "registrationId": 3, "dayOfWeek": 2,
                "startPeriod": 0, "endPeriod": 2,
                "numberOfStudents": 35, "numberOfPracticalWeeks": 4
            }]
        }"#;
        let dataset: Dataset = serde_json::from_str(raw).unwrap();
        assert!(dataset.labs[0].active);
        assert!(!dataset.teachings[0].deleted);
        assert!(dataset.semesters[0].grid.is_none());
        assert!(dataset.lab_usages.is_empty());
    }
}
