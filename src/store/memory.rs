use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::error;

use super::{AttendanceStore, DepartmentStore, EmployeeStore, SettingStore};
use crate::{
    error::StoreError,
    model::{
        attendance::{AttendanceRecord, AttendanceUpdate, NewAttendance},
        department::{Department, DepartmentUpdate, NewDepartment},
        employee::{Employee, EmployeeUpdate, NewEmployee},
        setting::{Setting, SettingUpdate},
    },
};

const SAMPLE_EMPLOYEES: &str = include_str!("../../fixtures/employees.json");
const SAMPLE_DEPARTMENTS: &str = include_str!("../../fixtures/departments.json");
const SAMPLE_ATTENDANCE: &str = include_str!("../../fixtures/attendance.json");
const SAMPLE_SETTINGS: &str = include_str!("../../fixtures/settings.json");

#[derive(Debug, Default)]
struct Tables {
    employees: Vec<Employee>,
    departments: Vec<Department>,
    attendance: Vec<AttendanceRecord>,
    settings: Vec<Setting>,
}

/// Records held in process memory.
///
/// Reads hand out clones, so a caller never sees a collection while another
/// request is writing to it. The lock is never held across an await.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

fn parse_fixture<T: DeserializeOwned>(name: &str, raw: &str) -> Result<Vec<T>, StoreError> {
    serde_json::from_str(raw).map_err(|e| {
        error!(error = %e, fixture = name, "Failed to parse sample data");
        StoreError::from(e)
    })
}

fn next_id<T>(items: &[T], id: impl Fn(&T) -> u64) -> u64 {
    items.iter().map(id).max().unwrap_or(0) + 1
}

impl MemoryStore {
    pub fn seeded(
        employees: Vec<Employee>,
        departments: Vec<Department>,
        attendance: Vec<AttendanceRecord>,
        settings: Vec<Setting>,
    ) -> Self {
        Self {
            tables: RwLock::new(Tables {
                employees,
                departments,
                attendance,
                settings,
            }),
        }
    }

    /// Seed from the bundled sample fixtures.
    pub fn with_sample_data() -> Result<Self, StoreError> {
        Ok(Self::seeded(
            parse_fixture("employees", SAMPLE_EMPLOYEES)?,
            parse_fixture("departments", SAMPLE_DEPARTMENTS)?,
            parse_fixture("attendance", SAMPLE_ATTENDANCE)?,
            parse_fixture("settings", SAMPLE_SETTINGS)?,
        ))
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        let tables = self.tables.read().map_err(|_| {
            error!("Memory store lock poisoned on read");
            StoreError::Poisoned
        })?;
        Ok(f(&tables))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> Result<T, StoreError> {
        let mut tables = self.tables.write().map_err(|_| {
            error!("Memory store lock poisoned on write");
            StoreError::Poisoned
        })?;
        Ok(f(&mut tables))
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn all(&self) -> Result<Vec<Employee>, StoreError> {
        self.read(|t| t.employees.clone())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        self.read(|t| t.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn create(&self, new: &NewEmployee) -> Result<Employee, StoreError> {
        self.write(|t| {
            let employee = Employee::from_new(next_id(&t.employees, |e| e.id), new);
            t.employees.push(employee.clone());
            employee
        })
    }

    async fn update(
        &self,
        id: u64,
        update: &EmployeeUpdate,
    ) -> Result<Option<Employee>, StoreError> {
        self.write(|t| {
            t.employees.iter_mut().find(|e| e.id == id).map(|employee| {
                employee.apply(update);
                employee.clone()
            })
        })
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        self.write(|t| {
            let before = t.employees.len();
            t.employees.retain(|e| e.id != id);
            t.employees.len() != before
        })
    }
}

#[async_trait]
impl DepartmentStore for MemoryStore {
    async fn all(&self) -> Result<Vec<Department>, StoreError> {
        self.read(|t| t.departments.clone())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Department>, StoreError> {
        self.read(|t| t.departments.iter().find(|d| d.id == id).cloned())
    }

    async fn create(&self, new: &NewDepartment) -> Result<Department, StoreError> {
        self.write(|t| {
            let department = Department::from_new(next_id(&t.departments, |d| d.id), new);
            t.departments.push(department.clone());
            department
        })
    }

    async fn update(
        &self,
        id: u64,
        update: &DepartmentUpdate,
    ) -> Result<Option<Department>, StoreError> {
        self.write(|t| {
            t.departments.iter_mut().find(|d| d.id == id).map(|department| {
                department.apply(update);
                department.clone()
            })
        })
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        self.write(|t| {
            let before = t.departments.len();
            t.departments.retain(|d| d.id != id);
            t.departments.len() != before
        })
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn all(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.read(|t| t.attendance.clone())
    }

    async fn by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.read(|t| {
            t.attendance
                .iter()
                .filter(|a| a.is_within(start, end))
                .cloned()
                .collect()
        })
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<AttendanceRecord>, StoreError> {
        self.read(|t| t.attendance.iter().find(|a| a.id == id).cloned())
    }

    async fn create(&self, new: &NewAttendance) -> Result<AttendanceRecord, StoreError> {
        self.write(|t| {
            let record = AttendanceRecord::from_new(next_id(&t.attendance, |a| a.id), new);
            t.attendance.push(record.clone());
            record
        })
    }

    async fn update(
        &self,
        id: u64,
        update: &AttendanceUpdate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        self.write(|t| {
            t.attendance.iter_mut().find(|a| a.id == id).map(|record| {
                record.apply(update);
                record.clone()
            })
        })
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        self.write(|t| {
            let before = t.attendance.len();
            t.attendance.retain(|a| a.id != id);
            t.attendance.len() != before
        })
    }
}

#[async_trait]
impl SettingStore for MemoryStore {
    async fn all(&self) -> Result<Vec<Setting>, StoreError> {
        self.read(|t| t.settings.clone())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Setting>, StoreError> {
        self.read(|t| t.settings.iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, id: u64, update: &SettingUpdate) -> Result<Option<Setting>, StoreError> {
        self.write(|t| {
            t.settings.iter_mut().find(|s| s.id == id).map(|setting| {
                setting.apply(update);
                setting.clone()
            })
        })
    }
}
