//! Record stores behind the API and the report generator.
//!
//! Every record kind has its own trait so handlers and services depend on
//! just the collections they read. [`MySqlStore`] and [`MemoryStore`]
//! implement all of them; [`connect`] picks one according to
//! [`StoreBackend`].

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;
use tracing::info;

use crate::{
    config::{Config, StoreBackend},
    db::init_db,
    error::StoreError,
    model::{
        attendance::{AttendanceRecord, AttendanceUpdate, NewAttendance},
        department::{Department, DepartmentUpdate, NewDepartment},
        employee::{Employee, EmployeeUpdate, NewEmployee},
        setting::{Setting, SettingUpdate},
    },
};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn all(&self) -> Result<Vec<Employee>, StoreError>;
    async fn find_by_id(&self, id: u64) -> Result<Option<Employee>, StoreError>;
    async fn create(&self, new: &NewEmployee) -> Result<Employee, StoreError>;
    /// `None` when no employee has `id`.
    async fn update(&self, id: u64, update: &EmployeeUpdate)
    -> Result<Option<Employee>, StoreError>;
    async fn delete(&self, id: u64) -> Result<bool, StoreError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DepartmentStore: Send + Sync {
    async fn all(&self) -> Result<Vec<Department>, StoreError>;
    async fn find_by_id(&self, id: u64) -> Result<Option<Department>, StoreError>;
    async fn create(&self, new: &NewDepartment) -> Result<Department, StoreError>;
    async fn update(
        &self,
        id: u64,
        update: &DepartmentUpdate,
    ) -> Result<Option<Department>, StoreError>;
    async fn delete(&self, id: u64) -> Result<bool, StoreError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn all(&self) -> Result<Vec<AttendanceRecord>, StoreError>;
    /// Records dated within `[start, end]`, both ends inclusive.
    async fn by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;
    async fn find_by_id(&self, id: u64) -> Result<Option<AttendanceRecord>, StoreError>;
    async fn create(&self, new: &NewAttendance) -> Result<AttendanceRecord, StoreError>;
    async fn update(
        &self,
        id: u64,
        update: &AttendanceUpdate,
    ) -> Result<Option<AttendanceRecord>, StoreError>;
    async fn delete(&self, id: u64) -> Result<bool, StoreError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SettingStore: Send + Sync {
    async fn all(&self) -> Result<Vec<Setting>, StoreError>;
    async fn find_by_id(&self, id: u64) -> Result<Option<Setting>, StoreError>;
    async fn update(&self, id: u64, update: &SettingUpdate) -> Result<Option<Setting>, StoreError>;
}

/// Handles to every collection, shared as actix app data.
#[derive(Clone)]
pub struct Stores {
    pub employees: Arc<dyn EmployeeStore>,
    pub departments: Arc<dyn DepartmentStore>,
    pub attendance: Arc<dyn AttendanceStore>,
    pub settings: Arc<dyn SettingStore>,
}

impl Stores {
    /// Serve every collection from one backend.
    pub fn from_backend<S>(backend: Arc<S>) -> Self
    where
        S: EmployeeStore + DepartmentStore + AttendanceStore + SettingStore + 'static,
    {
        Self {
            employees: backend.clone(),
            departments: backend.clone(),
            attendance: backend.clone(),
            settings: backend,
        }
    }
}

pub async fn connect(config: &Config) -> anyhow::Result<Stores> {
    match config.store_backend {
        StoreBackend::Mysql => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the mysql backend")?;
            let pool = init_db(url).await?;
            info!("Using MySQL record store");
            Ok(Stores::from_backend(Arc::new(MySqlStore::new(pool))))
        }
        StoreBackend::Memory => {
            let store = MemoryStore::with_sample_data().context("Failed to load sample data")?;
            info!("Using in-memory record store with sample data");
            Ok(Stores::from_backend(Arc::new(store)))
        }
    }
}
