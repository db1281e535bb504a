use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, MySqlPool};
use tracing::{debug, error, warn};

use super::{AttendanceStore, DepartmentStore, EmployeeStore, SettingStore};
use crate::{
    error::StoreError,
    model::{
        attendance::{AttendanceRecord, AttendanceStatus, AttendanceUpdate, NewAttendance},
        department::{Department, DepartmentUpdate, NewDepartment},
        employee::{EmergencyContact, Employee, EmployeeStatus, EmployeeUpdate, NewEmployee},
        setting::{Notifications, Setting, SettingUpdate, WorkingHours},
    },
    utils::db_utils::{SqlValue, build_update_sql, execute_update, push_some},
};

const EMPLOYEE_COLUMNS: &str = "id, first_name, last_name, email, phone, role, department, \
     start_date, status, photo, emergency_contact_name, emergency_contact_phone, \
     emergency_contact_relationship";
const DEPARTMENT_COLUMNS: &str = "id, name, description, employee_count, manager_id";
const ATTENDANCE_COLUMNS: &str = "id, employee_id, date, check_in, check_out, status";
const SETTING_COLUMNS: &str = "id, company_name, company_email, timezone, date_format, \
     working_hours_start, working_hours_end, notifications_email, notifications_desktop, \
     notifications_attendance";

/// Records kept in MySQL; column names are the snake_case backend shape.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Log a failed query and convert it.
fn logged(action: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| {
        error!(error = %e, action, "Database query failed");
        StoreError::Database(e)
    }
}

// -------------------- rows --------------------

#[derive(FromRow)]
struct EmployeeRow {
    id: u64,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    role: String,
    department: String,
    start_date: NaiveDate,
    status: String,
    photo: Option<String>,
    emergency_contact_name: String,
    emergency_contact_phone: String,
    emergency_contact_relationship: String,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = StoreError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<EmployeeStatus>()
            .map_err(|_| StoreError::InvalidColumn {
                column: "employees.status",
                value: row.status.clone(),
            })?;

        Ok(Employee {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            role: row.role,
            department: row.department,
            start_date: row.start_date,
            status,
            photo: row.photo,
            emergency_contact: EmergencyContact {
                name: row.emergency_contact_name,
                phone: row.emergency_contact_phone,
                relationship: row.emergency_contact_relationship,
            },
        })
    }
}

#[derive(FromRow)]
struct DepartmentRow {
    id: u64,
    name: String,
    description: String,
    employee_count: u32,
    manager_id: Option<u64>,
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Department {
            id: row.id,
            name: row.name,
            description: row.description,
            employee_count: row.employee_count,
            manager_id: row.manager_id,
        }
    }
}

#[derive(FromRow)]
struct AttendanceRow {
    id: u64,
    employee_id: u64,
    date: NaiveDate,
    check_in: Option<String>,
    check_out: Option<String>,
    status: Option<String>,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        // anything outside Present/Absent/Late is treated as unset
        let status = row.status.as_deref().and_then(|s| {
            s.parse::<AttendanceStatus>()
                .map_err(|_| warn!(id = row.id, status = s, "Unknown attendance status"))
                .ok()
        });

        AttendanceRecord {
            id: row.id,
            employee_id: row.employee_id,
            date: row.date,
            check_in: row.check_in,
            check_out: row.check_out,
            status,
        }
    }
}

#[derive(FromRow)]
struct SettingRow {
    id: u64,
    company_name: String,
    company_email: String,
    timezone: String,
    date_format: String,
    working_hours_start: String,
    working_hours_end: String,
    notifications_email: bool,
    notifications_desktop: bool,
    notifications_attendance: bool,
}

impl From<SettingRow> for Setting {
    fn from(row: SettingRow) -> Self {
        Setting {
            id: row.id,
            company_name: row.company_name,
            company_email: row.company_email,
            timezone: row.timezone,
            date_format: row.date_format,
            working_hours: WorkingHours {
                start: row.working_hours_start,
                end: row.working_hours_end,
            },
            notifications: Notifications {
                email: row.notifications_email,
                desktop: row.notifications_desktop,
                attendance: row.notifications_attendance,
            },
        }
    }
}

// -------------------- patches --------------------

fn employee_assignments(update: &EmployeeUpdate) -> Vec<(&'static str, SqlValue)> {
    let mut a = Vec::new();
    push_some(&mut a, "first_name", update.first_name.clone(), SqlValue::String);
    push_some(&mut a, "last_name", update.last_name.clone(), SqlValue::String);
    push_some(&mut a, "email", update.email.clone(), SqlValue::String);
    push_some(&mut a, "phone", update.phone.clone(), SqlValue::String);
    push_some(&mut a, "role", update.role.clone(), SqlValue::String);
    push_some(&mut a, "department", update.department.clone(), SqlValue::String);
    push_some(&mut a, "start_date", update.start_date, SqlValue::Date);
    push_some(&mut a, "status", update.status, |s| SqlValue::String(s.to_string()));
    push_some(&mut a, "photo", update.photo.clone(), SqlValue::String);
    if let Some(contact) = &update.emergency_contact {
        a.push(("emergency_contact_name", SqlValue::String(contact.name.clone())));
        a.push(("emergency_contact_phone", SqlValue::String(contact.phone.clone())));
        a.push((
            "emergency_contact_relationship",
            SqlValue::String(contact.relationship.clone()),
        ));
    }
    a
}

fn department_assignments(update: &DepartmentUpdate) -> Vec<(&'static str, SqlValue)> {
    let mut a = Vec::new();
    push_some(&mut a, "name", update.name.clone(), SqlValue::String);
    push_some(&mut a, "description", update.description.clone(), SqlValue::String);
    push_some(&mut a, "employee_count", update.employee_count, SqlValue::U32);
    push_some(&mut a, "manager_id", update.manager_id, SqlValue::U64);
    a
}

fn attendance_assignments(update: &AttendanceUpdate) -> Vec<(&'static str, SqlValue)> {
    let mut a = Vec::new();
    push_some(&mut a, "employee_id", update.employee_id, SqlValue::U64);
    push_some(&mut a, "date", update.date, SqlValue::Date);
    push_some(&mut a, "check_in", update.check_in.clone(), SqlValue::String);
    push_some(&mut a, "check_out", update.check_out.clone(), SqlValue::String);
    push_some(&mut a, "status", update.status, |s| SqlValue::String(s.to_string()));
    a
}

fn setting_assignments(update: &SettingUpdate) -> Vec<(&'static str, SqlValue)> {
    let mut a = Vec::new();
    push_some(&mut a, "company_name", update.company_name.clone(), SqlValue::String);
    push_some(&mut a, "company_email", update.company_email.clone(), SqlValue::String);
    push_some(&mut a, "timezone", update.timezone.clone(), SqlValue::String);
    push_some(&mut a, "date_format", update.date_format.clone(), SqlValue::String);
    if let Some(hours) = &update.working_hours {
        a.push(("working_hours_start", SqlValue::String(hours.start.clone())));
        a.push(("working_hours_end", SqlValue::String(hours.end.clone())));
    }
    if let Some(n) = update.notifications {
        a.push(("notifications_email", SqlValue::Bool(n.email)));
        a.push(("notifications_desktop", SqlValue::Bool(n.desktop)));
        a.push(("notifications_attendance", SqlValue::Bool(n.attendance)));
    }
    a
}

impl MySqlStore {
    async fn apply_update(
        &self,
        table: &'static str,
        id: u64,
        assignments: Vec<(&'static str, SqlValue)>,
    ) -> Result<(), StoreError> {
        if let Some(update) = build_update_sql(table, assignments, "id", id) {
            debug!(sql = %update.sql, id, "Updating record");
            // MySQL reports changed rows only, so existence is checked by re-reading
            execute_update(&self.pool, update)
                .await
                .map_err(logged("update"))?;
        }
        Ok(())
    }

    async fn delete_from(&self, table: &'static str, id: u64) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", table);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(logged("delete"))?;
        Ok(result.rows_affected() > 0)
    }
}

// -------------------- stores --------------------

#[async_trait]
impl EmployeeStore for MySqlStore {
    async fn all(&self) -> Result<Vec<Employee>, StoreError> {
        let sql = format!("SELECT {} FROM employees ORDER BY id", EMPLOYEE_COLUMNS);
        sqlx::query_as::<_, EmployeeRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(logged("fetch employees"))?
            .into_iter()
            .map(Employee::try_from)
            .collect()
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        let sql = format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS);
        sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(logged("fetch employee"))?
            .map(Employee::try_from)
            .transpose()
    }

    async fn create(&self, new: &NewEmployee) -> Result<Employee, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (first_name, last_name, email, phone, role, department, start_date, status, photo,
             emergency_contact_name, emergency_contact_phone, emergency_contact_relationship)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.role)
        .bind(&new.department)
        .bind(new.start_date)
        .bind(new.status.to_string())
        .bind(&new.photo)
        .bind(&new.emergency_contact.name)
        .bind(&new.emergency_contact.phone)
        .bind(&new.emergency_contact.relationship)
        .execute(&self.pool)
        .await
        .map_err(logged("create employee"))?;

        Ok(Employee::from_new(result.last_insert_id(), new))
    }

    async fn update(
        &self,
        id: u64,
        update: &EmployeeUpdate,
    ) -> Result<Option<Employee>, StoreError> {
        self.apply_update("employees", id, employee_assignments(update))
            .await?;
        EmployeeStore::find_by_id(self, id).await
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        self.delete_from("employees", id).await
    }
}

#[async_trait]
impl DepartmentStore for MySqlStore {
    async fn all(&self) -> Result<Vec<Department>, StoreError> {
        let sql = format!("SELECT {} FROM departments ORDER BY id", DEPARTMENT_COLUMNS);
        let rows = sqlx::query_as::<_, DepartmentRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(logged("fetch departments"))?;
        Ok(rows.into_iter().map(Department::from).collect())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Department>, StoreError> {
        let sql = format!("SELECT {} FROM departments WHERE id = ?", DEPARTMENT_COLUMNS);
        let row = sqlx::query_as::<_, DepartmentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(logged("fetch department"))?;
        Ok(row.map(Department::from))
    }

    async fn create(&self, new: &NewDepartment) -> Result<Department, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO departments (name, description, employee_count, manager_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.employee_count)
        .bind(new.manager_id)
        .execute(&self.pool)
        .await
        .map_err(logged("create department"))?;

        Ok(Department::from_new(result.last_insert_id(), new))
    }

    async fn update(
        &self,
        id: u64,
        update: &DepartmentUpdate,
    ) -> Result<Option<Department>, StoreError> {
        self.apply_update("departments", id, department_assignments(update))
            .await?;
        DepartmentStore::find_by_id(self, id).await
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        self.delete_from("departments", id).await
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn all(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        let sql = format!("SELECT {} FROM attendance ORDER BY id", ATTENDANCE_COLUMNS);
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(logged("fetch attendance"))?;
        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }

    async fn by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM attendance WHERE date >= ? AND date <= ? ORDER BY id",
            ATTENDANCE_COLUMNS
        );
        debug!(%start, %end, "Fetching attendance by date range");
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(logged("fetch attendance by date range"))?;
        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<AttendanceRecord>, StoreError> {
        let sql = format!("SELECT {} FROM attendance WHERE id = ?", ATTENDANCE_COLUMNS);
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(logged("fetch attendance record"))?;
        Ok(row.map(AttendanceRecord::from))
    }

    async fn create(&self, new: &NewAttendance) -> Result<AttendanceRecord, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, check_in, check_out, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.date)
        .bind(&new.check_in)
        .bind(&new.check_out)
        .bind(new.status.map(|s| s.to_string()))
        .execute(&self.pool)
        .await
        .map_err(logged("create attendance record"))?;

        Ok(AttendanceRecord::from_new(result.last_insert_id(), new))
    }

    async fn update(
        &self,
        id: u64,
        update: &AttendanceUpdate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        self.apply_update("attendance", id, attendance_assignments(update))
            .await?;
        AttendanceStore::find_by_id(self, id).await
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        self.delete_from("attendance", id).await
    }
}

#[async_trait]
impl SettingStore for MySqlStore {
    async fn all(&self) -> Result<Vec<Setting>, StoreError> {
        let sql = format!("SELECT {} FROM settings ORDER BY id", SETTING_COLUMNS);
        let rows = sqlx::query_as::<_, SettingRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(logged("fetch settings"))?;
        Ok(rows.into_iter().map(Setting::from).collect())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Setting>, StoreError> {
        let sql = format!("SELECT {} FROM settings WHERE id = ?", SETTING_COLUMNS);
        let row = sqlx::query_as::<_, SettingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(logged("fetch setting"))?;
        Ok(row.map(Setting::from))
    }

    async fn update(&self, id: u64, update: &SettingUpdate) -> Result<Option<Setting>, StoreError> {
        self.apply_update("settings", id, setting_assignments(update))
            .await?;
        SettingStore::find_by_id(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_patch_maps_to_snake_case_columns() {
        let update = EmployeeUpdate {
            first_name: Some("Ann".into()),
            status: Some(EmployeeStatus::OnLeave),
            emergency_contact: Some(EmergencyContact {
                name: "Bo".into(),
                phone: "1".into(),
                relationship: "Friend".into(),
            }),
            ..Default::default()
        };
        let columns: Vec<_> = employee_assignments(&update)
            .into_iter()
            .map(|(c, _)| c)
            .collect();
        assert_eq!(
            columns,
            vec![
                "first_name",
                "status",
                "emergency_contact_name",
                "emergency_contact_phone",
                "emergency_contact_relationship"
            ]
        );

        let status = employee_assignments(&update)
            .into_iter()
            .find(|(c, _)| *c == "status")
            .map(|(_, v)| v);
        assert_eq!(status, Some(SqlValue::String("On Leave".into())));
    }

    #[test]
    fn attendance_row_tolerates_unknown_status() {
        let record = AttendanceRecord::from(AttendanceRow {
            id: 9,
            employee_id: 2,
            date: "2024-01-05".parse().unwrap(),
            check_in: Some("09:00".into()),
            check_out: None,
            status: Some("Holiday".into()),
        });
        assert_eq!(record.status, None);
        assert_eq!(record.check_in.as_deref(), Some("09:00"));
    }

    #[test]
    fn employee_row_rejects_unknown_status() {
        let row = EmployeeRow {
            id: 1,
            first_name: "A".into(),
            last_name: "B".into(),
            email: "a@b.c".into(),
            phone: "1".into(),
            role: "r".into(),
            department: "d".into(),
            start_date: "2024-01-01".parse().unwrap(),
            status: "Retired".into(),
            photo: None,
            emergency_contact_name: String::new(),
            emergency_contact_phone: String::new(),
            emergency_contact_relationship: String::new(),
        };
        assert!(matches!(
            Employee::try_from(row),
            Err(StoreError::InvalidColumn { column: "employees.status", .. })
        ));
    }

    #[test]
    fn setting_patch_expands_nested_groups() {
        let update = SettingUpdate {
            working_hours: Some(WorkingHours {
                start: "08:00".into(),
                end: "16:00".into(),
            }),
            ..Default::default()
        };
        let columns: Vec<_> = setting_assignments(&update)
            .into_iter()
            .map(|(c, _)| c)
            .collect();
        assert_eq!(columns, vec!["working_hours_start", "working_hours_end"]);
        assert!(department_assignments(&DepartmentUpdate::default()).is_empty());
        assert!(attendance_assignments(&AttendanceUpdate::default()).is_empty());
    }
}
