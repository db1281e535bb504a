use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::{
    api::department::with_live_counts,
    clock::Clock,
    error::ApiError,
    model::{
        attendance::{AttendanceRecord, AttendanceStatus},
        department::Department,
        employee::{Employee, EmployeeStatus},
    },
    models::MessageResponse,
    store::Stores,
};

const RECENT_EMPLOYEES: usize = 5;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentShare {
    #[serde(rename = "Id")]
    pub id: u64,
    pub name: String,
    pub employee_count: u32,
    /// Whole-number share of all employees
    #[schema(example = 43)]
    pub percentage: u32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub total_employees: usize,
    pub active_employees: usize,
    pub on_leave_employees: usize,
    pub departments: usize,
    /// Marked `Present` on `date`; late arrivals are not counted
    pub present_today: usize,
    /// Newest first
    pub recent_employees: Vec<Employee>,
    pub department_overview: Vec<DepartmentShare>,
}

fn percentage(part: u32, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(part) / total as f64 * 100.0).round() as u32
}

pub fn dashboard_stats(
    employees: Vec<Employee>,
    departments: Vec<Department>,
    attendance: &[AttendanceRecord],
    today: NaiveDate,
) -> DashboardStats {
    let count_status = |status| employees.iter().filter(|e| e.status == status).count();
    let active_employees = count_status(EmployeeStatus::Active);
    let on_leave_employees = count_status(EmployeeStatus::OnLeave);

    let present_today = attendance
        .iter()
        .filter(|r| r.date == today && r.status == Some(AttendanceStatus::Present))
        .count();

    let department_overview: Vec<DepartmentShare> = with_live_counts(departments, &employees)
        .into_iter()
        .map(|d| DepartmentShare {
            percentage: percentage(d.employee_count, employees.len()),
            id: d.id,
            name: d.name,
            employee_count: d.employee_count,
        })
        .collect();

    let recent_employees = employees
        .iter()
        .rev()
        .take(RECENT_EMPLOYEES)
        .cloned()
        .collect();

    DashboardStats {
        date: today,
        total_employees: employees.len(),
        active_employees,
        on_leave_employees,
        departments: department_overview.len(),
        present_today,
        recent_employees,
        department_overview,
    }
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Headline numbers for the dashboard", body = DashboardStats),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard(
    stores: web::Data<Stores>,
    clock: web::Data<dyn Clock>,
) -> Result<HttpResponse, ApiError> {
    let today = clock.today();
    let (employees, departments, attendance) = futures::try_join!(
        stores.employees.all(),
        stores.departments.all(),
        stores.attendance.by_date_range(today, today),
    )?;

    let stats = dashboard_stats(employees, departments, &attendance, today);
    debug!(
        total = stats.total_employees,
        present = stats.present_today,
        "Dashboard computed"
    );
    Ok(HttpResponse::Ok().json(stats))
}
