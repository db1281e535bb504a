use crate::api::attendance::{AttendanceEntry, AttendanceListResponse, DayStatsResponse};
use crate::api::dashboard::{DashboardStats, DepartmentShare};
use crate::api::department::DepartmentListResponse;
use crate::api::employee::EmployeeListResponse;
use crate::model::attendance::{
    AttendanceRecord, AttendanceStatus, AttendanceUpdate, NewAttendance,
};
use crate::model::department::{Department, DepartmentUpdate, NewDepartment};
use crate::model::employee::{
    EmergencyContact, Employee, EmployeeStatus, EmployeeUpdate, NewEmployee,
};
use crate::model::setting::{Notifications, Setting, SettingUpdate, WorkingHours};
use crate::models::MessageResponse;
use crate::report::SummaryStats;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Dashboard API",
        version = "1.0.0",
        description = r#"
## HR Dashboard

Backend for a small-company HR dashboard.

### 🔹 Key Features
- **Employees**
  - Create, update, delete, search and filter employee profiles
- **Departments**
  - Department records with live head counts
- **Attendance**
  - Daily attendance records and per-day status counts
  - CSV attendance report for any inclusive date range
- **Dashboard**
  - Head counts, today's attendance and department breakdown
- **Settings**
  - Company profile, working hours and notification preferences

### 📦 Response Format
- JSON-based RESTful responses
- Errors are `{"message": "..."}`
- The attendance report is `text/csv`, sent as an attachment

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::department::list_departments,
        crate::api::department::get_department,
        crate::api::department::create_department,
        crate::api::department::update_department,
        crate::api::department::delete_department,

        crate::api::attendance::list_attendance,
        crate::api::attendance::attendance_stats,
        crate::api::attendance::attendance_report,
        crate::api::attendance::get_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,

        crate::api::dashboard::get_dashboard,

        crate::api::setting::list_settings,
        crate::api::setting::get_setting,
        crate::api::setting::update_setting
    ),
    components(
        schemas(
            Employee,
            EmployeeStatus,
            EmergencyContact,
            NewEmployee,
            EmployeeUpdate,
            EmployeeListResponse,
            Department,
            NewDepartment,
            DepartmentUpdate,
            DepartmentListResponse,
            AttendanceRecord,
            AttendanceStatus,
            NewAttendance,
            AttendanceUpdate,
            AttendanceEntry,
            AttendanceListResponse,
            DayStatsResponse,
            SummaryStats,
            DashboardStats,
            DepartmentShare,
            Setting,
            SettingUpdate,
            WorkingHours,
            Notifications,
            MessageResponse
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Department", description = "Department management APIs"),
        (name = "Attendance", description = "Attendance tracking and reporting APIs"),
        (name = "Dashboard", description = "Dashboard summary APIs"),
        (name = "Setting", description = "Company settings APIs"),
    )
)]
pub struct ApiDoc;
