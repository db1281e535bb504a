use std::collections::HashMap;

use actix_web::{
    HttpResponse,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::{
    clock::Clock,
    error::ApiError,
    model::{
        attendance::{AttendanceRecord, AttendanceUpdate, NewAttendance},
        employee::Employee,
    },
    models::MessageResponse,
    report::{ReportService, SummaryStats, report_file_name},
    store::Stores,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct DayQuery {
    /// Defaults to today
    #[param(value_type = Option<String>, format = "date", example = "2024-01-15")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportQuery {
    #[param(value_type = String, format = "date", example = "2024-01-01")]
    pub start: NaiveDate,
    #[param(value_type = String, format = "date", example = "2024-01-31")]
    pub end: NaiveDate,
}

/// Attendance record joined to its employee for display.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    /// `None` when the employee no longer exists
    pub employee_name: Option<String>,
    pub department: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceEntry>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayStatsResponse {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[serde(flatten)]
    pub stats: SummaryStats,
}

pub fn join_employees(records: Vec<AttendanceRecord>, employees: &[Employee]) -> Vec<AttendanceEntry> {
    let by_id: HashMap<u64, &Employee> = employees.iter().map(|e| (e.id, e)).collect();

    records
        .into_iter()
        .map(|record| {
            let employee = by_id.get(&record.employee_id);
            AttendanceEntry {
                employee_name: employee.map(|e| e.full_name()),
                department: employee.map(|e| e.department.clone()),
                record,
            }
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    params(DayQuery),
    responses(
        (status = 200, description = "One day's attendance records with employee names", body = AttendanceListResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    stores: web::Data<Stores>,
    clock: web::Data<dyn Clock>,
    query: web::Query<DayQuery>,
) -> Result<HttpResponse, ApiError> {
    let date = query.date.unwrap_or_else(|| clock.today());
    let records = stores.attendance.by_date_range(date, date).await?;
    let employees = stores.employees.all().await?;

    let data = join_employees(records, &employees);
    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        total: data.len(),
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/api/attendance/stats",
    params(DayQuery),
    responses(
        (status = 200, description = "Status counts for one day", body = DayStatsResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Attendance"
)]
pub async fn attendance_stats(
    stores: web::Data<Stores>,
    clock: web::Data<dyn Clock>,
    query: web::Query<DayQuery>,
) -> Result<HttpResponse, ApiError> {
    let date = query.date.unwrap_or_else(|| clock.today());
    let records = stores.attendance.by_date_range(date, date).await?;

    Ok(HttpResponse::Ok().json(DayStatsResponse {
        date,
        stats: SummaryStats::from_records(&records),
    }))
}

#[utoipa::path(
    get,
    path = "/api/attendance/report",
    params(ReportQuery),
    responses(
        (status = 200, description = "CSV attendance report", content_type = "text/csv", body = String),
        (status = 400, description = "End date before start date", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Attendance"
)]
pub async fn attendance_report(
    reports: web::Data<ReportService>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, ApiError> {
    let ReportQuery { start, end } = query.into_inner();
    if end < start {
        warn!(%start, %end, "Rejected report request with inverted range");
        return Err(ApiError::InvalidRange { start, end });
    }

    let report = reports.generate(start, end).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(report_file_name(start, end))],
        })
        .body(report))
}

#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(("id" = u64, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record found", body = AttendanceRecord),
        (status = 404, description = "Attendance record not found", body = MessageResponse)
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    stores: web::Data<Stores>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    match stores.attendance.find_by_id(path.into_inner()).await? {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Err(ApiError::NotFound("Attendance record")),
    }
}

#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = NewAttendance,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceRecord),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    stores: web::Data<Stores>,
    payload: web::Json<NewAttendance>,
) -> Result<HttpResponse, ApiError> {
    let record = stores.attendance.create(&payload).await?;
    info!(
        attendance_id = record.id,
        employee_id = record.employee_id,
        date = %record.date,
        "Attendance recorded"
    );
    Ok(HttpResponse::Created().json(record))
}

#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(("id" = u64, Path, description = "Attendance record ID")),
    request_body = AttendanceUpdate,
    responses(
        (status = 200, description = "Attendance record updated", body = AttendanceRecord),
        (status = 400, description = "Empty update", body = MessageResponse),
        (status = 404, description = "Attendance record not found", body = MessageResponse)
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    stores: web::Data<Stores>,
    path: web::Path<u64>,
    payload: web::Json<AttendanceUpdate>,
) -> Result<HttpResponse, ApiError> {
    if payload.is_empty() {
        return Err(ApiError::EmptyUpdate);
    }

    match stores.attendance.update(path.into_inner(), &payload).await? {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Err(ApiError::NotFound("Attendance record")),
    }
}

#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(("id" = u64, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Successfully deleted", body = MessageResponse),
        (status = 404, description = "Attendance record not found", body = MessageResponse)
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    stores: web::Data<Stores>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let attendance_id = path.into_inner();

    if !stores.attendance.delete(attendance_id).await? {
        return Err(ApiError::NotFound("Attendance record"));
    }

    info!(attendance_id, "Attendance record deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Successfully deleted")))
}
