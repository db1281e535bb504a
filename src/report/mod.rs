//! Attendance CSV report.
//!
//! [`render_report`] is the pure part: select records in range, join them to
//! employees, format rows and the summary block. [`ReportService`] fetches
//! the inputs from the stores and stamps the output with the clock's date.

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use crate::{
    clock::Clock,
    error::StoreError,
    model::{
        attendance::{AttendanceRecord, AttendanceStatus},
        employee::Employee,
    },
    store::{AttendanceStore, EmployeeStore},
};

pub mod hours;

pub use hours::hours_worked;

pub const REPORT_HEADER: &str =
    "Employee ID,Employee Name,Department,Date,Check In,Check Out,Status,Hours Worked";
pub const SUMMARY_MARKER: &str = "--- SUMMARY STATISTICS ---";

/// One line of the report body.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub employee_id: u64,
    pub employee_name: String,
    pub department: String,
    pub date: NaiveDate,
    pub check_in: String,
    pub check_out: String,
    pub status: String,
    pub hours_worked: String,
}

/// Wrap in double quotes, doubling any embedded quote.
fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

impl ReportRow {
    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{}",
            self.employee_id,
            quoted(&self.employee_name),
            quoted(&self.department),
            self.date,
            self.check_in,
            self.check_out,
            self.status,
            self.hours_worked
        )
    }
}

/// Status counts over a set of attendance records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SummaryStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
}

impl SummaryStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        records
            .into_iter()
            .fold(SummaryStats::default(), |mut stats, record| {
                stats.total += 1;
                match record.status {
                    Some(AttendanceStatus::Present) => stats.present += 1,
                    Some(AttendanceStatus::Absent) => stats.absent += 1,
                    Some(AttendanceStatus::Late) => stats.late += 1,
                    None => {}
                }
                stats
            })
    }

    /// `(present + late) / total * 100` with one decimal; late arrivals
    /// count as attended.
    pub fn attendance_rate(&self) -> String {
        if self.total == 0 {
            return "0.0".to_string();
        }
        let attended = (self.present + self.late) as f64;
        format!("{:.1}", attended / self.total as f64 * 100.0)
    }
}

/// Records dated within `[start, end]`, in input order.
fn select_in_range(
    start: NaiveDate,
    end: NaiveDate,
    attendance: &[AttendanceRecord],
) -> Vec<&AttendanceRecord> {
    attendance
        .iter()
        .filter(|record| record.is_within(start, end))
        .collect()
}

/// Join records in `[start, end]` to their employees, keeping record order.
pub fn build_rows(
    start: NaiveDate,
    end: NaiveDate,
    attendance: &[AttendanceRecord],
    employees: &[Employee],
) -> Vec<ReportRow> {
    join_rows(&select_in_range(start, end, attendance), employees)
}

fn join_rows(selected: &[&AttendanceRecord], employees: &[Employee]) -> Vec<ReportRow> {
    let by_id: HashMap<u64, &Employee> = employees.iter().map(|e| (e.id, e)).collect();

    selected
        .iter()
        .map(|record| {
            let (first_name, last_name, department) = match by_id.get(&record.employee_id) {
                Some(e) => (
                    e.first_name.as_str(),
                    e.last_name.as_str(),
                    e.department.as_str(),
                ),
                None => ("", "", ""),
            };

            ReportRow {
                employee_id: record.employee_id,
                employee_name: format!("{} {}", first_name, last_name),
                department: department.to_string(),
                date: record.date,
                check_in: record.check_in.clone().unwrap_or_default(),
                check_out: record.check_out.clone().unwrap_or_default(),
                status: record.status.map(|s| s.to_string()).unwrap_or_default(),
                hours_worked: hours_worked(record.check_in.as_deref(), record.check_out.as_deref()),
            }
        })
        .collect()
}

fn summary_lines(
    start: NaiveDate,
    end: NaiveDate,
    stats: &SummaryStats,
    generated_on: NaiveDate,
) -> Vec<String> {
    vec![
        format!("Report Period,{} to {}", start, end),
        format!("Total Records,{}", stats.total),
        format!("Present,{}", stats.present),
        format!("Absent,{}", stats.absent),
        format!("Late,{}", stats.late),
        format!("Attendance Rate,{}%", stats.attendance_rate()),
        format!("Generated On,{}", generated_on),
    ]
}

/// Full report text: header, rows, blank line, summary marker, summary.
/// Lines are `\n`-separated without a trailing newline.
pub fn render_report(
    start: NaiveDate,
    end: NaiveDate,
    attendance: &[AttendanceRecord],
    employees: &[Employee],
    generated_on: NaiveDate,
) -> String {
    let selected = select_in_range(start, end, attendance);
    let stats = SummaryStats::from_records(selected.iter().copied());
    let rows = join_rows(&selected, employees);

    let mut lines = Vec::with_capacity(rows.len() + 10);
    lines.push(REPORT_HEADER.to_string());
    lines.extend(rows.iter().map(ReportRow::to_csv));
    lines.push(String::new());
    lines.push(SUMMARY_MARKER.to_string());
    lines.extend(summary_lines(start, end, &stats, generated_on));
    lines.join("\n")
}

pub fn report_file_name(start: NaiveDate, end: NaiveDate) -> String {
    format!("attendance-report-{}-to-{}.csv", start, end)
}

/// Fetches report inputs and renders them. Callers ensure `start <= end`.
#[derive(Clone)]
pub struct ReportService {
    attendance: Arc<dyn AttendanceStore>,
    employees: Arc<dyn EmployeeStore>,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(
        attendance: Arc<dyn AttendanceStore>,
        employees: Arc<dyn EmployeeStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            attendance,
            employees,
            clock,
        }
    }

    #[instrument(name = "attendance_report", skip(self))]
    pub async fn generate(&self, start: NaiveDate, end: NaiveDate) -> Result<String, StoreError> {
        let attendance = self
            .attendance
            .by_date_range(start, end)
            .await
            .inspect_err(|e| error!(error = %e, "Error generating attendance report"))?;

        let employees = self
            .employees
            .all()
            .await
            .inspect_err(|e| error!(error = %e, "Error generating attendance report"))?;

        let report = render_report(start, end, &attendance, &employees, self.clock.today());
        info!(records = attendance.len(), "Attendance report generated");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::model::employee::{EmergencyContact, EmployeeStatus};
    use crate::store::{MemoryStore, MockAttendanceStore, MockEmployeeStore, Stores};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn employee(id: u64, first: &str, last: &str, department: &str) -> Employee {
        Employee {
            id,
            first_name: first.into(),
            last_name: last.into(),
            email: format!("{}@company.com", first.to_lowercase()),
            phone: "+1-555-0100".into(),
            role: "Engineer".into(),
            department: department.into(),
            start_date: date("2020-01-01"),
            status: EmployeeStatus::Active,
            photo: None,
            emergency_contact: EmergencyContact::default(),
        }
    }

    fn record(
        id: u64,
        employee_id: u64,
        day: &str,
        times: (Option<&str>, Option<&str>),
        status: Option<AttendanceStatus>,
    ) -> AttendanceRecord {
        AttendanceRecord {
            id,
            employee_id,
            date: date(day),
            check_in: times.0.map(String::from),
            check_out: times.1.map(String::from),
            status,
        }
    }

    fn fixed_clock(day: &'static str) -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_today().returning(move || date(day));
        Arc::new(clock)
    }

    #[test]
    fn single_present_record() {
        let report = render_report(
            date("2024-01-01"),
            date("2024-01-31"),
            &[record(
                1,
                1,
                "2024-01-05",
                (Some("09:00"), Some("17:00")),
                Some(AttendanceStatus::Present),
            )],
            &[employee(1, "Ann", "Lee", "Engineering")],
            date("2024-02-01"),
        );

        let expected = [
            REPORT_HEADER,
            r#"1,"Ann Lee","Engineering",2024-01-05,09:00,17:00,Present,8.00"#,
            "",
            SUMMARY_MARKER,
            "Report Period,2024-01-01 to 2024-01-31",
            "Total Records,1",
            "Present,1",
            "Absent,0",
            "Late,0",
            "Attendance Rate,100.0%",
            "Generated On,2024-02-01",
        ]
        .join("\n");
        assert_eq!(report, expected);
    }

    #[test]
    fn empty_range_has_header_and_zero_rate() {
        let report = render_report(
            date("2024-03-01"),
            date("2024-03-31"),
            &[record(1, 1, "2024-01-05", (None, None), Some(AttendanceStatus::Present))],
            &[],
            date("2024-04-01"),
        );
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], REPORT_HEADER);
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], SUMMARY_MARKER);
        assert!(lines.contains(&"Total Records,0"));
        assert!(lines.contains(&"Attendance Rate,0.0%"));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let attendance = [
            record(1, 1, "2023-12-31", (None, None), None),
            record(2, 1, "2024-01-01", (None, None), None),
            record(3, 1, "2024-01-31", (None, None), None),
            record(4, 1, "2024-02-01", (None, None), None),
        ];
        let rows = build_rows(date("2024-01-01"), date("2024-01-31"), &attendance, &[]);
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date("2024-01-01"), date("2024-01-31")]);
    }

    #[test]
    fn summary_counts_exactly_the_emitted_rows() {
        let attendance = [
            record(1, 1, "2023-12-31", (None, None), Some(AttendanceStatus::Present)),
            record(2, 1, "2024-01-01", (None, None), Some(AttendanceStatus::Late)),
            record(3, 2, "2024-01-15", (None, None), Some(AttendanceStatus::Absent)),
            record(4, 1, "2024-02-01", (None, None), Some(AttendanceStatus::Present)),
        ];
        let report = render_report(
            date("2024-01-01"),
            date("2024-01-31"),
            &attendance,
            &[employee(1, "Ann", "Lee", "Engineering")],
            date("2024-02-02"),
        );
        let lines: Vec<&str> = report.lines().collect();
        let blank = lines.iter().position(|l| l.is_empty()).unwrap();

        assert_eq!(blank - 1, 2);
        assert!(lines.contains(&"Total Records,2"));
        assert!(lines.contains(&"Present,0"));
        assert!(lines.contains(&"Late,1"));
        assert!(lines.contains(&"Absent,1"));
    }

    #[test]
    fn missing_employee_and_times_degrade_to_blanks() {
        let rows = build_rows(
            date("2024-01-01"),
            date("2024-01-31"),
            &[record(1, 42, "2024-01-10", (Some("09:00"), None), None)],
            &[employee(1, "Ann", "Lee", "Engineering")],
        );
        assert_eq!(rows[0].to_csv(), r#"42," ","",2024-01-10,09:00,,,0.00"#);
    }

    #[test]
    fn quoted_fields_escape_quotes_and_keep_commas() {
        let rows = build_rows(
            date("2024-01-01"),
            date("2024-01-31"),
            &[record(
                1,
                6,
                "2024-01-10",
                (Some("09:00"), Some("10:15")),
                Some(AttendanceStatus::Late),
            )],
            &[employee(6, "James \"Jim\"", "O'Brien", "Sales, EMEA")],
        );
        assert_eq!(
            rows[0].to_csv(),
            r#"6,"James ""Jim"" O'Brien","Sales, EMEA",2024-01-10,09:00,10:15,Late,1.25"#
        );
    }

    #[test]
    fn late_counts_toward_attendance_rate() {
        let attendance = [
            record(1, 1, "2024-01-02", (None, None), Some(AttendanceStatus::Present)),
            record(2, 1, "2024-01-03", (None, None), Some(AttendanceStatus::Late)),
            record(3, 1, "2024-01-04", (None, None), Some(AttendanceStatus::Absent)),
        ];
        let stats = SummaryStats::from_records(&attendance);
        assert_eq!(
            stats,
            SummaryStats {
                total: 3,
                present: 1,
                absent: 1,
                late: 1
            }
        );
        assert_eq!(stats.attendance_rate(), "66.7");
        assert_eq!(SummaryStats::default().attendance_rate(), "0.0");
    }

    #[test]
    fn unset_status_counts_only_in_total() {
        let attendance = [
            record(1, 1, "2024-01-02", (None, None), None),
            record(2, 1, "2024-01-03", (None, None), Some(AttendanceStatus::Present)),
        ];
        let stats = SummaryStats::from_records(&attendance);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.attendance_rate(), "50.0");
    }

    #[test]
    fn file_name_uses_both_dates() {
        assert_eq!(
            report_file_name(date("2024-01-01"), date("2024-01-31")),
            "attendance-report-2024-01-01-to-2024-01-31.csv"
        );
    }

    #[actix_web::test]
    async fn service_output_is_stable_with_fixed_clock() {
        let stores = Stores::from_backend(Arc::new(MemoryStore::with_sample_data().unwrap()));
        let service = ReportService::new(
            stores.attendance.clone(),
            stores.employees.clone(),
            fixed_clock("2024-02-01"),
        );

        let first = service
            .generate(date("2024-01-15"), date("2024-01-15"))
            .await
            .unwrap();
        let second = service
            .generate(date("2024-01-15"), date("2024-01-15"))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(first.contains(r#"1,"Sarah Johnson","Engineering",2024-01-15,09:00,17:30,Present,8.50"#));
        assert!(first.contains("Total Records,5"));
        assert!(first.contains("Attendance Rate,80.0%"));
        assert!(first.ends_with("Generated On,2024-02-01"));
    }

    #[actix_web::test]
    async fn attendance_fetch_failure_propagates() {
        let mut attendance = MockAttendanceStore::new();
        attendance
            .expect_by_date_range()
            .returning(|_, _| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));
        let mut employees = MockEmployeeStore::new();
        employees.expect_all().never();

        let service = ReportService::new(
            Arc::new(attendance),
            Arc::new(employees),
            fixed_clock("2024-02-01"),
        );
        let result = service.generate(date("2024-01-01"), date("2024-01-31")).await;
        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    #[actix_web::test]
    async fn employee_fetch_failure_propagates() {
        let mut attendance = MockAttendanceStore::new();
        attendance
            .expect_by_date_range()
            .withf(|start, end| *start == date("2024-01-01") && *end == date("2024-01-31"))
            .times(1)
            .returning(|_, _| Ok(vec![]));
        let mut employees = MockEmployeeStore::new();
        employees
            .expect_all()
            .times(1)
            .returning(|| Err(StoreError::Poisoned));

        let service = ReportService::new(
            Arc::new(attendance),
            Arc::new(employees),
            fixed_clock("2024-02-01"),
        );
        let result = service.generate(date("2024-01-01"), date("2024-01-31")).await;
        assert!(matches!(result, Err(StoreError::Poisoned)));
    }
}
