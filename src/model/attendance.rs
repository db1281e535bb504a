use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

/// One employee's presence outcome for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "Id": 1,
        "employeeId": 1,
        "date": "2024-01-05",
        "checkIn": "09:00",
        "checkOut": "17:00",
        "status": "Present"
    })
)]
pub struct AttendanceRecord {
    #[serde(rename = "Id")]
    pub id: u64,

    pub employee_id: u64,

    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,

    /// `HH:MM`, 24-hour clock
    #[serde(default)]
    pub check_in: Option<String>,

    #[serde(default)]
    pub check_out: Option<String>,

    #[serde(default)]
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "2024-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "09:00")]
    #[serde(default)]
    pub check_in: Option<String>,

    #[schema(example = "17:00")]
    #[serde(default)]
    pub check_out: Option<String>,

    #[serde(default)]
    pub status: Option<AttendanceStatus>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUpdate {
    pub employee_id: Option<u64>,
    #[schema(value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceRecord {
    pub fn from_new(id: u64, new: &NewAttendance) -> Self {
        Self {
            id,
            employee_id: new.employee_id,
            date: new.date,
            check_in: new.check_in.clone(),
            check_out: new.check_out.clone(),
            status: new.status,
        }
    }

    pub fn apply(&mut self, update: &AttendanceUpdate) {
        if let Some(employee_id) = update.employee_id {
            self.employee_id = employee_id;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(check_in) = &update.check_in {
            self.check_in = Some(check_in.clone());
        }
        if let Some(check_out) = &update.check_out {
            self.check_out = Some(check_out.clone());
        }
        if let Some(status) = update.status {
            self.status = Some(status);
        }
    }

    pub fn is_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.date && self.date <= end
    }
}

impl AttendanceUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: 1,
            employee_id: 7,
            date: date.parse().unwrap(),
            check_in: Some("09:00".into()),
            check_out: None,
            status: Some(AttendanceStatus::Late),
        }
    }

    #[test]
    fn range_check_is_inclusive() {
        let start: NaiveDate = "2024-01-01".parse().unwrap();
        let end: NaiveDate = "2024-01-31".parse().unwrap();

        assert!(record("2024-01-01").is_within(start, end));
        assert!(record("2024-01-31").is_within(start, end));
        assert!(!record("2023-12-31").is_within(start, end));
        assert!(!record("2024-02-01").is_within(start, end));
    }

    #[test]
    fn apply_only_touches_provided_fields() {
        let mut rec = record("2024-01-05");
        rec.apply(&AttendanceUpdate {
            check_out: Some("17:15".into()),
            status: Some(AttendanceStatus::Present),
            ..Default::default()
        });

        assert_eq!(rec.check_in.as_deref(), Some("09:00"));
        assert_eq!(rec.check_out.as_deref(), Some("17:15"));
        assert_eq!(rec.status, Some(AttendanceStatus::Present));
        assert_eq!(rec.employee_id, 7);
    }

    #[test]
    fn json_uses_ui_field_names() {
        let json = serde_json::to_value(record("2024-01-05")).unwrap();
        assert_eq!(json["Id"], 1);
        assert_eq!(json["employeeId"], 7);
        assert_eq!(json["checkIn"], "09:00");
        assert_eq!(json["status"], "Late");
        assert!(json["checkOut"].is_null());
    }
}
