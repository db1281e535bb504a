use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    ToSchema,
)]
pub enum EmployeeStatus {
    #[default]
    Active,
    #[serde(rename = "On Leave")]
    #[strum(serialize = "On Leave")]
    OnLeave,
    Inactive,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EmergencyContact {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "+1-555-0100")]
    pub phone: String,
    #[schema(example = "Spouse")]
    pub relationship: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "Id": 1,
        "firstName": "John",
        "lastName": "Doe",
        "email": "john.doe@company.com",
        "phone": "+1-555-0101",
        "role": "Software Engineer",
        "department": "Engineering",
        "startDate": "2024-01-01",
        "status": "Active",
        "photo": null,
        "emergencyContact": {
            "name": "Jane Doe",
            "phone": "+1-555-0100",
            "relationship": "Spouse"
        }
    })
)]
pub struct Employee {
    #[serde(rename = "Id")]
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[schema(example = "+1-555-0101")]
    pub phone: String,

    #[schema(example = "Software Engineer")]
    pub role: String,

    /// Department name, not id
    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    pub status: EmployeeStatus,

    #[serde(default)]
    #[schema(nullable = true)]
    pub photo: Option<String>,

    #[serde(default)]
    pub emergency_contact: EmergencyContact,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,
    #[schema(example = "+1-555-0101")]
    pub phone: String,
    #[schema(example = "Software Engineer")]
    pub role: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub emergency_contact: EmergencyContact,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    #[schema(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    pub status: Option<EmployeeStatus>,
    pub photo: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl Employee {
    /// `firstName lastName`, as shown in listings and reports
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn from_new(id: u64, new: &NewEmployee) -> Self {
        Self {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            role: new.role.clone(),
            department: new.department.clone(),
            start_date: new.start_date,
            status: new.status,
            photo: new.photo.clone(),
            emergency_contact: new.emergency_contact.clone(),
        }
    }

    pub fn apply(&mut self, update: &EmployeeUpdate) {
        let EmployeeUpdate {
            first_name,
            last_name,
            email,
            phone,
            role,
            department,
            start_date,
            status,
            photo,
            emergency_contact,
        } = update;

        if let Some(v) = first_name {
            self.first_name = v.clone();
        }
        if let Some(v) = last_name {
            self.last_name = v.clone();
        }
        if let Some(v) = email {
            self.email = v.clone();
        }
        if let Some(v) = phone {
            self.phone = v.clone();
        }
        if let Some(v) = role {
            self.role = v.clone();
        }
        if let Some(v) = department {
            self.department = v.clone();
        }
        if let Some(v) = start_date {
            self.start_date = *v;
        }
        if let Some(v) = status {
            self.status = *v;
        }
        if let Some(v) = photo {
            self.photo = Some(v.clone());
        }
        if let Some(v) = emergency_contact {
            self.emergency_contact = v.clone();
        }
    }
}

impl NewEmployee {
    /// Names of required fields left blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("role", &self.role),
            ("department", &self.department),
        ]
        .into_iter()
        .filter(|(_, value)| blank(value))
        .map(|(name, _)| name)
        .collect()
    }
}

impl EmployeeUpdate {
    /// Required fields that are present in the patch but blank.
    pub fn blanked_fields(&self) -> Vec<&'static str> {
        [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("role", &self.role),
            ("department", &self.department),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(blank))
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
