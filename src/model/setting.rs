use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WorkingHours {
    #[schema(example = "09:00")]
    pub start: String,
    #[schema(example = "17:00")]
    pub end: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Notifications {
    pub email: bool,
    pub desktop: bool,
    pub attendance: bool,
}

/// Company-wide preferences shown on the settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    #[serde(rename = "Id")]
    pub id: u64,
    #[schema(example = "Acme Corp")]
    pub company_name: String,
    #[schema(example = "hr@acme.example")]
    pub company_email: String,
    #[schema(example = "UTC")]
    pub timezone: String,
    #[schema(example = "YYYY-MM-DD")]
    pub date_format: String,
    pub working_hours: WorkingHours,
    #[serde(default)]
    pub notifications: Notifications,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingUpdate {
    pub company_name: Option<String>,
    pub company_email: Option<String>,
    pub timezone: Option<String>,
    pub date_format: Option<String>,
    pub working_hours: Option<WorkingHours>,
    pub notifications: Option<Notifications>,
}

impl Setting {
    pub fn apply(&mut self, update: &SettingUpdate) {
        if let Some(v) = &update.company_name {
            self.company_name = v.clone();
        }
        if let Some(v) = &update.company_email {
            self.company_email = v.clone();
        }
        if let Some(v) = &update.timezone {
            self.timezone = v.clone();
        }
        if let Some(v) = &update.date_format {
            self.date_format = v.clone();
        }
        if let Some(v) = &update.working_hours {
            self.working_hours = v.clone();
        }
        if let Some(v) = update.notifications {
            self.notifications = v;
        }
    }
}

impl SettingUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
