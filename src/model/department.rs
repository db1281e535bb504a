use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(rename = "Id")]
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Engineering")]
    pub name: String,

    #[serde(default)]
    #[schema(example = "Builds and runs the product")]
    pub description: String,

    #[serde(default)]
    #[schema(example = 12)]
    pub employee_count: u32,

    #[serde(default)]
    #[schema(nullable = true)]
    pub manager_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDepartment {
    #[schema(example = "Engineering")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub employee_count: u32,
    #[serde(default)]
    pub manager_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub employee_count: Option<u32>,
    pub manager_id: Option<u64>,
}

impl Department {
    pub fn from_new(id: u64, new: &NewDepartment) -> Self {
        Self {
            id,
            name: new.name.clone(),
            description: new.description.clone(),
            employee_count: new.employee_count,
            manager_id: new.manager_id,
        }
    }

    pub fn apply(&mut self, update: &DepartmentUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(count) = update.employee_count {
            self.employee_count = count;
        }
        if let Some(manager_id) = update.manager_id {
            self.manager_id = Some(manager_id);
        }
    }
}

impl DepartmentUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
