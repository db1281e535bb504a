use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::ApiError,
    model::{
        department::{Department, DepartmentUpdate, NewDepartment},
        employee::Employee,
    },
    models::MessageResponse,
    store::Stores,
};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct DepartmentQuery {
    /// Matches name or description, case-insensitive
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct DepartmentListResponse {
    pub data: Vec<Department>,
    #[schema(example = 4)]
    pub total: usize,
}

/// Replace stored head counts with the number of employees whose
/// department name matches.
pub fn with_live_counts(departments: Vec<Department>, employees: &[Employee]) -> Vec<Department> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for employee in employees {
        *counts.entry(employee.department.as_str()).or_default() += 1;
    }

    departments
        .into_iter()
        .map(|mut department| {
            department.employee_count = counts.get(department.name.as_str()).copied().unwrap_or(0);
            department
        })
        .collect()
}

pub fn filter_departments(departments: Vec<Department>, search: Option<&str>) -> Vec<Department> {
    let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) else {
        return departments;
    };
    let term = term.to_lowercase();

    departments
        .into_iter()
        .filter(|d| {
            d.name.to_lowercase().contains(&term) || d.description.to_lowercase().contains(&term)
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/department",
    params(DepartmentQuery),
    responses(
        (status = 200, description = "Departments with live employee counts", body = DepartmentListResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Department"
)]
pub async fn list_departments(
    stores: web::Data<Stores>,
    query: web::Query<DepartmentQuery>,
) -> Result<HttpResponse, ApiError> {
    let (departments, employees) =
        futures::try_join!(stores.departments.all(), stores.employees.all())?;

    let data = filter_departments(
        with_live_counts(departments, &employees),
        query.search.as_deref(),
    );
    debug!(total = data.len(), "Listing departments");

    Ok(HttpResponse::Ok().json(DepartmentListResponse {
        total: data.len(),
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/api/department/{id}",
    params(("id" = u64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department found", body = Department),
        (status = 404, description = "Department not found", body = MessageResponse)
    ),
    tag = "Department"
)]
pub async fn get_department(
    stores: web::Data<Stores>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let department_id = path.into_inner();

    let Some(department) = stores.departments.find_by_id(department_id).await? else {
        return Err(ApiError::NotFound("Department"));
    };
    let employees = stores.employees.all().await?;

    let department = with_live_counts(vec![department], &employees)
        .pop()
        .ok_or(ApiError::NotFound("Department"))?;
    Ok(HttpResponse::Ok().json(department))
}

#[utoipa::path(
    post,
    path = "/api/department",
    request_body = NewDepartment,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 422, description = "Name missing", body = MessageResponse)
    ),
    tag = "Department"
)]
pub async fn create_department(
    stores: web::Data<Stores>,
    payload: web::Json<NewDepartment>,
) -> Result<HttpResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation(vec!["name"]));
    }

    let department = stores.departments.create(&payload).await?;
    info!(department_id = department.id, name = %department.name, "Department created");
    Ok(HttpResponse::Created().json(department))
}

#[utoipa::path(
    put,
    path = "/api/department/{id}",
    params(("id" = u64, Path, description = "Department ID")),
    request_body = DepartmentUpdate,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 400, description = "Empty update", body = MessageResponse),
        (status = 404, description = "Department not found", body = MessageResponse)
    ),
    tag = "Department"
)]
pub async fn update_department(
    stores: web::Data<Stores>,
    path: web::Path<u64>,
    payload: web::Json<DepartmentUpdate>,
) -> Result<HttpResponse, ApiError> {
    let department_id = path.into_inner();

    if payload.is_empty() {
        return Err(ApiError::EmptyUpdate);
    }
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::Validation(vec!["name"]));
    }

    match stores.departments.update(department_id, &payload).await? {
        Some(department) => Ok(HttpResponse::Ok().json(department)),
        None => Err(ApiError::NotFound("Department")),
    }
}

#[utoipa::path(
    delete,
    path = "/api/department/{id}",
    params(("id" = u64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Successfully deleted", body = MessageResponse),
        (status = 404, description = "Department not found", body = MessageResponse)
    ),
    tag = "Department"
)]
pub async fn delete_department(
    stores: web::Data<Stores>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let department_id = path.into_inner();

    if !stores.departments.delete(department_id).await? {
        return Err(ApiError::NotFound("Department"));
    }

    info!(department_id, "Department deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Successfully deleted")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test as actix_test};
    use serde_json::{Value, json};

    use super::*;
    use crate::store::MemoryStore;

    fn departments() -> Vec<Department> {
        serde_json::from_str(include_str!("../../fixtures/departments.json")).unwrap()
    }

    fn employees() -> Vec<Employee> {
        serde_json::from_str(include_str!("../../fixtures/employees.json")).unwrap()
    }

    #[test]
    fn counts_follow_employee_departments() {
        let mut departments = departments();
        departments[0].employee_count = 99;
        departments.push(Department {
            id: 5,
            name: "Legal".into(),
            description: String::new(),
            employee_count: 3,
            manager_id: None,
        });

        let counted = with_live_counts(departments, &employees());
        let counts: Vec<(&str, u32)> = counted
            .iter()
            .map(|d| (d.name.as_str(), d.employee_count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("Engineering", 3),
                ("Human Resources", 1),
                ("Marketing", 2),
                ("Finance", 1),
                ("Legal", 0),
            ]
        );
    }

    #[test]
    fn search_matches_description_too() {
        let found = filter_departments(departments(), Some("PAYROLL"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Finance");

        assert_eq!(filter_departments(departments(), Some(" ")).len(), 4);
        assert_eq!(filter_departments(departments(), None).len(), 4);
    }

    #[actix_web::test]
    async fn create_requires_name() {
        let stores = Stores::from_backend(Arc::new(MemoryStore::with_sample_data().unwrap()));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(stores))
                .route("/department", web::get().to(list_departments))
                .route("/department", web::post().to(create_department)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/department")
            .set_json(json!({ "name": "  " }))
            .to_request();
        assert_eq!(
            actix_test::call_service(&app, req).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let req = actix_test::TestRequest::post()
            .uri("/department")
            .set_json(json!({ "name": "Legal", "description": "Contracts" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = actix_test::TestRequest::get()
            .uri("/department?search=legal")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["employeeCount"], 0);
    }
}
