use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::ApiError,
    model::employee::{Employee, EmployeeStatus, EmployeeUpdate, NewEmployee},
    models::MessageResponse,
    store::Stores,
};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    /// Matches name, email or role, case-insensitive
    pub search: Option<String>,
    /// Exact department name
    pub department: Option<String>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 10)]
    pub total: usize,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl EmployeeQuery {
    fn matches(&self, employee: &Employee) -> bool {
        if let Some(term) = non_empty(&self.search) {
            let term = term.to_lowercase();
            let hit = employee.full_name().to_lowercase().contains(&term)
                || employee.email.to_lowercase().contains(&term)
                || employee.role.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }

        if let Some(department) = non_empty(&self.department) {
            if employee.department != department {
                return false;
            }
        }

        self.status.is_none_or(|status| employee.status == status)
    }
}

/// Apply search and filters, keeping store order.
pub fn filter_employees(employees: Vec<Employee>, query: &EmployeeQuery) -> Vec<Employee> {
    employees.into_iter().filter(|e| query.matches(e)).collect()
}

#[utoipa::path(
    get,
    path = "/api/employee",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Filtered employee list", body = EmployeeListResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    stores: web::Data<Stores>,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse, ApiError> {
    let employees = stores.employees.all().await?;
    let data = filter_employees(employees, &query);
    debug!(query = ?query, total = data.len(), "Listing employees");

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        total: data.len(),
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/api/employee/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = MessageResponse)
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    stores: web::Data<Stores>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    match stores.employees.find_by_id(employee_id).await? {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Err(ApiError::NotFound("Employee")),
    }
}

#[utoipa::path(
    post,
    path = "/api/employee",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 422, description = "Required fields missing", body = MessageResponse)
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    stores: web::Data<Stores>,
    payload: web::Json<NewEmployee>,
) -> Result<HttpResponse, ApiError> {
    let missing = payload.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::Validation(missing));
    }

    let employee = stores.employees.create(&payload).await?;
    info!(employee_id = employee.id, "Employee created");
    Ok(HttpResponse::Created().json(employee))
}

#[utoipa::path(
    put,
    path = "/api/employee/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    request_body = EmployeeUpdate,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Empty update", body = MessageResponse),
        (status = 404, description = "Employee not found", body = MessageResponse),
        (status = 422, description = "Required field blanked", body = MessageResponse)
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    stores: web::Data<Stores>,
    path: web::Path<u64>,
    payload: web::Json<EmployeeUpdate>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    if payload.is_empty() {
        return Err(ApiError::EmptyUpdate);
    }
    let blanked = payload.blanked_fields();
    if !blanked.is_empty() {
        return Err(ApiError::Validation(blanked));
    }

    match stores.employees.update(employee_id, &payload).await? {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Err(ApiError::NotFound("Employee")),
    }
}

#[utoipa::path(
    delete,
    path = "/api/employee/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Successfully deleted", body = MessageResponse),
        (status = 404, description = "Employee not found", body = MessageResponse)
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    stores: web::Data<Stores>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    if !stores.employees.delete(employee_id).await? {
        return Err(ApiError::NotFound("Employee"));
    }

    info!(employee_id, "Employee deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Successfully deleted")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test as actix_test};
    use serde_json::{Value, json};

    use super::*;
    use crate::store::MemoryStore;

    fn sample() -> Vec<Employee> {
        serde_json::from_str(include_str!("../../fixtures/employees.json")).unwrap()
    }

    fn ids(employees: &[Employee]) -> Vec<u64> {
        employees.iter().map(|e| e.id).collect()
    }

    #[test]
    fn search_covers_name_email_and_role() {
        let by_name = EmployeeQuery {
            search: Some("sarah john".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_employees(sample(), &by_name)), vec![1]);

        let by_email = EmployeeQuery {
            search: Some("PRIYA.PATEL@".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_employees(sample(), &by_email)), vec![5]);

        let by_role = EmployeeQuery {
            search: Some("engineer".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_employees(sample(), &by_role)), vec![1, 7]);
    }

    #[test]
    fn filters_combine() {
        let query = EmployeeQuery {
            search: None,
            department: Some("Engineering".into()),
            status: Some(EmployeeStatus::Active),
        };
        assert_eq!(ids(&filter_employees(sample(), &query)), vec![1, 2]);

        let on_leave = EmployeeQuery {
            status: Some(EmployeeStatus::OnLeave),
            ..Default::default()
        };
        assert_eq!(ids(&filter_employees(sample(), &on_leave)), vec![4]);
    }

    #[test]
    fn blank_filters_are_ignored() {
        let query = EmployeeQuery {
            search: Some("  ".into()),
            department: Some(String::new()),
            status: None,
        };
        assert_eq!(filter_employees(sample(), &query).len(), sample().len());
    }

    fn app_data() -> web::Data<Stores> {
        let store = Arc::new(MemoryStore::with_sample_data().unwrap());
        web::Data::new(Stores::from_backend(store))
    }

    #[actix_web::test]
    async fn create_rejects_blank_required_fields() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data())
                .route("/employee", web::post().to(create_employee)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/employee")
            .set_json(json!({
                "firstName": "Ann",
                "lastName": " ",
                "email": "ann.lee@company.com",
                "phone": "",
                "role": "Analyst",
                "department": "Finance",
                "startDate": "2024-02-01"
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["message"], "Missing required fields: lastName, phone");
    }

    #[actix_web::test]
    async fn create_then_list_with_filter() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data())
                .route("/employee", web::get().to(list_employees))
                .route("/employee", web::post().to(create_employee)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/employee")
            .set_json(json!({
                "firstName": "Ann",
                "lastName": "Lee",
                "email": "ann.lee@company.com",
                "phone": "+1-555-0199",
                "role": "Analyst",
                "department": "Finance",
                "startDate": "2024-02-01"
            }))
            .to_request();
        let created: Employee = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.id, 8);
        assert_eq!(created.status, EmployeeStatus::Active);

        let req = actix_test::TestRequest::get()
            .uri("/employee?department=Finance&status=Active")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["data"][1]["firstName"], "Ann");
    }

    #[actix_web::test]
    async fn update_and_delete_unknown_employee() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_data())
                .route("/employee/{id}", web::put().to(update_employee))
                .route("/employee/{id}", web::delete().to(delete_employee)),
        )
        .await;

        let req = actix_test::TestRequest::put()
            .uri("/employee/99")
            .set_json(json!({ "role": "Lead" }))
            .to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = actix_test::TestRequest::put()
            .uri("/employee/1")
            .set_json(json!({}))
            .to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = actix_test::TestRequest::delete().uri("/employee/1").to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = actix_test::TestRequest::delete().uri("/employee/1").to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
