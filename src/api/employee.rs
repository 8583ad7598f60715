use crate::auth::auth::AuthManager;
use crate::model::employee::Employee;
use crate::store::LeaveStore;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use std::sync::RwLock;
use tracing::info;

/// The active manager's roster, for the modal's employee select.
#[utoipa::path(
    get,
    path = "/api/v1/employee",
    responses(
        (status = 200, description = "Employees of the active manager", body = [Employee]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthManager,
    store: web::Data<RwLock<LeaveStore>>,
) -> actix_web::Result<impl Responder> {
    let guard = store
        .read()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    match guard.manager_by_id(auth.manager_id) {
        Ok(manager) => Ok(HttpResponse::Ok().json(&manager.employees)),
        Err(e) => {
            info!(error = %e, "Token references an unknown manager");
            Ok(HttpResponse::Unauthorized().json(json!({"message": "Unknown manager"})))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{access_token_for, bearer, seeded_store, test_config};
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(seeded_store())
            .app_data(web::Data::new(test_config()))
            .service(
                web::scope("/api/v1/employee")
                    .service(web::resource("").route(web::get().to(list_employees))),
            )
    }

    #[actix_web::test]
    async fn roster_lists_the_managers_employees() {
        let app = actix_test::init_service(test_app()).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/employee")
            .insert_header(bearer(&access_token_for(1, "Aya")))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert!(res.status().is_success());

        let body: Value = serde_json::from_slice(&actix_test::read_body(res).await).expect("json");
        let names: Vec<&str> = body
            .as_array()
            .expect("array")
            .iter()
            .map(|emp| emp.get("name").and_then(Value::as_str).expect("name"))
            .collect();
        assert_eq!(names, vec!["Omar Kamali", "Youssef Ennaciri", "Ziyad Gout"]);
    }

    #[actix_web::test]
    async fn roster_is_per_manager() {
        let app = actix_test::init_service(test_app()).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/employee")
            .insert_header(bearer(&access_token_for(2, "Fatima Zahra")))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        let body: Value = serde_json::from_slice(&actix_test::read_body(res).await).expect("json");
        assert_eq!(body.as_array().expect("array").len(), 2);
    }

    #[actix_web::test]
    async fn roster_requires_a_token() {
        let app = actix_test::init_service(test_app()).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/employee")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn roster_rejects_a_vanished_manager() {
        let app = actix_test::init_service(test_app()).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/employee")
            .insert_header(bearer(&access_token_for(99, "Ghost")))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
