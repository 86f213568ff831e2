use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::{self, Data};
use actix_web::{App, HttpServer};
use anyhow::Context;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod repo;
mod routes;
mod store;

use config::{Config, StorageBackend};
use db::init_db;
use repo::{MemoryRepository, MySqlRepository};

use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(backend = %config.storage, addr = %config.server_addr, "Server starting...");

    let (employees, attendance) = match config.storage {
        StorageBackend::MySql => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = init_db(url)
                .await
                .context("Failed to connect to database")?;
            store::stores(Arc::new(MySqlRepository::new(pool)))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            store::stores(Arc::new(MemoryRepository::new()))
        }
    };

    let employees = Data::new(employees);
    let attendance = Data::new(attendance);
    let api_prefix = config.api_prefix.clone();
    let openapi = docs::openapi(&api_prefix);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", openapi.clone()),
            )
            .app_data(employees.clone())
            .app_data(attendance.clone())
            .configure(|cfg| routes::configure(cfg, &api_prefix))
            .default_service(web::to(routes::not_found))
    })
    .bind(&config.server_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{Value, json};

    macro_rules! app {
        () => {
            app!("/api")
        };
        ($prefix:expr) => {{
            let (employees, attendance) = store::stores(Arc::new(MemoryRepository::new()));
            test::init_service(
                App::new()
                    .wrap(NormalizePath::trim())
                    .app_data(Data::new(employees))
                    .app_data(Data::new(attendance))
                    .configure(|cfg| routes::configure(cfg, $prefix))
                    .default_service(web::to(routes::not_found)),
            )
            .await
        }};
    }

    macro_rules! create {
        ($app:expr, $employee_id:expr, $email:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/employees")
                .set_json(json!({
                    "employee_id": $employee_id,
                    "full_name": "Grace Hopper",
                    "email": $email,
                    "department": "Engineering"
                }))
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: Value = test::read_body_json(resp).await;
            body["data"].clone()
        }};
    }

    #[actix_web::test]
    async fn employee_crud_round_trip() {
        let app = app!();
        let created = create!(app, "e-1", "Grace@Navy.mil");
        assert_eq!(created["employee_id"], "E-1");
        assert_eq!(created["email"], "grace@navy.mil");

        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get().uri(&format!("/api/employees/{id}")).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], id.as_str());

        let req = test::TestRequest::get().uri("/api/employees/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 1);

        let req = test::TestRequest::delete().uri(&format!("/api/employees/{id}")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri(&format!("/api/employees/{id}")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn errors_map_to_statuses_with_a_message() {
        let app = app!();
        create!(app, "E1", "a@x.com");

        let dup = test::TestRequest::post()
            .uri("/api/employees")
            .set_json(json!({
                "employee_id": "e1",
                "full_name": "Someone Else",
                "email": "b@x.com",
                "department": "Finance"
            }))
            .to_request();
        let resp = test::call_service(&app, dup).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("E1"));

        let bad_dept = test::TestRequest::post()
            .uri("/api/employees")
            .set_json(json!({
                "employee_id": "E2",
                "full_name": "Someone Else",
                "email": "b@x.com",
                "department": "Research"
            }))
            .to_request();
        assert_eq!(
            test::call_service(&app, bad_dept).await.status(),
            StatusCode::BAD_REQUEST
        );

        let malformed = test::TestRequest::get().uri("/api/employees/123").to_request();
        assert_eq!(
            test::call_service(&app, malformed).await.status(),
            StatusCode::BAD_REQUEST
        );

        let broken_json = test::TestRequest::post()
            .uri("/api/employees")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, broken_json).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);

        let bad_query = test::TestRequest::get()
            .uri("/api/attendance?start_date=yesterday")
            .to_request();
        assert_eq!(
            test::call_service(&app, bad_query).await.status(),
            StatusCode::BAD_REQUEST
        );

        let nowhere = test::TestRequest::get().uri("/api/payroll").to_request();
        let resp = test::call_service(&app, nowhere).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Route /api/payroll not found");
    }

    #[actix_web::test]
    async fn marking_twice_updates_the_same_record() {
        let app = app!();
        let employee = create!(app, "E1", "a@x.com");
        let id = employee["id"].as_str().unwrap();

        let mark = |status: &str| {
            test::TestRequest::post()
                .uri("/api/attendance")
                .set_json(json!({ "employee_id": id, "date": "2024-01-01", "status": status }))
                .to_request()
        };

        let resp = test::call_service(&app, mark("Present")).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let first: Value = test::read_body_json(resp).await;
        assert_eq!(first["data"]["employee"]["employee_id"], "E1");

        let resp = test::call_service(&app, mark("Absent")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let second: Value = test::read_body_json(resp).await;
        assert_eq!(second["data"]["id"], first["data"]["id"]);
        assert_eq!(second["message"], "Attendance updated successfully");

        let req = test::TestRequest::get()
            .uri(&format!("/api/attendance/employee/{id}?start_date=2024-01-01&end_date=2024-01-01"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["status"], "Absent");
        assert_eq!(body["data"][0]["date"], "2024-01-01");

        let resp = test::call_service(&app, mark("Late")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn summary_dashboard_and_cascade() {
        let app = app!();
        let employee = create!(app, "E1", "a@x.com");
        let id = employee["id"].as_str().unwrap();

        for date in ["2024-01-01", "2024-01-02"] {
            let req = test::TestRequest::post()
                .uri("/api/attendance")
                .set_json(json!({ "employee_id": id, "date": date, "status": "Present" }))
                .to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/attendance/summary/{id}"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["summary"]["present_days"], 2);
        assert_eq!(body["data"]["summary"]["total_days"], 2);
        assert_eq!(body["data"]["employee"]["full_name"], "Grace Hopper");

        let req = test::TestRequest::get()
            .uri("/api/attendance?date=2024-01-02")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 1);

        let req = test::TestRequest::get().uri("/api/attendance/dashboard").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["total_employees"], 1);
        assert_eq!(
            body["data"]["department_stats"],
            json!([{ "department": "Engineering", "count": 1 }])
        );

        let req = test::TestRequest::delete().uri(&format!("/api/employees/{id}")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/attendance").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 0);
    }

    #[actix_web::test]
    async fn health_endpoints_answer() {
        let app = app!();
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");

        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["endpoints"]["employees"], "/api/employees");
    }

    #[actix_web::test]
    async fn custom_prefix_moves_routes_and_banner() {
        let app = app!("/v1");

        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["endpoints"]["employees"], "/v1/employees");
        assert_eq!(body["endpoints"]["attendance"], "/v1/attendance");

        let req = test::TestRequest::get().uri("/v1/employees").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/employees").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
