use crate::api::{attendance, employee};
use actix_web::{
    Error, HttpRequest, HttpResponse, error::InternalError, get, web,
};
use serde_json::json;

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "success": false,
        "message": message
    }))
}

/// Malformed JSON bodies get the same envelope as store errors.
fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> Error {
    let resp = bad_request(format!("Invalid request body: {}", err));
    InternalError::from_response(err, resp).into()
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> Error {
    let resp = bad_request(format!("Invalid query string: {}", err));
    InternalError::from_response(err, resp).into()
}

/// Route prefix the API scope is mounted under, e.g. `/api`.
#[derive(Debug, Clone)]
pub struct ApiPrefix(pub String);

#[get("/")]
async fn index(prefix: web::Data<ApiPrefix>) -> HttpResponse {
    let prefix = &prefix.0;
    HttpResponse::Ok().json(json!({
        "message": "HRMS Lite API is running...",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/swagger-ui/",
        "endpoints": {
            "employees": format!("{prefix}/employees"),
            "attendance": format!("{prefix}/attendance")
        }
    }))
}

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "healthy" }))
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "message": format!("Route {} not found", req.path())
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    cfg.app_data(web::Data::new(ApiPrefix(api_prefix.to_string())))
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(index)
        .service(health);

    cfg.service(
        web::scope(api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendance))
                            .route(web::post().to(attendance::mark_attendance)),
                    )
                    // /attendance/dashboard
                    .service(
                        web::resource("/dashboard")
                            .route(web::get().to(attendance::get_dashboard)),
                    )
                    // /attendance/summary/{employee_id}
                    .service(
                        web::resource("/summary/{employee_id}")
                            .route(web::get().to(attendance::attendance_summary)),
                    )
                    // /attendance/employee/{employee_id}
                    .service(
                        web::resource("/employee/{employee_id}")
                            .route(web::get().to(attendance::employee_attendance)),
                    ),
            ),
    );
}
