use actix_web::{error, web, HttpRequest};

use crate::errors::AppError;
use crate::handlers::{content, health, payment, task, user};

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}

/// Registers every route. Expects `web::Data<dyn DocumentStore>` and
/// `web::Data<EmployeeLookup>` to be provided by the enclosing `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .route("/", web::get().to(health::root))
        .route("/health", web::get().to(health::health_check))
        .route("/carousel", web::get().to(content::list_carousel))
        .route("/feature", web::get().to(content::list_features))
        .route("/service", web::get().to(content::list_services))
        .route("/testimonial", web::get().to(content::list_testimonials))
        .service(
            web::resource("/users")
                .route(web::get().to(user::list_users))
                .route(web::post().to(user::create_user)),
        )
        // Registered ahead of `/users/{id}` so the literal segment wins.
        .service(web::resource("/users/pay").route(web::post().to(payment::create_payment)))
        .service(
            web::resource("/users/{id}")
                .route(web::get().to(user::get_user_with_payments))
                .route(web::delete().to(user::delete_user)),
        )
        .service(web::resource("/users/{id}/role").route(web::patch().to(user::change_role)))
        .service(web::resource("/user/role").route(web::get().to(user::get_user_role)))
        .service(web::resource("/employees").route(web::get().to(user::list_employees)))
        .service(web::resource("/all-employee-list").route(web::get().to(user::list_verified_staff)))
        .service(web::resource("/all-employees-list/{id}").route(web::get().to(user::get_employee)))
        .service(web::resource("/employee-update/{id}").route(web::patch().to(user::update_employee)))
        .service(web::resource("/employee/verify/{id}").route(web::put().to(user::verify_employee)))
        .service(web::resource("/employee/toggle-verify/{id}").route(web::patch().to(user::toggle_verified)))
        .service(web::resource("/employee/pay/{id}").route(web::put().to(user::pay_employee)))
        .service(web::resource("/employee/fire/{id}").route(web::patch().to(user::fire_employee)))
        .service(
            web::resource("/tasks")
                .route(web::get().to(task::list_tasks))
                .route(web::post().to(task::create_task)),
        )
        .service(web::resource("/tasks/{email}").route(web::get().to(task::list_tasks_by_email)))
        .service(web::resource("/work-records").route(web::get().to(task::list_work_records)))
        .service(web::resource("/work-records/{id}").route(web::patch().to(task::update_task)))
        .service(web::resource("/payment-history").route(web::get().to(payment::list_payments)))
        .service(web::resource("/payment-history/{email}").route(web::get().to(payment::list_payments_by_email)));
}
