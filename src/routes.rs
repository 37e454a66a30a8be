use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::api::handlers::person_handlers::{
    add_pet, average_age, create_person, delete_person, find_by_age, find_by_name,
    get_all_people, get_car, get_pets, set_car, update_person,
};
use crate::utils::errors::{ApiError, Location};

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected request body: {}", err);
    ApiError::field(Location::Body, "body", &format!("body must be valid JSON: {}", err)).into()
}

/// Registers the person endpoints relative to wherever they are mounted.
pub fn person_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler));

    cfg.service(
        web::resource(["", "/"])
            .route(web::get().to(get_all_people))
            .route(web::post().to(create_person))
    );

    cfg.service(
        web::resource("/person/{id}")
            .route(web::delete().to(delete_person))
            .route(web::patch().to(update_person))
    );

    cfg.service(
        web::resource("/name/{name}")
            .route(web::get().to(find_by_name))
    );

    cfg.service(
        web::resource("/age/{age}")
            .route(web::get().to(find_by_age))
    );

    cfg.service(
        web::resource("/average/age")
            .route(web::get().to(average_age))
    );

    cfg.service(
        web::resource("/person/{id}/pet/{petId}")
            .route(web::post().to(add_pet))
    );

    cfg.service(
        web::resource("/person/{id}/pets")
            .route(web::get().to(get_pets))
    );

    cfg.service(
        web::resource("/person/{id}/car")
            .route(web::get().to(get_car))
    );

    cfg.service(
        web::resource("/person/{id}/car/{carId}")
            .route(web::post().to(set_car))
    );
}
