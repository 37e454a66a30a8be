use actix_web::{web, HttpResponse};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde_json::{json, Value};

use crate::api::state::AppState;
use crate::api::validation::Validator;
use crate::domain::person::model::{NewPerson, PersonChanges, PersonSend, MAX_AGE, MIN_AGE};
use crate::utils::errors::{ApiError, Location};

const UPDATABLE_FIELDS: [&str; 3] = ["name", "lastname", "age"];

fn id_param(raw: &str) -> Result<ObjectId, ApiError> {
    let mut validator = Validator::new();
    let id = validator.object_id(Location::Params, "id", raw);
    validator.finish_with(id)
}

pub async fn get_all_people(
    state: web::Data<AppState>
) -> Result<HttpResponse, ApiError> {
    let people = state.people.get_all_people().await?;
    log::debug!("Listing {} people", people.len());

    let people: Vec<PersonSend> = people.iter().map(|p| p.to_send()).collect();
    Ok(HttpResponse::Ok().json(people))
}

pub async fn create_person(
    state: web::Data<AppState>,
    body: web::Json<Value>
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let mut validator = Validator::new();

    let mut person = None;
    if let Some(object) = validator.object(&body) {
        let name = validator.required_string(object, "name");
        let lastname = validator.required_string(object, "lastname");
        let age = validator.required_float_in_range(object, "age", MIN_AGE..=MAX_AGE);

        if let (Some(name), Some(lastname), Some(age)) = (name, lastname, age) {
            person = Some(NewPerson { name, lastname, age });
        }
    }
    let person = validator.finish_with(person)?;

    let person = state.people.create_person(person).await?;
    log::info!("Created person {:?}", person.id);

    Ok(HttpResponse::Ok().json(person.to_send()))
}

pub async fn delete_person(
    state: web::Data<AppState>,
    path: web::Path<String>
) -> Result<HttpResponse, ApiError> {
    let id = id_param(&path.into_inner())?;

    state.people.delete_person(id).await?;
    log::info!("Deleted person {}", id);

    Ok(HttpResponse::Ok().json(json!({ "deletedPersonId": id.to_hex() })))
}

pub async fn update_person(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Value>
) -> Result<HttpResponse, ApiError> {
    let raw_id = path.into_inner();
    let body = body.into_inner();
    let mut validator = Validator::new();

    let id = validator.object_id(Location::Params, "id", &raw_id);
    let mut changes = PersonChanges {
        name: None,
        lastname: None,
        age: None,
        updated_at: DateTime::now(),
    };

    if let Some(object) = validator.object(&body) {
        validator.only_keys(object, &UPDATABLE_FIELDS);
        changes.name = validator.optional_string(object, "name");
        changes.lastname = validator.optional_string(object, "lastname");
        if let Some(age) = object.get("age") {
            changes.age = validator.float_in_range(Location::Body, "age", age, MIN_AGE..=MAX_AGE);
        }
    }
    let id = validator.finish_with(id)?;

    state.people.update_person(id, changes).await?;
    log::info!("Updated person {}", id);

    Ok(HttpResponse::Ok().json(json!({ "updatedPersonId": id.to_hex() })))
}

pub async fn find_by_name(
    state: web::Data<AppState>,
    path: web::Path<String>
) -> Result<HttpResponse, ApiError> {
    let name = path.into_inner();
    let people = state.people.find_by_name(&name).await?;
    log::debug!("Found {} people named {}", people.len(), name);

    let people: Vec<PersonSend> = people.iter().map(|p| p.to_send()).collect();
    Ok(HttpResponse::Ok().json(people))
}

pub async fn find_by_age(
    state: web::Data<AppState>,
    path: web::Path<String>
) -> Result<HttpResponse, ApiError> {
    let raw_age = Value::String(path.into_inner());
    let mut validator = Validator::new();
    let age = validator.float_in_range(Location::Params, "age", &raw_age, MIN_AGE..=MAX_AGE);
    let age = validator.finish_with(age)?;

    let people = state.people.find_by_age(age).await?;
    let people: Vec<PersonSend> = people.iter().map(|p| p.to_send()).collect();
    Ok(HttpResponse::Ok().json(people))
}

pub async fn average_age(
    state: web::Data<AppState>
) -> Result<HttpResponse, ApiError> {
    let average = state.people.average_age().await?;
    Ok(HttpResponse::Ok().json(average))
}

pub async fn add_pet(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>
) -> Result<HttpResponse, ApiError> {
    let (raw_id, raw_pet_id) = path.into_inner();
    let mut validator = Validator::new();

    let id = validator.object_id(Location::Params, "id", &raw_id);
    let pet_id = validator.object_id(Location::Params, "petId", &raw_pet_id);

    if let Some(id) = id {
        let exists = state.people.person_exists(id).await?;
        validator.check(exists, Location::Params, "id", Some(Value::String(raw_id)), "person does not exist");
    }
    if let Some(pet_id) = pet_id {
        let exists = state.people.pet_exists(pet_id).await?;
        validator.check(exists, Location::Params, "petId", Some(Value::String(raw_pet_id)), "pet does not exist");
    }
    let (id, pet_id) = validator.finish_with(id.zip(pet_id))?;

    state.people.add_pet(id, pet_id).await?;
    log::info!("Added pet {} to person {}", pet_id, id);

    Ok(HttpResponse::Ok().json(json!({
        "addedPetId": pet_id.to_hex(),
        "updatedPersonId": id.to_hex(),
    })))
}

pub async fn get_pets(
    state: web::Data<AppState>,
    path: web::Path<String>
) -> Result<HttpResponse, ApiError> {
    let id = id_param(&path.into_inner())?;

    let people = state.people.get_pets(id).await?;
    let people: Vec<PersonSend> = people.iter().map(|p| p.to_send()).collect();
    Ok(HttpResponse::Ok().json(people))
}

pub async fn get_car(
    state: web::Data<AppState>,
    path: web::Path<String>
) -> Result<HttpResponse, ApiError> {
    let id = id_param(&path.into_inner())?;

    let people = state.people.get_car(id).await?;
    let people: Vec<PersonSend> = people.iter().map(|p| p.to_send()).collect();
    Ok(HttpResponse::Ok().json(people))
}

pub async fn set_car(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>
) -> Result<HttpResponse, ApiError> {
    let (raw_id, raw_car_id) = path.into_inner();
    let mut validator = Validator::new();

    let id = validator.object_id(Location::Params, "id", &raw_id);
    let car_id = validator.object_id(Location::Params, "carId", &raw_car_id);

    if let Some(id) = id {
        let exists = state.people.person_exists(id).await?;
        validator.check(exists, Location::Params, "id", Some(Value::String(raw_id)), "person does not exist");
    }
    if let Some(car_id) = car_id {
        let exists = state.people.car_exists(car_id).await?;
        validator.check(exists, Location::Params, "carId", Some(Value::String(raw_car_id)), "car does not exist");
    }
    let (id, car_id) = validator.finish_with(id.zip(car_id))?;

    state.people.set_car(id, car_id).await?;
    log::info!("Attached car {} to person {}", car_id, id);

    Ok(HttpResponse::Ok().json(json!({
        "updatedPersonId": id.to_hex(),
        "newCarId": car_id.to_hex(),
    })))
}
