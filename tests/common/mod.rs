use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};

use people_service::api::state::AppState;
use people_service::domain::person::model::{AgeAverage, NewPerson, Person, PersonChanges, PersonWithCar, PersonWithPets};
use people_service::domain::person::repository::PersonRepository;
use people_service::utils::errors::ApiError;

pub const BASE: &str = "/people";

/// In-process stand-in for the `people`, `pets` and `cars` collections.
#[derive(Default)]
pub struct InMemoryPeople {
    pub people: Mutex<Vec<Person>>,
    pub pets: Mutex<Vec<Document>>,
    pub cars: Mutex<Vec<Document>>,
    pub fail: bool,
}

impl InMemoryPeople {
    pub fn failing() -> Self {
        InMemoryPeople { fail: true, ..Default::default() }
    }

    pub fn add_pet_document(&self, name: &str) -> ObjectId {
        let id = ObjectId::new();
        self.pets.lock().unwrap().push(doc! { "_id": id, "name": name });
        id
    }

    pub fn add_car_document(&self, model: &str) -> ObjectId {
        let id = ObjectId::new();
        self.cars.lock().unwrap().push(doc! { "_id": id, "model": model });
        id
    }

    pub fn person(&self, id: ObjectId) -> Option<Person> {
        self.people.lock().unwrap().iter().find(|p| p.id == Some(id)).cloned()
    }

    pub fn person_list(&self) -> Vec<Person> {
        self.people.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.people.lock().unwrap().len()
    }

    fn guard(&self) -> Result<(), ApiError> {
        if self.fail {
            Err(ApiError::MongoError(mongodb::error::Error::from(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "storage unavailable",
            ))))
        } else {
            Ok(())
        }
    }

    fn with_person<F>(&self, id: ObjectId, change: F)
    where
        F: FnOnce(&mut Person),
    {
        if let Some(person) = self.people.lock().unwrap().iter_mut().find(|p| p.id == Some(id)) {
            change(person);
        }
    }
}

#[async_trait]
impl PersonRepository for InMemoryPeople {
    async fn get_all_people(&self) -> Result<Vec<Person>, ApiError> {
        self.guard()?;
        Ok(self.people.lock().unwrap().clone())
    }

    async fn create_person(&self, person: NewPerson) -> Result<Person, ApiError> {
        self.guard()?;
        let mut person = Person::new(person);
        person.id = Some(ObjectId::new());
        self.people.lock().unwrap().push(person.clone());
        Ok(person)
    }

    async fn delete_person(&self, id: ObjectId) -> Result<(), ApiError> {
        self.guard()?;
        self.people.lock().unwrap().retain(|p| p.id != Some(id));
        Ok(())
    }

    async fn update_person(&self, id: ObjectId, changes: PersonChanges) -> Result<(), ApiError> {
        self.guard()?;
        self.with_person(id, |person| {
            if let Some(name) = changes.name {
                person.name = name;
            }
            if let Some(lastname) = changes.lastname {
                person.lastname = lastname;
            }
            if let Some(age) = changes.age {
                person.age = age;
            }
            person.updated_at = Some(changes.updated_at);
        });
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Person>, ApiError> {
        self.guard()?;
        Ok(self.people.lock().unwrap().iter().filter(|p| p.name == name).cloned().collect())
    }

    async fn find_by_age(&self, age: f64) -> Result<Vec<Person>, ApiError> {
        self.guard()?;
        Ok(self.people.lock().unwrap().iter().filter(|p| p.age == age).cloned().collect())
    }

    async fn average_age(&self) -> Result<Vec<AgeAverage>, ApiError> {
        self.guard()?;
        let people = self.people.lock().unwrap();
        if people.is_empty() {
            return Ok(Vec::new());
        }
        let total: f64 = people.iter().map(|p| p.age).sum();
        Ok(vec![AgeAverage { id: "average".to_string(), average: total / people.len() as f64 }])
    }

    async fn add_pet(&self, id: ObjectId, pet_id: ObjectId) -> Result<(), ApiError> {
        self.guard()?;
        self.with_person(id, |person| person.pet_ids.push(pet_id));
        Ok(())
    }

    async fn get_pets(&self, id: ObjectId) -> Result<Vec<PersonWithPets>, ApiError> {
        self.guard()?;
        let pets = self.pets.lock().unwrap();
        Ok(self.person(id).into_iter().map(|person| PersonWithPets {
            id,
            pets: pets
                .iter()
                .filter(|pet| pet.get_object_id("_id").map(|pid| person.pet_ids.contains(&pid)).unwrap_or(false))
                .cloned()
                .collect(),
            name: person.name,
            lastname: person.lastname,
            age: person.age,
            car_id: person.car_id,
            updated_at: person.updated_at,
        }).collect())
    }

    async fn get_car(&self, id: ObjectId) -> Result<Vec<PersonWithCar>, ApiError> {
        self.guard()?;
        let cars = self.cars.lock().unwrap();
        Ok(self.person(id).into_iter().map(|person| PersonWithCar {
            id,
            car: person.car_id.and_then(|car_id| {
                cars.iter().find(|car| car.get_object_id("_id").ok() == Some(car_id)).cloned()
            }),
            name: person.name,
            lastname: person.lastname,
            age: person.age,
            pet_ids: person.pet_ids,
            updated_at: person.updated_at,
        }).collect())
    }

    async fn set_car(&self, id: ObjectId, car_id: ObjectId) -> Result<(), ApiError> {
        self.guard()?;
        self.with_person(id, |person| person.car_id = Some(car_id));
        Ok(())
    }

    async fn person_exists(&self, id: ObjectId) -> Result<bool, ApiError> {
        self.guard()?;
        Ok(self.person(id).is_some())
    }

    async fn pet_exists(&self, id: ObjectId) -> Result<bool, ApiError> {
        self.guard()?;
        Ok(self.pets.lock().unwrap().iter().any(|pet| pet.get_object_id("_id").ok() == Some(id)))
    }

    async fn car_exists(&self, id: ObjectId) -> Result<bool, ApiError> {
        self.guard()?;
        Ok(self.cars.lock().unwrap().iter().any(|car| car.get_object_id("_id").ok() == Some(id)))
    }
}

pub fn state(store: Arc<InMemoryPeople>) -> web::Data<AppState> {
    web::Data::new(AppState::new(store))
}

/// Builds the person routes mounted under `BASE` on top of `store`.
macro_rules! init_app {
    ($store:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($crate::common::state($store.clone()))
                .service(actix_web::web::scope($crate::common::BASE).configure(people_service::routes::person_routes)),
        )
        .await
    };
}
