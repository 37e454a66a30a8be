use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::domain::person::model::{AgeAverage, NewPerson, Person, PersonChanges, PersonWithCar, PersonWithPets};
use crate::utils::errors::ApiError;

/// Storage operations behind the person endpoints. `people` is the owning
/// collection; `pets` and `cars` are only read.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn get_all_people(&self) -> Result<Vec<Person>, ApiError>;
    async fn create_person(&self, person: NewPerson) -> Result<Person, ApiError>;
    /// Deleting an absent id is not an error.
    async fn delete_person(&self, id: ObjectId) -> Result<(), ApiError>;
    async fn update_person(&self, id: ObjectId, changes: PersonChanges) -> Result<(), ApiError>;
    async fn find_by_name(&self, name: &str) -> Result<Vec<Person>, ApiError>;
    async fn find_by_age(&self, age: f64) -> Result<Vec<Person>, ApiError>;
    /// Empty when there are no people.
    async fn average_age(&self) -> Result<Vec<AgeAverage>, ApiError>;
    /// Appends without checking for duplicates.
    async fn add_pet(&self, id: ObjectId, pet_id: ObjectId) -> Result<(), ApiError>;
    async fn get_pets(&self, id: ObjectId) -> Result<Vec<PersonWithPets>, ApiError>;
    async fn get_car(&self, id: ObjectId) -> Result<Vec<PersonWithCar>, ApiError>;
    async fn set_car(&self, id: ObjectId, car_id: ObjectId) -> Result<(), ApiError>;
    async fn person_exists(&self, id: ObjectId) -> Result<bool, ApiError>;
    async fn pet_exists(&self, id: ObjectId) -> Result<bool, ApiError>;
    async fn car_exists(&self, id: ObjectId) -> Result<bool, ApiError>;
}
