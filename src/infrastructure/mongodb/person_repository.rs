use async_trait::async_trait;
use futures::StreamExt;
use mongodb::bson::{doc, from_document, oid::ObjectId, Document};
use mongodb::{Collection, Cursor};
use serde::de::DeserializeOwned;

use crate::domain::person::model::{AgeAverage, NewPerson, Person, PersonChanges, PersonWithCar, PersonWithPets};
use crate::domain::person::repository::PersonRepository;
use crate::infrastructure::database::mongo_context::MongoContext;
use crate::utils::errors::ApiError;

pub const PEOPLE: &str = "people";
pub const PETS: &str = "pets";
pub const CARS: &str = "cars";

pub struct MongoPersonRepository {
    people: Collection<Person>,
    pets: Collection<Document>,
    cars: Collection<Document>,
}

impl MongoPersonRepository {
    pub fn new(context: &MongoContext) -> Self {
        Self {
            people: context.collection(PEOPLE),
            pets: context.collection(PETS),
            cars: context.collection(CARS),
        }
    }

    async fn aggregate<T>(&self, pipeline: Vec<Document>) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let mut cursor = self.people.aggregate(pipeline).await?;
        let mut results = Vec::new();

        while let Some(doc) = cursor.next().await {
            results.push(from_document::<T>(doc?)?);
        }
        Ok(results)
    }

    async fn exists<T>(collection: &Collection<T>, id: ObjectId) -> Result<bool, ApiError>
    where
        T: Send + Sync,
    {
        let count = collection
            .count_documents(doc! { "_id": id })
            .limit(1)
            .await?;
        Ok(count > 0)
    }
}

async fn drain(mut cursor: Cursor<Person>) -> Result<Vec<Person>, ApiError> {
    let mut people = Vec::new();

    while let Some(person) = cursor.next().await {
        match person {
            Ok(person) => people.push(person),
            Err(e) => return Err(ApiError::MongoError(e)),
        }
    }
    Ok(people)
}

/// `$set` of the provided fields plus `updatedAt`; absent fields are left alone.
pub fn update_document(changes: PersonChanges) -> Document {
    let mut fields = doc! { "updatedAt": changes.updated_at };
    if let Some(name) = changes.name {
        fields.insert("name", name);
    }
    if let Some(lastname) = changes.lastname {
        fields.insert("lastname", lastname);
    }
    if let Some(age) = changes.age {
        fields.insert("age", age);
    }
    doc! { "$set": fields }
}

pub fn average_age_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "average", "average": { "$avg": "$age" } } },
    ]
}

pub fn pets_pipeline(id: ObjectId) -> Vec<Document> {
    vec![
        doc! { "$match": { "_id": id } },
        doc! { "$lookup": {
            "from": PETS,
            "localField": "petIds",
            "foreignField": "_id",
            "as": "pets",
        } },
        doc! { "$unset": "petIds" },
    ]
}

pub fn car_pipeline(id: ObjectId) -> Vec<Document> {
    vec![
        doc! { "$match": { "_id": id } },
        doc! { "$lookup": {
            "from": CARS,
            "localField": "carId",
            "foreignField": "_id",
            "as": "car",
        } },
        doc! { "$unwind": { "path": "$car", "preserveNullAndEmptyArrays": true } },
        doc! { "$unset": "carId" },
    ]
}

#[async_trait]
impl PersonRepository for MongoPersonRepository {

    async fn get_all_people(&self) -> Result<Vec<Person>, ApiError> {
        let cursor = self.people.find(doc! {}).await?;
        drain(cursor).await
    }

    async fn create_person(&self, person: NewPerson) -> Result<Person, ApiError> {
        let mut person = Person::new(person);
        let result = self.people.insert_one(&person).await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            ApiError::InternalServerError(format!("Unexpected inserted id: {}", result.inserted_id))
        })?;
        person.id = Some(id);
        Ok(person)
    }

    async fn delete_person(&self, id: ObjectId) -> Result<(), ApiError> {
        let result = self.people.delete_one(doc! { "_id": id }).await?;
        log::debug!("Deleted {} document(s) for person {}", result.deleted_count, id);
        Ok(())
    }

    async fn update_person(&self, id: ObjectId, changes: PersonChanges) -> Result<(), ApiError> {
        self.people
            .update_one(doc! { "_id": id }, update_document(changes))
            .await?;
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Person>, ApiError> {
        let cursor = self.people.find(doc! { "name": name }).await?;
        drain(cursor).await
    }

    async fn find_by_age(&self, age: f64) -> Result<Vec<Person>, ApiError> {
        let cursor = self.people.find(doc! { "age": age }).await?;
        drain(cursor).await
    }

    async fn average_age(&self) -> Result<Vec<AgeAverage>, ApiError> {
        self.aggregate(average_age_pipeline()).await
    }

    async fn add_pet(&self, id: ObjectId, pet_id: ObjectId) -> Result<(), ApiError> {
        self.people
            .update_one(doc! { "_id": id }, doc! { "$push": { "petIds": pet_id } })
            .await?;
        Ok(())
    }

    async fn get_pets(&self, id: ObjectId) -> Result<Vec<PersonWithPets>, ApiError> {
        self.aggregate(pets_pipeline(id)).await
    }

    async fn get_car(&self, id: ObjectId) -> Result<Vec<PersonWithCar>, ApiError> {
        self.aggregate(car_pipeline(id)).await
    }

    async fn set_car(&self, id: ObjectId, car_id: ObjectId) -> Result<(), ApiError> {
        self.people
            .update_one(doc! { "_id": id }, doc! { "$set": { "carId": car_id } })
            .await?;
        Ok(())
    }

    async fn person_exists(&self, id: ObjectId) -> Result<bool, ApiError> {
        Self::exists(&self.people, id).await
    }

    async fn pet_exists(&self, id: ObjectId) -> Result<bool, ApiError> {
        Self::exists(&self.pets, id).await
    }

    async fn car_exists(&self, id: ObjectId) -> Result<bool, ApiError> {
        Self::exists(&self.cars, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    fn set_keys(update: &Document) -> Vec<String> {
        let mut keys: Vec<String> = update.get_document("$set").unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_update_document_sets_only_provided_fields() {
        let now = DateTime::from_millis(1_000);
        let update = update_document(PersonChanges {
            name: None,
            lastname: Some(" Lee ".to_string()),
            age: Some(31.5),
            updated_at: now,
        });

        assert_eq!(update.keys().collect::<Vec<_>>(), vec!["$set"]);
        assert_eq!(set_keys(&update), vec!["age", "lastname", "updatedAt"]);
        let fields = update.get_document("$set").unwrap();
        assert_eq!(fields.get_str("lastname").unwrap(), " Lee ");
        assert_eq!(fields.get_f64("age").unwrap(), 31.5);
        assert_eq!(fields.get_datetime("updatedAt").unwrap(), &now);
    }

    #[test]
    fn test_empty_update_still_stamps_updated_at() {
        let update = update_document(PersonChanges {
            name: None,
            lastname: None,
            age: None,
            updated_at: DateTime::now(),
        });

        assert_eq!(set_keys(&update), vec!["updatedAt"]);
    }

    #[test]
    fn test_update_document_with_every_field() {
        let update = update_document(PersonChanges {
            name: Some("Ann".to_string()),
            lastname: Some("Lee".to_string()),
            age: Some(30.0),
            updated_at: DateTime::now(),
        });

        assert_eq!(set_keys(&update), vec!["age", "lastname", "name", "updatedAt"]);
    }

    #[test]
    fn test_pets_pipeline_is_scoped_and_drops_ids() {
        let id = ObjectId::new();
        let pipeline = pets_pipeline(id);

        assert_eq!(pipeline[0], doc! { "$match": { "_id": id } });
        let lookup = pipeline[1].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("from").unwrap(), "pets");
        assert_eq!(lookup.get_str("localField").unwrap(), "petIds");
        assert_eq!(lookup.get_str("as").unwrap(), "pets");
        assert_eq!(pipeline[2], doc! { "$unset": "petIds" });
    }

    #[test]
    fn test_car_pipeline_is_scoped_to_person() {
        let id = ObjectId::new();
        let pipeline = car_pipeline(id);

        assert_eq!(pipeline[0], doc! { "$match": { "_id": id } });
        let lookup = pipeline[1].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("from").unwrap(), "cars");
        assert_eq!(lookup.get_str("localField").unwrap(), "carId");
        let unwind = pipeline[2].get_document("$unwind").unwrap();
        assert_eq!(unwind.get_str("path").unwrap(), "$car");
        assert!(unwind.get_bool("preserveNullAndEmptyArrays").unwrap());
        assert_eq!(pipeline.last().unwrap(), &doc! { "$unset": "carId" });
    }

    #[test]
    fn test_average_pipeline_groups_everything() {
        let pipeline = average_age_pipeline();
        assert_eq!(pipeline.len(), 1);
        let group = pipeline[0].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "average");
        assert_eq!(group.get_document("average").unwrap(), &doc! { "$avg": "$age" });
    }
}
