use serde::{Serialize, Deserialize};
use serde_json::Value;
use mongodb::bson::{oid::ObjectId, DateTime, Document};

use crate::utils::json::document_to_json;

pub const MIN_AGE: f64 = 1.0;
pub const MAX_AGE: f64 = 150.0;

/// A stored `people` document.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Person {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub lastname: String,
    pub age: f64,
    #[serde(rename = "petIds", default, skip_serializing_if = "Vec::is_empty")]
    pub pet_ids: Vec<ObjectId>,
    #[serde(rename = "carId", default, skip_serializing_if = "Option::is_none")]
    pub car_id: Option<ObjectId>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

/// Fields accepted on creation, already validated.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPerson {
    pub name: String,
    pub lastname: String,
    pub age: f64,
}

/// A partial update. `updated_at` is always written.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonChanges {
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub age: Option<f64>,
    pub updated_at: DateTime,
}

/// A person joined with its pets; `petIds` is dropped by the join.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersonWithPets {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub lastname: String,
    pub age: f64,
    #[serde(rename = "carId", default, skip_serializing_if = "Option::is_none")]
    pub car_id: Option<ObjectId>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
    #[serde(default)]
    pub pets: Vec<Document>,
}

/// A person joined with its car; `carId` is dropped by the join.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersonWithCar {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub lastname: String,
    pub age: f64,
    #[serde(rename = "petIds", default)]
    pub pet_ids: Vec<ObjectId>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
    #[serde(default)]
    pub car: Option<Document>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AgeAverage {
    #[serde(rename = "_id")]
    pub id: String,
    pub average: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PersonSend {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub lastname: String,
    pub age: f64,
    #[serde(rename = "petIds", skip_serializing_if = "Option::is_none")]
    pub pet_ids: Option<Vec<String>>,
    #[serde(rename = "carId", skip_serializing_if = "Option::is_none")]
    pub car_id: Option<String>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pets: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car: Option<Value>,
}

fn hex_ids(ids: &[ObjectId]) -> Vec<String> {
    ids.iter().map(|id| id.to_hex()).collect()
}

fn timestamp(date: Option<DateTime>) -> Option<String> {
    date.and_then(|d| d.try_to_rfc3339_string().ok())
}

impl Person {
    pub fn new(person: NewPerson) -> Self {
        Person {
            id: None,
            name: person.name,
            lastname: person.lastname,
            age: person.age,
            pet_ids: Vec::new(),
            car_id: None,
            updated_at: None,
        }
    }

    pub fn to_send(&self) -> PersonSend {
        PersonSend {
            id: self.id.map(|id| id.to_hex()),
            name: self.name.clone(),
            lastname: self.lastname.clone(),
            age: self.age,
            pet_ids: Some(hex_ids(&self.pet_ids)),
            car_id: self.car_id.map(|id| id.to_hex()),
            updated_at: timestamp(self.updated_at),
            pets: None,
            car: None,
        }
    }
}

impl PersonWithPets {
    pub fn to_send(&self) -> PersonSend {
        PersonSend {
            id: Some(self.id.to_hex()),
            name: self.name.clone(),
            lastname: self.lastname.clone(),
            age: self.age,
            pet_ids: None,
            car_id: self.car_id.map(|id| id.to_hex()),
            updated_at: timestamp(self.updated_at),
            pets: Some(self.pets.iter().cloned().map(document_to_json).collect()),
            car: None,
        }
    }
}

impl PersonWithCar {
    pub fn to_send(&self) -> PersonSend {
        PersonSend {
            id: Some(self.id.to_hex()),
            name: self.name.clone(),
            lastname: self.lastname.clone(),
            age: self.age,
            pet_ids: Some(hex_ids(&self.pet_ids)),
            car_id: None,
            updated_at: timestamp(self.updated_at),
            pets: None,
            car: Some(self.car.clone().map(document_to_json).unwrap_or(Value::Null)),
        }
    }
}
