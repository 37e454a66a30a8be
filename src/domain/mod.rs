pub mod person;

pub use person::model::Person;
pub use person::repository::PersonRepository;
