pub mod database;
pub mod mongodb;

pub use self::database::mongo_context;
pub use self::mongodb::person_repository;
