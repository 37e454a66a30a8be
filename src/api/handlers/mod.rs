pub mod person_handlers;
