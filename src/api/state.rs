use std::sync::Arc;

use crate::domain::person::repository::PersonRepository;

#[derive(Clone)]
pub struct AppState {
    pub people: Arc<dyn PersonRepository>,
}

impl AppState {
    pub fn new(people: Arc<dyn PersonRepository>) -> Self {
        AppState { people }
    }
}
