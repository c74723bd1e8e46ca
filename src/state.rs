use std::sync::Arc;

use crate::database::repository::Repositories;
use crate::realtime::EventPublisher;

/// Shared application state: the persistence collaborators and the outbound
/// event publisher, both constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub publisher: Arc<dyn EventPublisher>,
}

impl AppState {
    pub fn new(repos: Repositories, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { repos, publisher }
    }
}
