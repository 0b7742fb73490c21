use std::sync::Arc;

use tokio::sync::Mutex;

use crate::services::CourseWorkflow;

/// One workflow step runs at a time; the mutex serializes generation and
/// commit against each other and against direct adds.
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<Mutex<CourseWorkflow>>,
}
