use crate::models::CourseDraft;

/// Single-slot holder for the most recent validated candidate batch.
///
/// The batch is only ever swapped wholesale: `replace` after a successful
/// validation, `clear` after a commit sweep or an explicit discard. A failed
/// generation leaves the previous batch in place.
#[derive(Debug, Default)]
pub struct PreviewStage {
    batch: Vec<CourseDraft>,
}

impl PreviewStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, candidates: Vec<CourseDraft>) {
        self.batch = candidates;
    }

    pub fn clear(&mut self) {
        self.batch.clear();
    }

    pub fn current(&self) -> &[CourseDraft] {
        &self.batch
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }
}
