use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::CatalogStore;
use crate::error::AppError;
use crate::generation::{GenerationClient, extract, validate};
use crate::models::{Course, CourseDraft};
use crate::services::preview::PreviewStage;

/// One candidate that failed persistent creation during a commit sweep.
#[derive(Debug, Serialize)]
pub struct CommitFailure {
    pub index: usize,
    pub name: String,
    pub error: String,
}

/// Result of a commit sweep: what landed in the catalog and what did not.
#[derive(Debug, Serialize)]
pub struct CommitOutcome {
    pub committed: Vec<Course>,
    pub failures: Vec<CommitFailure>,
}

/// Drives the generate → preview → commit workflow. Owns the in-memory
/// catalog view and the preview stage; talks to the store and the generation
/// provider through their trait seams.
pub struct CourseWorkflow {
    store: Arc<dyn CatalogStore>,
    generator: Arc<dyn GenerationClient>,
    catalog: Vec<Course>,
    preview: PreviewStage,
}

impl CourseWorkflow {
    /// Builds the workflow and seeds the catalog view from the store.
    pub async fn new(
        store: Arc<dyn CatalogStore>,
        generator: Arc<dyn GenerationClient>,
    ) -> Result<Self, AppError> {
        let catalog = store.list().await?;
        info!("loaded {} courses from catalog store", catalog.len());
        Ok(Self {
            store,
            generator,
            catalog,
            preview: PreviewStage::new(),
        })
    }

    pub fn catalog(&self) -> &[Course] {
        &self.catalog
    }

    pub fn preview(&self) -> &[CourseDraft] {
        self.preview.current()
    }

    /// Direct add from the course form: create at the store, mirror the
    /// store-assigned record into the catalog view.
    pub async fn add_course(&mut self, draft: CourseDraft) -> Result<Course, AppError> {
        let course = self.store.create(draft).await?;
        self.catalog.push(course.clone());
        Ok(course)
    }

    /// Run one generation attempt and stage the validated batch.
    ///
    /// On any failure the previous preview batch is left untouched; the
    /// error bubbles up verbatim with its raw diagnostic payload.
    pub async fn generate_preview(&mut self, prompt: &str) -> Result<&[CourseDraft], AppError> {
        let envelope = self.generator.generate(prompt).await?;

        let candidates = match &envelope {
            // Some envelopes carry the array directly rather than as text.
            Value::Array(_) => validate::candidates_from_value(&envelope)?,
            _ => {
                let text = extract::payload_text(&envelope)?;
                validate::candidates_from_text(&text)?
            }
        };

        info!("staged {} generated course candidates", candidates.len());
        self.preview.replace(candidates);
        Ok(self.preview.current())
    }

    /// Persist every staged candidate, in preview order, one request at a
    /// time. A failing candidate is reported and the sweep continues; the
    /// preview is cleared exactly once after the sweep, regardless of how
    /// many creations failed.
    pub async fn commit_preview(&mut self) -> Result<CommitOutcome, AppError> {
        let drafts: Vec<CourseDraft> = self.preview.current().to_vec();
        let mut committed = Vec::new();
        let mut failures = Vec::new();

        for (index, draft) in drafts.into_iter().enumerate() {
            let name = draft.name.clone();
            match self.store.create(draft).await {
                Ok(course) => {
                    self.catalog.push(course.clone());
                    committed.push(course);
                }
                Err(e) => {
                    warn!("failed to commit candidate {} ({}): {}", index, name, e);
                    failures.push(CommitFailure {
                        index,
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }

        self.preview.clear();
        info!(
            "commit sweep finished: {} committed, {} failed",
            committed.len(),
            failures.len()
        );

        Ok(CommitOutcome { committed, failures })
    }

    /// Drop the staged batch without persisting anything.
    pub fn discard_preview(&mut self) {
        self.preview.clear();
    }
}
