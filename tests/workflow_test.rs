use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use coursegen::catalog::{CatalogStore, InMemoryCatalog};
use coursegen::error::AppError;
use coursegen::generation::GenerationClient;
use coursegen::models::{Course, CourseDraft};
use coursegen::services::CourseWorkflow;

/// Generation client that replays scripted envelopes in order, then repeats
/// the last one.
struct ScriptedGeneration {
    envelopes: std::sync::Mutex<Vec<Value>>,
}

impl ScriptedGeneration {
    fn replaying(envelope: Value) -> Self {
        Self::sequence(vec![envelope])
    }

    fn sequence(envelopes: Vec<Value>) -> Self {
        Self {
            envelopes: std::sync::Mutex::new(envelopes),
        }
    }
}

#[async_trait]
impl GenerationClient for ScriptedGeneration {
    async fn generate(&self, _prompt: &str) -> Result<Value, AppError> {
        let mut envelopes = self.envelopes.lock().expect("script lock");
        let next = if envelopes.len() > 1 {
            envelopes.remove(0)
        } else {
            envelopes[0].clone()
        };
        Ok(next)
    }
}

/// Store that assigns incrementing ids but refuses configured names.
struct FlakyStore {
    next_id: AtomicU64,
    reject: Vec<&'static str>,
}

impl FlakyStore {
    fn new(first_id: u64, reject: Vec<&'static str>) -> Self {
        Self {
            next_id: AtomicU64::new(first_id),
            reject,
        }
    }
}

#[async_trait]
impl CatalogStore for FlakyStore {
    async fn list(&self) -> Result<Vec<Course>, AppError> {
        Ok(Vec::new())
    }

    async fn create(&self, draft: CourseDraft) -> Result<Course, AppError> {
        if self.reject.iter().any(|n| *n == draft.name) {
            return Err(AppError::Conflict(format!("store rejected '{}'", draft.name)));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(Course {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            in_stock: draft.in_stock,
        })
    }
}

fn chat_envelope(text: &str) -> Value {
    json!({ "choices": [{ "message": { "content": text } }] })
}

async fn workflow_with(
    store: Arc<dyn CatalogStore>,
    envelope: Value,
) -> CourseWorkflow {
    let generator = Arc::new(ScriptedGeneration::replaying(envelope));
    CourseWorkflow::new(store, generator)
        .await
        .expect("workflow should initialize")
}

#[tokio::test]
async fn generate_stages_validated_candidates() {
    let store = Arc::new(InMemoryCatalog::with_sample_courses());
    let envelope = chat_envelope(
        r#"[{"name":"Go Basics","description":"Intro","price":19.99,"inStock":true},
            {"name":"Rust 101","description":"Ownership","price":29.99,"inStock":false}]"#,
    );
    let mut workflow = workflow_with(store, envelope).await;

    let batch = workflow.generate_preview("two courses").await.expect("generation should stage");
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].name, "Go Basics");
    assert_eq!(batch[1].name, "Rust 101");

    // Catalog view untouched by staging.
    assert_eq!(workflow.catalog().len(), 3);
}

#[tokio::test]
async fn failed_generation_keeps_prior_preview() {
    let store = Arc::new(InMemoryCatalog::new(Vec::new()));
    let generator = Arc::new(ScriptedGeneration::sequence(vec![
        chat_envelope(r#"[{"name":"Keep Me","description":"","price":1,"inStock":true}]"#),
        chat_envelope("not an array"),
    ]));
    let mut workflow = CourseWorkflow::new(store, generator)
        .await
        .expect("workflow should initialize");

    workflow.generate_preview("").await.expect("first generation should stage");
    assert_eq!(workflow.preview().len(), 1);

    // Second attempt returns garbage: the attempt fails, the staged batch
    // from the first attempt survives.
    let err = workflow.generate_preview("").await.expect_err("garbage must fail");
    assert!(matches!(err, AppError::MalformedOutput { .. }));
    assert_eq!(workflow.preview().len(), 1);
    assert_eq!(workflow.preview()[0].name, "Keep Me");
}

#[tokio::test]
async fn error_envelope_surfaces_raw_payload_and_preserves_preview() {
    let store = Arc::new(InMemoryCatalog::new(Vec::new()));
    let mut workflow = workflow_with(store, json!({ "error": "rate limited" })).await;

    let err = workflow.generate_preview("anything").await.expect_err("error envelope must fail");
    match err {
        AppError::Generation { raw } => assert_eq!(raw["error"], "rate limited"),
        other => panic!("expected Generation failure, got {:?}", other),
    }
    assert!(workflow.preview().is_empty());
    assert!(workflow.catalog().is_empty());
}

#[tokio::test]
async fn structured_array_envelope_skips_text_extraction() {
    let store = Arc::new(InMemoryCatalog::new(Vec::new()));
    let envelope = json!([
        {"name":"Direct","description":"array envelope","price":12.5,"inStock":true}
    ]);
    let mut workflow = workflow_with(store, envelope).await;

    let batch = workflow.generate_preview("").await.expect("array envelope should stage");
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].name, "Direct");
}

#[tokio::test]
async fn commit_sweep_persists_successes_and_reports_failures() {
    let store = Arc::new(FlakyStore::new(100, vec!["Rejected Course"]));
    let envelope = chat_envelope(
        r#"[{"name":"First","description":"","price":10,"inStock":true},
            {"name":"Rejected Course","description":"","price":20,"inStock":true},
            {"name":"Third","description":"","price":30,"inStock":false}]"#,
    );
    let mut workflow = workflow_with(store, envelope).await;
    workflow.generate_preview("").await.expect("generation should stage");

    let outcome = workflow.commit_preview().await.expect("sweep should complete");

    // 3 candidates, 2 created, 1 reported failure; sweep did not abort.
    assert_eq!(outcome.committed.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].index, 1);
    assert_eq!(outcome.failures[0].name, "Rejected Course");
    assert!(outcome.failures[0].error.contains("Rejected Course"));

    // Store-assigned ids, in preview order.
    assert_eq!(outcome.committed[0].id, 100);
    assert_eq!(outcome.committed[0].name, "First");
    assert_eq!(outcome.committed[1].id, 101);
    assert_eq!(outcome.committed[1].name, "Third");

    // Catalog view gained exactly the successes; preview cleared once.
    assert_eq!(workflow.catalog().len(), 2);
    assert!(workflow.preview().is_empty());
}

#[tokio::test]
async fn commit_discards_client_supplied_identity() {
    let store = Arc::new(FlakyStore::new(42, Vec::new()));
    // The model invents an id; it must never survive to the catalog.
    let envelope = chat_envelope(
        r#"[{"id":999,"name":"Go Basics","description":"Intro","price":19.99,"inStock":true}]"#,
    );
    let mut workflow = workflow_with(store, envelope).await;
    workflow.generate_preview("").await.expect("generation should stage");

    let outcome = workflow.commit_preview().await.expect("sweep should complete");
    assert_eq!(outcome.committed.len(), 1);
    assert_eq!(outcome.committed[0].id, 42, "id comes from the store, not the model");
    assert_eq!(outcome.committed[0].name, "Go Basics");
    assert!(workflow.preview().is_empty());
}

#[tokio::test]
async fn commit_of_empty_preview_is_a_noop() {
    let store = Arc::new(InMemoryCatalog::new(Vec::new()));
    let mut workflow = workflow_with(store, json!({})).await;

    let outcome = workflow.commit_preview().await.expect("sweep should complete");
    assert!(outcome.committed.is_empty());
    assert!(outcome.failures.is_empty());
    assert!(workflow.catalog().is_empty());
}

#[tokio::test]
async fn discard_drops_preview_without_touching_catalog() {
    let store = Arc::new(InMemoryCatalog::with_sample_courses());
    let envelope = chat_envelope(r#"[{"name":"Ephemeral","description":"","price":1,"inStock":true}]"#);
    let mut workflow = workflow_with(store, envelope).await;
    workflow.generate_preview("").await.expect("generation should stage");
    assert_eq!(workflow.preview().len(), 1);

    workflow.discard_preview();
    assert!(workflow.preview().is_empty());
    assert_eq!(workflow.catalog().len(), 3);
}

#[tokio::test]
async fn direct_add_mirrors_store_record_into_catalog() {
    let store = Arc::new(InMemoryCatalog::with_sample_courses());
    let mut workflow = workflow_with(store, json!({})).await;

    let course = workflow
        .add_course(CourseDraft {
            name: "Manual Entry".to_string(),
            description: "added through the form".to_string(),
            price: 15.0,
            in_stock: true,
        })
        .await
        .expect("create should succeed");

    assert_eq!(course.id, 4, "in-memory store assigns max + 1");
    assert_eq!(workflow.catalog().len(), 4);
    assert_eq!(workflow.catalog().last().map(|c| c.id), Some(4));
}
