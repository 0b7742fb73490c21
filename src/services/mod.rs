pub mod preview;
pub mod workflow;

pub use preview::PreviewStage;
pub use workflow::{CommitFailure, CommitOutcome, CourseWorkflow};
