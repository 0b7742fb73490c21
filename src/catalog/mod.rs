use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Course, CourseDraft};

/// The persistent catalog service, at its interface boundary. `create` is the
/// only way a course acquires an id.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Course>, AppError>;
    async fn create(&self, draft: CourseDraft) -> Result<Course, AppError>;
}

/// Reference store: a seeded in-memory list. Ids are assigned as
/// `max(existing) + 1`.
pub struct InMemoryCatalog {
    courses: Mutex<Vec<Course>>,
}

impl InMemoryCatalog {
    pub fn new(seed: Vec<Course>) -> Self {
        Self {
            courses: Mutex::new(seed),
        }
    }

    pub fn with_sample_courses() -> Self {
        Self::new(vec![
            Course {
                id: 1,
                name: "Python for Beginners".to_string(),
                description: "Learn the basics of Python with practical exercises.".to_string(),
                price: 49.99,
                in_stock: true,
            },
            Course {
                id: 2,
                name: "Web Development with Flask".to_string(),
                description: "Build web applications using Python and Flask.".to_string(),
                price: 69.00,
                in_stock: true,
            },
            Course {
                id: 3,
                name: "JavaScript Fundamentals".to_string(),
                description: "Get started with JavaScript and develop interactive websites."
                    .to_string(),
                price: 39.99,
                in_stock: false,
            },
        ])
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list(&self) -> Result<Vec<Course>, AppError> {
        let courses = self
            .courses
            .lock()
            .map_err(|_| AppError::InternalServerError)?;
        Ok(courses.clone())
    }

    async fn create(&self, draft: CourseDraft) -> Result<Course, AppError> {
        if draft.name.trim().is_empty() {
            return Err(AppError::BadRequest("course name must not be empty".to_string()));
        }
        if draft.price < 0.0 {
            return Err(AppError::BadRequest("course price must not be negative".to_string()));
        }

        let mut courses = self
            .courses
            .lock()
            .map_err(|_| AppError::InternalServerError)?;
        let id = courses.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let course = Course {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            in_stock: draft.in_stock,
        };
        courses.push(course.clone());
        Ok(course)
    }
}
