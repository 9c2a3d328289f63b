#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod progress_store;
pub mod sessions;

pub use kana_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::{CatalogService, CharacterProgress};
pub use error::{AppServicesError, CatalogError, ProgressError, SessionError};
pub use progress_store::ProgressStore;
pub use sessions::{
    ActiveSession, Advance, AnswerOutcome, PracticeLoopService, PracticeSelector, Question,
    QuestionKind,
};
