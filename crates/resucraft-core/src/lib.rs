// SPDX-License-Identifier: AGPL-3.0
// ResuCraft Core - Shared client logic for all frontends
//
// This crate provides:
// - Domain types and the AppError taxonomy
// - ClientStore for persisted, observable client state
// - RemoteGateway as the single chokepoint to the backing service
// - CredentialStorage for durable bearer tokens
// - sync flows that apply gateway results to the store
//
// Frontend-specific code lives in separate crates.

pub mod credentials;
pub mod gateway;
pub mod store;
pub mod sync;
pub mod types;

// Re-export commonly used items
pub use credentials::{CredentialStorage, FileCredentialStore, MemoryCredentialStore};
pub use gateway::{RemoteGateway, DEFAULT_BASE_URL};
pub use store::{ClientStore, StoreChange};
pub use types::{
    AppError, ApplicationStatus, ApplicationUpdate, AtsReport, Certification, Education,
    Experience, InterviewFeedback, InterviewQuestion, InterviewSession, InterviewStart,
    JobApplication, JobListing, LoginResponse, PersonalInfo, Project, QuantifiedImpact, Resume,
    ResumeContent, ResumeUpdate, SubscriptionTier, UiState, User,
};
