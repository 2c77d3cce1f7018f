// SPDX-License-Identifier: AGPL-3.0
// ResuCraft Core - Type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription tier attached to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Professional,
    Executive,
}

impl Default for SubscriptionTier {
    fn default() -> Self {
        Self::Free
    }
}

/// Authenticated user profile, issued by the service at login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub subscription: SubscriptionTier,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    pub school: String,
    pub graduation_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
}

/// Structured body of a resume, edited section by section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeContent {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
}

/// A stored resume. At most one resume is designated active at a time;
/// that designation lives in the store, not on the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: String,
    pub title: String,
    pub template: String,
    pub content: ResumeContent,
    /// ATS compatibility score, 0-100
    pub ats_score: u8,
    pub last_modified: DateTime<Utc>,
    pub is_public: bool,
}

/// Lifecycle of a job application. Transitions are not validated;
/// any status may be set through a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    Interview,
    Offer,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: String,
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    /// Match score against the user's profile, 0-100
    pub match_score: u8,
}

/// Record of a completed mock interview. Append-only: never mutated
/// after it enters the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub id: String,
    pub job_title: String,
    /// Total session length in seconds
    pub duration: u64,
    pub score: u8,
    pub feedback: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// Partial update for a stored resume. `None` fields are left
/// untouched by the merge. Doubles as the PUT body for the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ResumeContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ats_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

/// Partial update for a job application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u8>,
}

/// Frontend chrome flags. Sidebar visibility is ephemeral and never
/// persisted; dark mode is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub dark_mode: bool,
    pub sidebar_open: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            dark_mode: false,
            sidebar_open: true,
        }
    }
}

/// Successful credential exchange: the bearer token plus the profile
/// it authenticates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// A job listing returned by search or recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub posted: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub match_score: u8,
}

/// Result of an ATS compatibility analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsReport {
    pub score: u8,
    pub suggestions: Vec<String>,
}

/// Result of rewriting an experience entry with measurable impact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantifiedImpact {
    pub quantified_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    pub question: String,
}

/// Response to starting an interview session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewStart {
    pub session_id: String,
    pub questions: Vec<InterviewQuestion>,
}

/// Aggregate feedback for a finished interview session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFeedback {
    pub overall_score: u8,
    pub suggestions: Vec<String>,
}

/// Error types for the client core
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned status {status}")]
    Http { status: u16 },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileIo(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&ApplicationStatus::Interview).unwrap();
        assert_eq!(json, "\"interview\"");

        let status: ApplicationStatus = serde_json::from_str("\"offer\"").unwrap();
        assert_eq!(status, ApplicationStatus::Offer);
    }

    #[test]
    fn test_user_tolerates_missing_optional_fields() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","name":"Ada","email":"ada@example.com","subscription":"professional"}"#,
        )
        .unwrap();
        assert_eq!(user.subscription, SubscriptionTier::Professional);
        assert!(user.avatar.is_none());
    }

    #[test]
    fn test_resume_round_trips_camel_case() {
        let resume = Resume {
            id: "r1".to_string(),
            title: "Backend Engineer".to_string(),
            template: "modern".to_string(),
            content: ResumeContent::default(),
            ats_score: 72,
            last_modified: Utc::now(),
            is_public: false,
        };

        let json = serde_json::to_string(&resume).unwrap();
        assert!(json.contains("\"atsScore\":72"));
        assert!(json.contains("\"lastModified\""));
        assert!(json.contains("\"personalInfo\""));

        let back: Resume = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resume);
    }

    #[test]
    fn test_listing_type_field_name() {
        let listing: JobListing = serde_json::from_str(
            r#"{"id":"1","title":"Senior Software Engineer","company":"Google",
                "location":"Mountain View, CA","salary":"$150,000 - $200,000",
                "type":"Full-time","posted":"2 days ago","matchScore":95}"#,
        )
        .unwrap();
        assert_eq!(listing.job_type, "Full-time");
        assert!(listing.requirements.is_empty());
    }
}
