// SPDX-License-Identifier: AGPL-3.0
// ResuCraft Core - Gateway/store orchestration
//
// One function per user-facing flow: talk to the service first, apply
// the result to the store only on success. A failed call leaves the
// store exactly as it was; the error propagates to the caller.

use crate::gateway::RemoteGateway;
use crate::store::ClientStore;
use crate::types::{
    AppError, ApplicationStatus, AtsReport, InterviewFeedback, InterviewSession, JobApplication,
    JobListing, Resume, ResumeUpdate, User,
};
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

/// Exchange credentials and establish the local session
pub async fn sign_in(
    gateway: &RemoteGateway,
    store: &ClientStore,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let response = gateway.login(email, password).await?;

    store.set_user(Some(response.user.clone()))?;
    store.set_authenticated(true)?;

    tracing::info!("Signed in as {}", response.user.email);
    Ok(response.user)
}

/// Create an account. The service issues no token here; callers sign
/// in afterwards.
pub async fn register_account(gateway: &RemoteGateway, payload: &Value) -> Result<Value, AppError> {
    gateway.register(payload).await
}

/// Drop the credential and clear the local session
pub fn sign_out(gateway: &RemoteGateway, store: &ClientStore) -> Result<(), AppError> {
    gateway.logout()?;
    store.set_user(None)?;
    store.set_authenticated(false)?;

    tracing::info!("Signed out");
    Ok(())
}

/// Pull the resume collection from the service and replace the local
/// one. A dangling active pointer is cleared by the store.
pub async fn refresh_resumes(
    gateway: &RemoteGateway,
    store: &ClientStore,
) -> Result<Vec<Resume>, AppError> {
    let resumes = gateway.list_resumes().await?;
    store.replace_resumes(resumes.clone())?;
    Ok(resumes)
}

/// Persist a partial resume update on the service, then apply the same
/// update locally
pub async fn save_resume(
    gateway: &RemoteGateway,
    store: &ClientStore,
    id: &str,
    update: ResumeUpdate,
) -> Result<(), AppError> {
    gateway.update_resume(id, &update).await?;
    store.update_resume(id, update)
}

/// Delete a resume on the service, then locally
pub async fn remove_resume(
    gateway: &RemoteGateway,
    store: &ClientStore,
    id: &str,
) -> Result<(), AppError> {
    gateway.delete_resume(id).await?;
    store.delete_resume(id)
}

/// Run an ATS analysis over a resume and record the returned score.
/// The full report goes back to the caller for display.
pub async fn run_ats_scan(
    gateway: &RemoteGateway,
    store: &ClientStore,
    resume: &Resume,
    job_description: Option<&str>,
) -> Result<AtsReport, AppError> {
    let content = serde_json::to_string(&resume.content)
        .map_err(|e| AppError::Serialization(format!("Failed to serialize resume: {}", e)))?;

    let report = gateway.analyze_ats(&content, job_description).await?;

    store.update_resume(
        &resume.id,
        ResumeUpdate {
            ats_score: Some(report.score),
            ..ResumeUpdate::default()
        },
    )?;

    Ok(report)
}

/// Record an application for a listing. Local-only: the service learns
/// about applications through its own channels, so there is no network
/// call to fail.
pub fn apply_to_job(store: &ClientStore, listing: &JobListing) -> Result<JobApplication, AppError> {
    let application = JobApplication {
        id: Uuid::new_v4().to_string(),
        company: listing.company.clone(),
        position: listing.title.clone(),
        status: ApplicationStatus::Applied,
        applied_date: Utc::now(),
        match_score: listing.match_score,
    };

    store.add_application(application.clone())?;
    tracing::info!("Applied to {} at {}", listing.title, listing.company);
    Ok(application)
}

/// Fetch the feedback for a finished interview run and append the
/// completed session to the store
pub async fn complete_interview(
    gateway: &RemoteGateway,
    store: &ClientStore,
    session_id: &str,
    job_title: &str,
    duration_secs: u64,
) -> Result<InterviewFeedback, AppError> {
    let feedback = gateway.interview_feedback(session_id).await?;

    store.add_interview_session(InterviewSession {
        id: session_id.to_string(),
        job_title: job_title.to_string(),
        duration: duration_secs,
        score: feedback.overall_score,
        feedback: feedback.suggestions.clone(),
        completed_at: Utc::now(),
    })?;

    Ok(feedback)
}
