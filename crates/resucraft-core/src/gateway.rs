// SPDX-License-Identifier: AGPL-3.0
// ResuCraft Core - HTTP gateway to the ResuCraft service
//
// Single chokepoint for all outbound calls. Owns the base address and
// the bearer credential. Performs no retries, caching or request
// de-duplication; callers wanting resilience wrap the call.

use crate::credentials::CredentialStorage;
use crate::types::{
    AppError, AtsReport, InterviewFeedback, InterviewStart, JobListing, LoginResponse,
    QuantifiedImpact, Resume, ResumeUpdate,
};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Fallback service address when `RESUCRAFT_API_URL` is unset
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Gateway to the ResuCraft backend service
pub struct RemoteGateway {
    http_client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
    credentials: Arc<dyn CredentialStorage>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AtsAnalysisRequest<'a> {
    resume_content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_description: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImpactRequest<'a> {
    job_description: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToneRequest<'a> {
    content: &'a str,
    target_tone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_info: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    filters: &'a Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InterviewStartRequest<'a> {
    job_title: &'a str,
    difficulty: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerRequest<'a> {
    session_id: &'a str,
    question: &'a str,
    answer: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SkillGapRequest<'a> {
    user_profile: &'a Value,
    target_role: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CareerPathRequest<'a> {
    current_role: &'a str,
    target_role: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SalaryRequest<'a> {
    role: &'a str,
    location: &'a str,
    experience: u32,
}

impl RemoteGateway {
    /// Create a gateway against the given base address, loading any
    /// previously persisted credential
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialStorage>) -> Self {
        let token = credentials.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load stored credential: {}", e);
            None
        });

        let http_client = Client::builder()
            .read_timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            http_client,
            base_url,
            token: RwLock::new(token),
            credentials,
        }
    }

    /// Create a gateway using `RESUCRAFT_API_URL` or the built-in
    /// default address
    pub fn from_env(credentials: Arc<dyn CredentialStorage>) -> Self {
        let base_url =
            std::env::var("RESUCRAFT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a bearer credential is currently held
    pub fn has_credential(&self) -> bool {
        self.token.read().unwrap().is_some()
    }

    /// Generic request primitive used by every endpoint wrapper.
    /// Attaches the JSON content type and, when a credential is held,
    /// a bearer authorization header.
    pub async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.dispatch(method, path, body).await?;

        response
            .json()
            .await
            .map_err(|e| AppError::Decode(format!("Failed to parse response: {}", e)))
    }

    /// Like `send`, for endpoints whose response body carries no value
    async fn send_expecting_no_body<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), AppError>
    where
        B: Serialize + ?Sized,
    {
        self.dispatch(method, path, body).await.map(|_| ())
    }

    /// Perform the round-trip and normalize transport and status
    /// failures into typed errors
    async fn dispatch<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, AppError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http_client
            .request(method, &url)
            .header("Content-Type", "application/json");

        if let Some(token) = self.token.read().unwrap().as_deref() {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                AppError::Network(format!("Cannot connect to {}: {}", url, e))
            } else if e.is_timeout() {
                AppError::Network(format!("Request to {} timed out", url))
            } else {
                AppError::Network(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned status {}", url, status);
            return Err(AppError::Http {
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    // --- Authentication ---

    /// Exchange credentials for a bearer token. On success the token
    /// is held in memory and written to durable storage.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let body = LoginRequest { email, password };

        let response: LoginResponse = self
            .send(Method::POST, "/auth/login", Some(&body))
            .await
            .map_err(|e| match e {
                AppError::Http { status } => {
                    AppError::Auth(format!("login rejected with status {}", status))
                }
                other => other,
            })?;

        self.remember_token(&response.token);
        Ok(response)
    }

    /// Create an account. The service does not issue a token here;
    /// callers log in afterwards.
    pub async fn register(&self, payload: &Value) -> Result<Value, AppError> {
        self.send(Method::POST, "/auth/register", Some(payload))
            .await
            .map_err(|e| match e {
                AppError::Http { status } => {
                    AppError::Auth(format!("registration rejected with status {}", status))
                }
                other => other,
            })
    }

    /// Drop the in-memory and durable credential. No network call.
    pub fn logout(&self) -> Result<(), AppError> {
        *self.token.write().unwrap() = None;
        self.credentials.clear()
    }

    fn remember_token(&self, token: &str) {
        *self.token.write().unwrap() = Some(token.to_string());
        if let Err(e) = self.credentials.store(token) {
            // The session still works; it just won't survive a restart
            tracing::warn!("Failed to persist credential: {}", e);
        }
    }

    // --- Resumes ---

    pub async fn list_resumes(&self) -> Result<Vec<Resume>, AppError> {
        self.send(Method::GET, "/resumes", None::<&()>).await
    }

    pub async fn create_resume(&self, resume: &Resume) -> Result<Resume, AppError> {
        self.send(Method::POST, "/resumes", Some(resume)).await
    }

    pub async fn update_resume(&self, id: &str, update: &ResumeUpdate) -> Result<Resume, AppError> {
        self.send(Method::PUT, &format!("/resumes/{}", id), Some(update))
            .await
    }

    pub async fn delete_resume(&self, id: &str) -> Result<(), AppError> {
        self.send_expecting_no_body(Method::DELETE, &format!("/resumes/{}", id), None::<&()>)
            .await
    }

    // --- AI analysis (results are opaque to this core) ---

    pub async fn analyze_ats(
        &self,
        resume_content: &str,
        job_description: Option<&str>,
    ) -> Result<AtsReport, AppError> {
        let body = AtsAnalysisRequest {
            resume_content,
            job_description,
        };
        self.send(Method::POST, "/ai/ats-analysis", Some(&body)).await
    }

    pub async fn quantify_impact(
        &self,
        job_description: &str,
    ) -> Result<QuantifiedImpact, AppError> {
        let body = ImpactRequest { job_description };
        self.send(Method::POST, "/ai/impact-quantifier", Some(&body))
            .await
    }

    pub async fn adjust_tone(
        &self,
        content: &str,
        target_tone: &str,
        company_info: Option<&str>,
    ) -> Result<Value, AppError> {
        let body = ToneRequest {
            content,
            target_tone,
            company_info,
        };
        self.send(Method::POST, "/ai/tone-adjuster", Some(&body)).await
    }

    // --- Jobs ---

    pub async fn job_recommendations(&self, profile: &Value) -> Result<Vec<JobListing>, AppError> {
        self.send(Method::POST, "/jobs/recommendations", Some(profile))
            .await
    }

    pub async fn search_jobs(
        &self,
        query: &str,
        filters: &Value,
    ) -> Result<Vec<JobListing>, AppError> {
        let body = SearchRequest { query, filters };
        self.send(Method::POST, "/jobs/search", Some(&body)).await
    }

    // --- Interview training ---

    pub async fn start_interview(
        &self,
        job_title: &str,
        difficulty: &str,
    ) -> Result<InterviewStart, AppError> {
        let body = InterviewStartRequest {
            job_title,
            difficulty,
        };
        self.send(Method::POST, "/interview/start", Some(&body)).await
    }

    pub async fn submit_interview_answer(
        &self,
        session_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<Value, AppError> {
        let body = AnswerRequest {
            session_id,
            question,
            answer,
        };
        self.send(Method::POST, "/interview/answer", Some(&body)).await
    }

    pub async fn interview_feedback(
        &self,
        session_id: &str,
    ) -> Result<InterviewFeedback, AppError> {
        self.send(
            Method::GET,
            &format!("/interview/feedback/{}", session_id),
            None::<&()>,
        )
        .await
    }

    // --- Career development ---

    pub async fn skill_gap_analysis(
        &self,
        user_profile: &Value,
        target_role: &str,
    ) -> Result<Value, AppError> {
        let body = SkillGapRequest {
            user_profile,
            target_role,
        };
        self.send(Method::POST, "/career/skill-gap", Some(&body)).await
    }

    pub async fn career_path(
        &self,
        current_role: &str,
        target_role: &str,
    ) -> Result<Value, AppError> {
        let body = CareerPathRequest {
            current_role,
            target_role,
        };
        self.send(Method::POST, "/career/path", Some(&body)).await
    }

    pub async fn salary_insights(
        &self,
        role: &str,
        location: &str,
        experience: u32,
    ) -> Result<Value, AppError> {
        let body = SalaryRequest {
            role,
            location,
            experience,
        };
        self.send(Method::POST, "/career/salary", Some(&body)).await
    }

    // --- Analytics ---

    pub async fn user_analytics(&self) -> Result<Value, AppError> {
        self.send(Method::GET, "/analytics/user", None::<&()>).await
    }

    pub async fn market_trends(&self, industry: &str) -> Result<Value, AppError> {
        self.send(
            Method::GET,
            &format!("/analytics/market-trends/{}", industry),
            None::<&()>,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn find_headers_end(raw: &[u8]) -> Option<usize> {
        raw.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
    }

    fn content_length(head: &str) -> usize {
        head.lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0)
    }

    /// Minimal one-response-fits-all HTTP stub. Captures raw requests
    /// for assertions.
    async fn stub_server(
        status: &'static str,
        body: &'static str,
    ) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let captured = requests.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };

                let mut raw = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    let Ok(n) = socket.read(&mut buf).await else {
                        break;
                    };
                    if n == 0 {
                        break;
                    }
                    raw.extend_from_slice(&buf[..n]);
                    if let Some(pos) = find_headers_end(&raw) {
                        let head = String::from_utf8_lossy(&raw[..pos]).to_string();
                        if raw.len() - pos >= content_length(&head) {
                            break;
                        }
                    }
                }

                captured
                    .lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&raw).to_string());

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        (format!("http://{}", addr), requests)
    }

    fn gateway(base_url: &str) -> RemoteGateway {
        RemoteGateway::new(base_url, Arc::new(MemoryCredentialStore::new()))
    }

    #[tokio::test]
    async fn test_send_decodes_success_body() {
        let (base_url, requests) = stub_server("200 OK", "[]").await;
        let gateway = gateway(&base_url);

        let resumes = gateway.list_resumes().await.unwrap();
        assert!(resumes.is_empty());

        let raw = requests.lock().unwrap();
        assert!(raw[0].starts_with("GET /resumes HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_non_success_status_maps_to_http_error() {
        let (base_url, _) = stub_server("500 Internal Server Error", "{}").await;
        let gateway = gateway(&base_url);

        let err = gateway.user_analytics().await.unwrap_err();
        assert!(matches!(err, AppError::Http { status: 500 }));
    }

    #[tokio::test]
    async fn test_invalid_json_maps_to_decode_error() {
        let (base_url, _) = stub_server("200 OK", "not json").await;
        let gateway = gateway(&base_url);

        let err = gateway.user_analytics().await.unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_maps_to_network_error() {
        // Bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = gateway(&format!("http://{}", addr));
        let err = gateway.user_analytics().await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
    }

    #[tokio::test]
    async fn test_login_rejection_maps_to_auth_error() {
        let (base_url, _) = stub_server("401 Unauthorized", "{}").await;
        let credentials = Arc::new(MemoryCredentialStore::new());
        let gateway = RemoteGateway::new(base_url.as_str(), credentials.clone());

        let err = gateway.login("a@b.com", "bad-pw").await.unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
        assert!(!gateway.has_credential());
        assert!(credentials.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_stores_token_and_attaches_bearer() {
        let (base_url, requests) = stub_server(
            "200 OK",
            r#"{"token":"t1","user":{"id":"u1","name":"Ada","email":"ada@example.com","subscription":"free"}}"#,
        )
        .await;
        let credentials = Arc::new(MemoryCredentialStore::new());
        let gateway = RemoteGateway::new(base_url.as_str(), credentials.clone());

        let response = gateway.login("ada@example.com", "pw").await.unwrap();
        assert_eq!(response.user.id, "u1");
        assert!(gateway.has_credential());
        assert_eq!(credentials.load().unwrap().as_deref(), Some("t1"));

        // The follow-up request carries the bearer header
        gateway.user_analytics().await.unwrap();
        let raw = requests.lock().unwrap();
        assert_eq!(raw.len(), 2);
        assert!(!raw[0].to_lowercase().contains("authorization"));
        assert!(raw[1].to_lowercase().contains("authorization: bearer t1"));
    }

    #[tokio::test]
    async fn test_request_body_uses_wire_field_names() {
        let (base_url, requests) = stub_server("200 OK", r#"{"score":70,"suggestions":[]}"#).await;
        let gateway = gateway(&base_url);

        gateway
            .analyze_ats("resume text", Some("job text"))
            .await
            .unwrap();

        let raw = requests.lock().unwrap();
        assert!(raw[0].contains("\"resumeContent\":\"resume text\""));
        assert!(raw[0].contains("\"jobDescription\":\"job text\""));
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_durable_token() {
        let credentials = Arc::new(MemoryCredentialStore::new());
        credentials.store("t1").unwrap();

        let gateway = RemoteGateway::new("http://localhost:9", credentials.clone());
        assert!(gateway.has_credential());

        gateway.logout().unwrap();
        assert!(!gateway.has_credential());
        assert!(credentials.load().unwrap().is_none());
    }

    #[test]
    fn test_from_env_falls_back_to_default() {
        if std::env::var("RESUCRAFT_API_URL").is_err() {
            let gateway = RemoteGateway::from_env(Arc::new(MemoryCredentialStore::new()));
            assert_eq!(gateway.base_url(), DEFAULT_BASE_URL);
        }
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let gateway = gateway("http://localhost:5000/api/");
        assert_eq!(gateway.base_url(), "http://localhost:5000/api");
    }
}
