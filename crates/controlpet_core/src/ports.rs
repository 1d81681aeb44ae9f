//! crates/controlpet_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the client's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing
//! the engines to be independent of the concrete HTTP transport and of
//! where the token is persisted.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{AvaliacaoRelatorio, Entity, EntityId, Role};

//=========================================================================================
// Error Taxonomy
//=========================================================================================

/// Structured reason behind a 409 Conflict, recovered at the API boundary.
///
/// The backend does not ship error codes, only prose; the substring sniffing
/// that produces this value lives in exactly one adapter function so the
/// coupling to backend wording can be replaced wholesale later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// Dependent records exist (e.g. reports still linked to a student).
    HasDependents,
    Unknown,
}

/// Every failure a REST call can surface to the rest of the client.
///
/// No retries happen below this type; each variant reaches the caller
/// synchronously and the caller decides the treatment.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// 401: the session is invalid; the caller must clear it and redirect.
    #[error("sessão expirada ou inválida")]
    Unauthenticated,

    /// 403: authenticated but the role is insufficient.
    #[error("permissão insuficiente: {0}")]
    Forbidden(String),

    /// 404.
    #[error("registro não encontrado: {0}")]
    NotFound(String),

    /// 409, or a 5xx whose message carries dependency wording (known
    /// backend quirk: some dependency conflicts come back as 500).
    #[error("conflito: {message}")]
    Conflict {
        reason: ConflictReason,
        message: String,
    },

    /// 400/422 with a server-supplied message, surfaced verbatim in the
    /// originating form context.
    #[error("dados rejeitados: {0}")]
    ValidationRejected(String),

    /// No response received. Never clears the session.
    #[error("falha de rede: {0}")]
    Network(String),

    /// Any other 5xx.
    #[error("erro do servidor ({status}): {message}")]
    Server { status: u16, message: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures of the authentication flows specifically.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("e-mail ou senha inválidos")]
    InvalidCredentials,

    #[error("sessão expirada ou inválida")]
    Unauthenticated,

    #[error("falha de rede: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthenticated | ApiError::Forbidden(_) => AuthError::Unauthenticated,
            ApiError::Network(msg) => AuthError::Network(msg),
            other => AuthError::Other(other.to_string()),
        }
    }
}

//=========================================================================================
// Auth DTOs shared by the port and its adapters
//=========================================================================================

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub tipo: Role,
}

/// Returned by POST `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginOutcome {
    pub nome: String,
    pub tipo: Role,
    pub token: String,
}

/// Returned by GET `/auth/me`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: EntityId,
    pub nome: String,
    pub email: String,
    pub tipo_usuario: Role,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Authentication endpoints of the REST backend.
///
/// Implementations carry their own bearer token (injected, never read from
/// ambient global state), so callers never thread it through.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginOutcome>;

    async fn register(&self, request: &RegisterRequest) -> ApiResult<LoginOutcome>;

    /// Resolves the identity behind the current token.
    async fn me(&self) -> ApiResult<UserInfo>;

    async fn change_password(&self, current: &str, new: &str) -> ApiResult<()>;

    /// Privileged, advisor-only. The server assigns its documented default
    /// password; the client never generates or transmits one.
    async fn reset_password(&self, user_id: EntityId) -> ApiResult<()>;
}

/// CRUD access to one REST collection of entities.
#[async_trait]
pub trait CollectionApi<E: Entity>: Send + Sync {
    async fn fetch_all(&self) -> ApiResult<Vec<E>>;

    async fn fetch_one(&self, id: EntityId) -> ApiResult<E>;

    async fn create(&self, draft: &E::Draft) -> ApiResult<E>;

    async fn update(&self, id: EntityId, draft: &E::Draft) -> ApiResult<E>;

    async fn remove(&self, id: EntityId) -> ApiResult<()>;
}

/// Evaluation access beyond plain CRUD: lookup keyed by the evaluated
/// report, the relationship "evaluate" upserts over.
#[async_trait]
pub trait EvaluationApi: CollectionApi<AvaliacaoRelatorio> {
    /// `Ok(None)` when the report has no evaluation yet; the backend's 404
    /// on this route is not a failure.
    async fn fetch_by_relatorio(
        &self,
        relatorio_id: EntityId,
    ) -> ApiResult<Option<AvaliacaoRelatorio>>;
}

/// Durable storage for the session token, the only persisted state the
/// client keeps. Everything else about a `Session` is re-derived from
/// `/auth/me`.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;

    fn save(&self, token: &str) -> std::io::Result<()>;

    fn clear(&self) -> std::io::Result<()>;
}
