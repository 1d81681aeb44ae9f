//! services/client/src/adapters/rest.rs
//!
//! The HTTP adapter: concrete implementation of the `AuthApi`,
//! `CollectionApi` and `EvaluationApi` ports against the Control PET REST
//! backend, using `reqwest`. All status-code-to-taxonomy mapping and all
//! coupling to backend error wording lives here and nowhere else.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use controlpet_core::domain::{AvaliacaoRelatorio, Entity, EntityId, Role};
use controlpet_core::ports::{
    ApiError, ApiResult, AuthApi, CollectionApi, ConflictReason, Credentials, EvaluationApi,
    LoginOutcome, RegisterRequest, UserInfo,
};

use crate::session::TokenCell;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Shared HTTP client for the backend. Holds the injected `TokenCell`;
/// nothing in this crate reads the token from ambient global state.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    token: TokenCell,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, token: TokenCell) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().into(),
            token,
        }
    }

    /// Collection client for `/api/alunos`.
    pub fn alunos(&self) -> RestCollection<controlpet_core::domain::Aluno> {
        RestCollection::new(self.clone(), "/api/alunos")
    }

    /// Collection client for `/api/relatorios`.
    pub fn relatorios(&self) -> RestCollection<controlpet_core::domain::Relatorio> {
        RestCollection::new(self.clone(), "/api/relatorios")
    }

    /// Collection client for `/api/avaliacoes-relatorio`.
    pub fn avaliacoes(&self) -> RestCollection<AvaliacaoRelatorio> {
        RestCollection::new(self.clone(), "/api/avaliacoes-relatorio")
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The single request interceptor: every outgoing request passes through
    /// here to pick up the bearer token, if one is present.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request and normalizes every failure into the taxonomy.
    /// No retries happen here; callers decide the UI treatment.
    async fn execute(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = read_error_message(response).await;
        Err(map_status(status, message))
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.execute(request).await?;
        let status = response.status();
        response.json::<T>().await.map_err(|err| {
            warn!("Failed to decode response body: {err}");
            ApiError::Server {
                status: status.as_u16(),
                message: format!("resposta inesperada do servidor: {err}"),
            }
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.fetch_json(self.http.get(self.url(path))).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.fetch_json(self.http.post(self.url(path)).json(body))
            .await
    }

    pub(crate) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.fetch_json(self.http.put(self.url(path)).json(body))
            .await
    }

    pub(crate) async fn put_empty<B: Serialize>(&self, path: &str, body: Option<&B>) -> ApiResult<()> {
        let mut request = self.http.put(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute(self.http.delete(self.url(path))).await?;
        Ok(())
    }
}

//=========================================================================================
// Error Normalization
//=========================================================================================

/// Error payload the backend ships: `{ message, statusCode?, error? }`.
/// Only `message` ever reaches end users.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: Option<String>,
    #[allow(dead_code)]
    status_code: Option<u16>,
    error: Option<String>,
}

async fn read_error_message(response: Response) -> String {
    let status = response.status();
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("erro na requisição")
            .to_string()
    };
    match response.text().await {
        Ok(text) => match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.message.or(body.error).unwrap_or_else(fallback),
            Err(_) if !text.trim().is_empty() => text,
            Err(_) => fallback(),
        },
        Err(_) => fallback(),
    }
}

/// Maps an HTTP failure status to the client-observed taxonomy.
///
/// A 5xx whose message carries dependency wording is treated as a conflict:
/// the backend is known to answer 500 for some dependency-conflict cases
/// that should be 409.
pub(crate) fn map_status(status: StatusCode, message: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthenticated,
        StatusCode::FORBIDDEN => ApiError::Forbidden(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::CONFLICT => ApiError::Conflict {
            reason: classify_conflict(&message),
            message,
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiError::ValidationRejected(message)
        }
        status if status.is_server_error() => match classify_conflict(&message) {
            ConflictReason::HasDependents => ApiError::Conflict {
                reason: ConflictReason::HasDependents,
                message,
            },
            ConflictReason::Unknown => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        },
        status => ApiError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

/// Boundary adapter recovering a structured conflict reason from backend
/// prose. This is the ONLY place coupled to server wording; replace it when
/// the backend grows real error codes.
pub(crate) fn classify_conflict(message: &str) -> ConflictReason {
    const DEPENDENT_HINTS: &[&str] = &[
        "relatório",
        "relatorio",
        "dependênci",
        "dependenci",
        "vinculad",
    ];

    let message = message.to_lowercase();
    if DEPENDENT_HINTS.iter().any(|hint| message.contains(hint)) {
        ConflictReason::HasDependents
    } else {
        ConflictReason::Unknown
    }
}

//=========================================================================================
// `AuthApi` Implementation
//=========================================================================================

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    senha: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    nome: &'a str,
    email: &'a str,
    senha: &'a str,
    tipo: Role,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordBody<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[async_trait]
impl AuthApi for RestClient {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginOutcome> {
        let body = LoginBody {
            email: &credentials.email,
            senha: &credentials.senha,
        };
        self.post_json("/auth/login", &body).await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<LoginOutcome> {
        let body = RegisterBody {
            nome: &request.nome,
            email: &request.email,
            senha: &request.senha,
            tipo: request.tipo,
        };
        self.post_json("/auth/register", &body).await
    }

    async fn me(&self) -> ApiResult<UserInfo> {
        self.get_json("/auth/me").await
    }

    async fn change_password(&self, current: &str, new: &str) -> ApiResult<()> {
        let body = ChangePasswordBody {
            current_password: current,
            new_password: new,
        };
        self.put_empty("/auth/change-password", Some(&body)).await
    }

    async fn reset_password(&self, user_id: EntityId) -> ApiResult<()> {
        self.put_empty::<()>(&format!("/auth/reset-password/{user_id}"), None)
            .await
    }
}

//=========================================================================================
// `CollectionApi` Implementation
//=========================================================================================

/// CRUD client for one REST collection, e.g. `/api/alunos`.
#[derive(Clone)]
pub struct RestCollection<E> {
    client: RestClient,
    path: &'static str,
    _entity: PhantomData<fn() -> E>,
}

impl<E> RestCollection<E> {
    fn new(client: RestClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E> CollectionApi<E> for RestCollection<E>
where
    E: Entity + DeserializeOwned + 'static,
{
    async fn fetch_all(&self) -> ApiResult<Vec<E>> {
        self.client.get_json(self.path).await
    }

    async fn fetch_one(&self, id: EntityId) -> ApiResult<E> {
        self.client.get_json(&format!("{}/{id}", self.path)).await
    }

    async fn create(&self, draft: &E::Draft) -> ApiResult<E> {
        self.client.post_json(self.path, draft).await
    }

    async fn update(&self, id: EntityId, draft: &E::Draft) -> ApiResult<E> {
        self.client
            .put_json(&format!("{}/{id}", self.path), draft)
            .await
    }

    async fn remove(&self, id: EntityId) -> ApiResult<()> {
        self.client.delete(&format!("{}/{id}", self.path)).await
    }
}

#[async_trait]
impl EvaluationApi for RestCollection<AvaliacaoRelatorio> {
    async fn fetch_by_relatorio(
        &self,
        relatorio_id: EntityId,
    ) -> ApiResult<Option<AvaliacaoRelatorio>> {
        let path = format!("{}/relatorio/{relatorio_id}", self.path);
        match self.client.get_json(&path).await {
            Ok(avaliacao) => Ok(Some(avaliacao)),
            // 404 means the report simply has not been evaluated yet.
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
