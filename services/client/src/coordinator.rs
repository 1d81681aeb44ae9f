//! services/client/src/coordinator.rs
//!
//! Serializes create/edit/delete operations against a collection port and
//! reconciles the in-memory list afterwards. Deletes are pessimistic: the
//! entity leaves the view only once the server has confirmed.

use std::sync::Arc;

use tracing::warn;

use controlpet_core::domain::{AvaliacaoDraft, AvaliacaoRelatorio, Entity, EntityId};
use controlpet_core::filter::Searchable;
use controlpet_core::listview::ListView;
use controlpet_core::ports::{ApiError, ApiResult, CollectionApi, ConflictReason, EvaluationApi};

/// Fixed, user-facing instruction shown instead of the backend's prose when
/// a delete hits dependent records.
pub const DEPENDENTS_MESSAGE: &str =
    "Não foi possível excluir. Primeiro, exclua todos os relatórios vinculados a este registro.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// The single banner a view instance displays. Modal-local errors live in
/// their own coordinator instance, so they never bleed into the page's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

pub struct MutationCoordinator<E: Entity, C: CollectionApi<E> + ?Sized> {
    api: Arc<C>,
    notice: Option<Notice>,
    _entity: std::marker::PhantomData<fn() -> E>,
}

impl<E, C> MutationCoordinator<E, C>
where
    E: Entity + Searchable,
    C: CollectionApi<E> + ?Sized,
{
    pub fn new(api: Arc<C>) -> Self {
        Self {
            api,
            notice: None,
            _entity: std::marker::PhantomData,
        }
    }

    /// Creates the entity remotely, then appends the server's response (id
    /// already assigned) to the view.
    pub async fn create(&mut self, view: &mut ListView<E>, draft: &E::Draft) -> ApiResult<E> {
        match self.api.create(draft).await {
            Ok(created) => {
                view.insert(created.clone());
                self.replace_notice(Notice::success("Registro criado com sucesso."));
                Ok(created)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Updates the entity remotely, then splices the server's response into
    /// the view by id. No refetch; identity is preserved across the
    /// round-trip.
    pub async fn edit(
        &mut self,
        view: &mut ListView<E>,
        id: EntityId,
        draft: &E::Draft,
    ) -> ApiResult<E> {
        match self.api.update(id, draft).await {
            Ok(updated) => {
                view.apply_update(updated.clone());
                self.replace_notice(Notice::success("Registro atualizado com sucesso."));
                Ok(updated)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Removes the entity remotely; only a confirmed delete touches the
    /// view. A dependents conflict keeps the entity and swaps the backend's
    /// prose for the fixed instruction.
    pub async fn delete(&mut self, view: &mut ListView<E>, id: EntityId) -> ApiResult<()> {
        match self.api.remove(id).await {
            Ok(()) => {
                view.remove(id);
                self.replace_notice(Notice::success("Registro excluído com sucesso."));
                Ok(())
            }
            Err(err) => {
                let text = match &err {
                    ApiError::Conflict {
                        reason: ConflictReason::HasDependents,
                        ..
                    } => DEPENDENTS_MESSAGE.to_string(),
                    // Unrecognized conflict: fall back to the raw message.
                    ApiError::Conflict { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                warn!("Delete of entity {id} failed: {err}");
                self.replace_notice(Notice::error(text));
                Err(err)
            }
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The page banner is dismissible independently of any modal's.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn report(&mut self, err: &ApiError) {
        let text = match err {
            ApiError::ValidationRejected(message) => message.clone(),
            ApiError::Network(_) => {
                "Erro de rede ou conexão com o servidor. Verifique sua internet.".to_string()
            }
            other => other.to_string(),
        };
        self.replace_notice(Notice::error(text));
    }

    // A new outcome always evicts the previous banner, success or error,
    // so stale messages never linger next to fresh ones.
    fn replace_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }
}

/// Coordinates advisor evaluations: "evaluate" is an upsert keyed by the
/// evaluated report, since at most one evaluation exists per report.
pub struct EvaluationCoordinator<A: EvaluationApi + ?Sized> {
    api: Arc<A>,
    notice: Option<Notice>,
}

impl<A: EvaluationApi + ?Sized> EvaluationCoordinator<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api, notice: None }
    }

    pub async fn evaluate(&mut self, draft: &AvaliacaoDraft) -> ApiResult<AvaliacaoRelatorio> {
        // A failure anywhere in the upsert, the lookup included, must land
        // in the banner. No early return before the notice is settled.
        let result = match self.api.fetch_by_relatorio(draft.relatorio_id).await {
            Ok(Some(avaliacao)) => self.api.update(avaliacao.id, draft).await,
            Ok(None) => self.api.create(draft).await,
            Err(err) => Err(err),
        };
        match &result {
            Ok(_) => {
                self.notice = Some(Notice::success("Avaliação registrada com sucesso."));
            }
            Err(err) => {
                self.notice = Some(Notice::error(err.to_string()));
            }
        }
        result
    }

    /// The current evaluation of a report, if any.
    pub async fn current_for(&self, relatorio_id: EntityId) -> ApiResult<Option<AvaliacaoRelatorio>> {
        self.api.fetch_by_relatorio(relatorio_id).await
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
