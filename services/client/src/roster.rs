//! services/client/src/roster.rs
//!
//! The authenticated list screen, built once and instantiated three times
//! (student roster, advisor report roster, student report history). Flow:
//! gate → fetch → filter → paginate → mutate → reconcile.
//!
//! Operations take `&mut self`, so two user-triggered mutations can never
//! overlap on one screen — the type-level analogue of the UI's
//! disabled-while-pending buttons.

use std::sync::Arc;

use controlpet_core::domain::{Aluno, Entity, EntityId, Relatorio, RelatorioDraft, Role};
use controlpet_core::filter::{DateRange, Searchable};
use controlpet_core::gate::GateDecision;
use controlpet_core::listview::ListView;
use controlpet_core::paginate::Page;
use controlpet_core::ports::{ApiError, ApiResult, CollectionApi};

use crate::adapters::rest::{RestClient, RestCollection};
use crate::coordinator::{MutationCoordinator, Notice};
use crate::session::SessionStore;

/// How many page numbers the navigation bar shows at once.
pub const PAGE_WINDOW: usize = 5;

pub struct Roster<E: Entity + Searchable, C: CollectionApi<E> + ?Sized> {
    api: Arc<C>,
    view: ListView<E>,
    coordinator: MutationCoordinator<E, C>,
    required_roles: Vec<Role>,
}

impl<E, C> Roster<E, C>
where
    E: Entity + Searchable,
    C: CollectionApi<E> + ?Sized,
{
    pub fn new(api: Arc<C>, page_size: usize, required_roles: Vec<Role>) -> Self {
        Self {
            coordinator: MutationCoordinator::new(api.clone()),
            api,
            view: ListView::new(page_size),
            required_roles,
        }
    }

    /// Consults the gate, then fetches the collection. A `Pending` or
    /// `Redirect` decision short-circuits: no request leaves the client
    /// before the session allows it. A 401 from the fetch invalidates the
    /// session store so the next gate decision redirects to login.
    pub async fn load(&mut self, session: &mut SessionStore) -> Result<GateDecision, ApiError> {
        match session.gate(&self.required_roles) {
            GateDecision::Allowed => {}
            decision => return Ok(decision),
        }

        let items = fetch_or_invalidate(self.api.as_ref(), session).await?;
        self.view.replace_all(items);
        Ok(GateDecision::Allowed)
    }

    pub async fn create(
        &mut self,
        session: &mut SessionStore,
        draft: &E::Draft,
    ) -> ApiResult<E> {
        let result = self.coordinator.create(&mut self.view, draft).await;
        Self::hook_unauthorized(session, result.as_ref().err());
        result
    }

    pub async fn edit(
        &mut self,
        session: &mut SessionStore,
        id: EntityId,
        draft: &E::Draft,
    ) -> ApiResult<E> {
        let result = self.coordinator.edit(&mut self.view, id, draft).await;
        Self::hook_unauthorized(session, result.as_ref().err());
        result
    }

    pub async fn delete(&mut self, session: &mut SessionStore, id: EntityId) -> ApiResult<()> {
        let result = self.coordinator.delete(&mut self.view, id).await;
        Self::hook_unauthorized(session, result.as_ref().err());
        result
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.view.set_search(text);
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.view.set_date_range(range);
    }

    pub fn go_to_page(&mut self, requested: i64) {
        self.view.go_to_page(requested);
    }

    pub fn page(&self) -> Page<E> {
        self.view.page()
    }

    pub fn page_numbers(&self) -> Vec<usize> {
        self.view.page_numbers(PAGE_WINDOW)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.coordinator.notice()
    }

    pub fn dismiss_notice(&mut self) {
        self.coordinator.dismiss_notice();
    }

    pub fn view(&self) -> &ListView<E> {
        &self.view
    }

    fn hook_unauthorized(session: &mut SessionStore, err: Option<&ApiError>) {
        if matches!(err, Some(ApiError::Unauthenticated)) {
            session.invalidate();
        }
    }
}

/// Fetch wired to the session: a 401 invalidates the store so the next
/// gate decision redirects to login.
async fn fetch_or_invalidate<E, C>(api: &C, session: &mut SessionStore) -> ApiResult<Vec<E>>
where
    E: Entity,
    C: CollectionApi<E> + ?Sized,
{
    match api.fetch_all().await {
        Ok(items) => Ok(items),
        Err(ApiError::Unauthenticated) => {
            session.invalidate();
            Err(ApiError::Unauthenticated)
        }
        Err(err) => Err(err),
    }
}

/// A student's own report history.
///
/// The reports endpoint returns every student's reports, so ownership is
/// resolved client-side: the authenticated user is matched to their aluno
/// record and the collection is narrowed to that aluno's reports before
/// anything reaches the view. Accounts with no aluno record behind them
/// see an empty history.
pub struct HistoricoRoster<A, R>
where
    A: CollectionApi<Aluno> + ?Sized,
    R: CollectionApi<Relatorio> + ?Sized,
{
    alunos: Arc<A>,
    inner: Roster<Relatorio, R>,
}

impl<A, R> HistoricoRoster<A, R>
where
    A: CollectionApi<Aluno> + ?Sized,
    R: CollectionApi<Relatorio> + ?Sized,
{
    /// Any authenticated role may open their own history.
    pub fn new(alunos: Arc<A>, relatorios: Arc<R>, page_size: usize) -> Self {
        Self {
            alunos,
            inner: Roster::new(relatorios, page_size, Vec::new()),
        }
    }

    pub async fn load(&mut self, session: &mut SessionStore) -> Result<GateDecision, ApiError> {
        match session.gate(&[]) {
            GateDecision::Allowed => {}
            decision => return Ok(decision),
        }
        // `Allowed` on an empty role set implies an authenticated session.
        let user_id = match session.current() {
            Some(current) => current.user_id,
            None => return Ok(GateDecision::Pending),
        };

        let alunos = fetch_or_invalidate(self.alunos.as_ref(), session).await?;
        let own_aluno = alunos.iter().find(|a| a.usuario.id == user_id);
        let Some(aluno_id) = own_aluno.map(|a| a.id) else {
            self.inner.view.replace_all(Vec::new());
            return Ok(GateDecision::Allowed);
        };

        let mut relatorios = fetch_or_invalidate(self.inner.api.as_ref(), session).await?;
        relatorios.retain(|r| r.aluno_id == aluno_id);
        self.inner.view.replace_all(relatorios);
        Ok(GateDecision::Allowed)
    }

    pub async fn edit(
        &mut self,
        session: &mut SessionStore,
        id: EntityId,
        draft: &RelatorioDraft,
    ) -> ApiResult<Relatorio> {
        self.inner.edit(session, id, draft).await
    }

    pub async fn delete(&mut self, session: &mut SessionStore, id: EntityId) -> ApiResult<()> {
        self.inner.delete(session, id).await
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.inner.set_search(text);
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.inner.set_date_range(range);
    }

    pub fn go_to_page(&mut self, requested: i64) {
        self.inner.go_to_page(requested);
    }

    pub fn page(&self) -> Page<Relatorio> {
        self.inner.page()
    }

    pub fn page_numbers(&self) -> Vec<usize> {
        self.inner.page_numbers()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.inner.notice()
    }

    pub fn dismiss_notice(&mut self) {
        self.inner.dismiss_notice();
    }

    pub fn view(&self) -> &ListView<Relatorio> {
        self.inner.view()
    }
}

/// Student roster: advisor-only, searchable by name/email/course/type.
pub type AlunoRoster = Roster<Aluno, RestCollection<Aluno>>;

/// Report roster: searchable by student/type/summary, filterable by period.
pub type RelatorioRoster = Roster<Relatorio, RestCollection<Relatorio>>;

pub fn aluno_roster(client: &RestClient, page_size: usize) -> AlunoRoster {
    Roster::new(
        Arc::new(client.alunos()),
        page_size,
        vec![Role::Orientador],
    )
}

/// The advisor's view over every report.
pub fn relatorio_roster(client: &RestClient, page_size: usize) -> RelatorioRoster {
    Roster::new(
        Arc::new(client.relatorios()),
        page_size,
        vec![Role::Orientador],
    )
}

/// A student's history over their own reports, ownership resolved through
/// the aluno collection.
pub type HistoricoRestRoster = HistoricoRoster<RestCollection<Aluno>, RestCollection<Relatorio>>;

pub fn historico_roster(client: &RestClient, page_size: usize) -> HistoricoRestRoster {
    HistoricoRoster::new(
        Arc::new(client.alunos()),
        Arc::new(client.relatorios()),
        page_size,
    )
}
