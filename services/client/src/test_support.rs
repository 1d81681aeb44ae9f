//! services/client/src/test_support.rs
//!
//! In-memory fakes for the core ports, plus entity fixtures. Compiled only
//! for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use controlpet_core::domain::{
    Aluno, AlunoDraft, AvaliacaoDraft, AvaliacaoRelatorio, Criterio, EntityId, Relatorio,
    RelatorioDraft, Role, TipoEstudante, Usuario,
};
use controlpet_core::ports::{
    ApiError, ApiResult, AuthApi, CollectionApi, Credentials, EvaluationApi, LoginOutcome,
    RegisterRequest, TokenStore, UserInfo,
};

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn aluno(id: EntityId, nome: &str) -> Aluno {
    Aluno {
        id,
        usuario: Usuario {
            id: 100 + id,
            nome: nome.to_string(),
            email: format!("{}@ufpa.br", nome.to_lowercase().replace(' ', ".")),
            tipo: Role::Aluno,
            criado_em: timestamp(),
            atualizado_em: timestamp(),
        },
        idade: 21,
        periodo_ano: "2024.2".to_string(),
        edital_ingresso: "Edital 01/2024".to_string(),
        tipo_estudante: TipoEstudante::Bolsista,
        curso: "Ciência da Computação".to_string(),
        criado_em: timestamp(),
        atualizado_em: timestamp(),
    }
}

pub fn relatorio(id: EntityId, aluno_id: EntityId, aluno_nome: &str) -> Relatorio {
    Relatorio {
        id,
        aluno_id,
        aluno_nome: aluno_nome.to_string(),
        tipo_relatorio: "mensal".to_string(),
        data_inicial: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        data_final: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        data_envio: Some(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()),
        resumo_atividades: "Atividades do mês.".to_string(),
        comentarios: None,
        criado_em: timestamp(),
        atualizado_em: timestamp(),
    }
}

pub fn avaliacao_draft(relatorio_id: EntityId) -> AvaliacaoDraft {
    AvaliacaoDraft {
        relatorio_id,
        carga_horaria: Criterio::Bom,
        interesse_atividades: Criterio::Otimo,
        habilidades_desenvolvidas: Criterio::Bom,
        outras_informacoes: None,
    }
}

//=========================================================================================
// Fake AuthApi
//=========================================================================================

pub struct FakeAuthApi {
    outcome: LoginOutcome,
    info: UserInfo,
    login_err: Option<ApiError>,
    me_err: Option<ApiError>,
    register_err: Option<ApiError>,
    change_password_err: Option<ApiError>,
    reset_err: Option<ApiError>,
}

impl FakeAuthApi {
    fn new(nome: &str, role: Role, token: &str) -> Self {
        Self {
            outcome: LoginOutcome {
                nome: nome.to_string(),
                tipo: role,
                token: token.to_string(),
            },
            info: UserInfo {
                id: 1,
                nome: nome.to_string(),
                email: format!("{}@ufpa.br", nome.to_lowercase()),
                tipo_usuario: role,
            },
            login_err: None,
            me_err: None,
            register_err: None,
            change_password_err: None,
            reset_err: None,
        }
    }

    pub fn advisor(token: &str) -> Self {
        Self::new("Ana", Role::Orientador, token)
    }

    pub fn student(token: &str) -> Self {
        Self::new("Bruno", Role::Aluno, token)
    }

    pub fn fail_login(&mut self, err: ApiError) {
        self.login_err = Some(err);
    }

    pub fn fail_me(&mut self, err: ApiError) {
        self.me_err = Some(err);
    }

    pub fn fail_register(&mut self, err: ApiError) {
        self.register_err = Some(err);
    }

    pub fn fail_change_password(&mut self, err: ApiError) {
        self.change_password_err = Some(err);
    }

    pub fn fail_reset(&mut self, err: ApiError) {
        self.reset_err = Some(err);
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, _credentials: &Credentials) -> ApiResult<LoginOutcome> {
        match &self.login_err {
            Some(err) => Err(err.clone()),
            None => Ok(self.outcome.clone()),
        }
    }

    async fn register(&self, _request: &RegisterRequest) -> ApiResult<LoginOutcome> {
        match &self.register_err {
            Some(err) => Err(err.clone()),
            None => Ok(self.outcome.clone()),
        }
    }

    async fn me(&self) -> ApiResult<UserInfo> {
        match &self.me_err {
            Some(err) => Err(err.clone()),
            None => Ok(self.info.clone()),
        }
    }

    async fn change_password(&self, _current: &str, _new: &str) -> ApiResult<()> {
        match &self.change_password_err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn reset_password(&self, _user_id: EntityId) -> ApiResult<()> {
        match &self.reset_err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

//=========================================================================================
// Fake TokenStore
//=========================================================================================

pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token: Mutex::new(token.map(str::to_string)),
        }
    }

    pub fn stored(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.stored()
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

//=========================================================================================
// Fake student collection
//=========================================================================================

pub struct FakeAlunoApi {
    items: Mutex<Vec<Aluno>>,
    fail_next: Mutex<Option<ApiError>>,
    fetches: AtomicUsize,
}

impl FakeAlunoApi {
    pub fn with(items: impl IntoIterator<Item = Aluno>) -> Self {
        Self {
            items: Mutex::new(items.into_iter().collect()),
            fail_next: Mutex::new(None),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Makes the next API call fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn snapshot(&self) -> Vec<Aluno> {
        self.items.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> ApiResult<()> {
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn apply_aluno_draft(existing: &Aluno, draft: &AlunoDraft) -> Aluno {
    Aluno {
        idade: draft.idade,
        periodo_ano: draft.periodo_ano.clone(),
        edital_ingresso: draft.edital_ingresso.clone(),
        tipo_estudante: draft.tipo_estudante,
        curso: draft.curso.clone(),
        atualizado_em: timestamp() + chrono::Duration::hours(1),
        ..existing.clone()
    }
}

#[async_trait]
impl CollectionApi<Aluno> for FakeAlunoApi {
    async fn fetch_all(&self) -> ApiResult<Vec<Aluno>> {
        self.take_failure()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot())
    }

    async fn fetch_one(&self, id: EntityId) -> ApiResult<Aluno> {
        self.take_failure()?;
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("aluno {id}")))
    }

    async fn create(&self, draft: &AlunoDraft) -> ApiResult<Aluno> {
        self.take_failure()?;
        let mut items = self.items.lock().unwrap();
        let id = items.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let created = apply_aluno_draft(&aluno(id, "Novo Aluno"), draft);
        items.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: EntityId, draft: &AlunoDraft) -> ApiResult<Aluno> {
        self.take_failure()?;
        let mut items = self.items.lock().unwrap();
        let slot = items
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("aluno {id}")))?;
        *slot = apply_aluno_draft(slot, draft);
        Ok(slot.clone())
    }

    async fn remove(&self, id: EntityId) -> ApiResult<()> {
        self.take_failure()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|a| a.id != id);
        if items.len() == before {
            return Err(ApiError::NotFound(format!("aluno {id}")));
        }
        Ok(())
    }
}

//=========================================================================================
// Fake report collection
//=========================================================================================

pub struct FakeRelatorioApi {
    items: Mutex<Vec<Relatorio>>,
    fetches: AtomicUsize,
}

impl FakeRelatorioApi {
    pub fn with(items: impl IntoIterator<Item = Relatorio>) -> Self {
        Self {
            items: Mutex::new(items.into_iter().collect()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

fn apply_relatorio_draft(existing: &Relatorio, draft: &RelatorioDraft) -> Relatorio {
    Relatorio {
        aluno_id: draft.aluno_id,
        tipo_relatorio: draft.tipo_relatorio.clone(),
        data_inicial: draft.data_inicial,
        data_final: draft.data_final,
        resumo_atividades: draft.resumo_atividades.clone(),
        comentarios: draft.comentarios.clone(),
        atualizado_em: timestamp() + chrono::Duration::hours(1),
        ..existing.clone()
    }
}

#[async_trait]
impl CollectionApi<Relatorio> for FakeRelatorioApi {
    async fn fetch_all(&self) -> ApiResult<Vec<Relatorio>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.lock().unwrap().clone())
    }

    async fn fetch_one(&self, id: EntityId) -> ApiResult<Relatorio> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("relatório {id}")))
    }

    async fn create(&self, draft: &RelatorioDraft) -> ApiResult<Relatorio> {
        let mut items = self.items.lock().unwrap();
        let id = items.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let created = apply_relatorio_draft(&relatorio(id, draft.aluno_id, "Aluno"), draft);
        items.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: EntityId, draft: &RelatorioDraft) -> ApiResult<Relatorio> {
        let mut items = self.items.lock().unwrap();
        let slot = items
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("relatório {id}")))?;
        *slot = apply_relatorio_draft(slot, draft);
        Ok(slot.clone())
    }

    async fn remove(&self, id: EntityId) -> ApiResult<()> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|r| r.id != id);
        if items.len() == before {
            return Err(ApiError::NotFound(format!("relatório {id}")));
        }
        Ok(())
    }
}

//=========================================================================================
// Fake evaluation collection
//=========================================================================================

pub struct FakeAvaliacaoApi {
    items: Mutex<Vec<AvaliacaoRelatorio>>,
    fail_next: Mutex<Option<ApiError>>,
    created: AtomicUsize,
    updated: AtomicUsize,
}

impl FakeAvaliacaoApi {
    pub fn empty() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
            created: AtomicUsize::new(0),
            updated: AtomicUsize::new(0),
        }
    }

    /// Makes the next lookup fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn updated_count(&self) -> usize {
        self.updated.load(Ordering::SeqCst)
    }
}

fn avaliacao_from(id: EntityId, draft: &AvaliacaoDraft) -> AvaliacaoRelatorio {
    AvaliacaoRelatorio {
        id,
        relatorio_id: draft.relatorio_id,
        carga_horaria: draft.carga_horaria,
        interesse_atividades: draft.interesse_atividades,
        habilidades_desenvolvidas: draft.habilidades_desenvolvidas,
        outras_informacoes: draft.outras_informacoes.clone(),
        criado_em: timestamp(),
        atualizado_em: timestamp(),
    }
}

#[async_trait]
impl CollectionApi<AvaliacaoRelatorio> for FakeAvaliacaoApi {
    async fn fetch_all(&self) -> ApiResult<Vec<AvaliacaoRelatorio>> {
        Ok(self.items.lock().unwrap().clone())
    }

    async fn fetch_one(&self, id: EntityId) -> ApiResult<AvaliacaoRelatorio> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("avaliação {id}")))
    }

    async fn create(&self, draft: &AvaliacaoDraft) -> ApiResult<AvaliacaoRelatorio> {
        let mut items = self.items.lock().unwrap();
        let id = items.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let created = avaliacao_from(id, draft);
        items.push(created.clone());
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(created)
    }

    async fn update(&self, id: EntityId, draft: &AvaliacaoDraft) -> ApiResult<AvaliacaoRelatorio> {
        let mut items = self.items.lock().unwrap();
        let slot = items
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("avaliação {id}")))?;
        *slot = avaliacao_from(id, draft);
        self.updated.fetch_add(1, Ordering::SeqCst);
        Ok(slot.clone())
    }

    async fn remove(&self, id: EntityId) -> ApiResult<()> {
        self.items.lock().unwrap().retain(|a| a.id != id);
        Ok(())
    }
}

#[async_trait]
impl EvaluationApi for FakeAvaliacaoApi {
    async fn fetch_by_relatorio(
        &self,
        relatorio_id: EntityId,
    ) -> ApiResult<Option<AvaliacaoRelatorio>> {
        if let Some(err) = self.fail_next.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.relatorio_id == relatorio_id)
            .cloned())
    }
}
