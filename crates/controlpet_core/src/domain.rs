//! crates/controlpet_core/src/domain.rs
//!
//! Defines the core data structures for the Control PET client.
//! Field names mirror the backend's JSON (camelCase, Portuguese domain
//! terms); ids are server-assigned integers and never change once issued.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Server-assigned identifier, unique within its collection.
pub type EntityId = i32;

/// A server-managed record addressable by id.
///
/// `Draft` is the editable field subset sent on create/update; server-assigned
/// fields (`id`, `criadoEm`, `atualizadoEm`) are never part of it.
pub trait Entity: Clone + Send + Sync {
    type Draft: Serialize + Send + Sync;

    fn id(&self) -> EntityId;
}

/// Role of the authenticated user (`tipoUsuario` on the wire).
///
/// The backend only issues `aluno` and `orientador`; `admin` is accepted
/// so an upgraded backend does not break deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Aluno,
    Orientador,
    Admin,
}

/// The client's belief about who is authenticated, backed by a persisted token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: EntityId,
    pub display_name: String,
    pub role: Role,
}

/// Account record nested inside an `Aluno`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: EntityId,
    pub nome: String,
    pub email: String,
    pub tipo: Role,
    pub criado_em: NaiveDateTime,
    pub atualizado_em: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoEstudante {
    Bolsista,
    Voluntario,
}

/// A PET student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aluno {
    pub id: EntityId,
    pub usuario: Usuario,
    pub idade: i32,
    pub periodo_ano: String,
    pub edital_ingresso: String,
    pub tipo_estudante: TipoEstudante,
    pub curso: String,
    pub criado_em: NaiveDateTime,
    pub atualizado_em: NaiveDateTime,
}

/// Editable subset of an `Aluno`, as accepted by PUT/POST `/api/alunos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlunoDraft {
    pub usuario_id: EntityId,
    pub idade: i32,
    pub periodo_ano: String,
    pub edital_ingresso: String,
    pub tipo_estudante: TipoEstudante,
    pub curso: String,
}

impl Entity for Aluno {
    type Draft = AlunoDraft;

    fn id(&self) -> EntityId {
        self.id
    }
}

/// A monthly activity report. The backend flattens the student into
/// `alunoId`/`alunoNome` on its response DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relatorio {
    pub id: EntityId,
    pub aluno_id: EntityId,
    pub aluno_nome: String,
    pub tipo_relatorio: String,
    pub data_inicial: NaiveDate,
    pub data_final: NaiveDate,
    pub data_envio: Option<NaiveDate>,
    pub resumo_atividades: String,
    pub comentarios: Option<String>,
    pub criado_em: NaiveDateTime,
    pub atualizado_em: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatorioDraft {
    pub aluno_id: EntityId,
    pub tipo_relatorio: String,
    pub data_inicial: NaiveDate,
    pub data_final: NaiveDate,
    pub resumo_atividades: String,
    pub comentarios: Option<String>,
}

impl Entity for Relatorio {
    type Draft = RelatorioDraft;

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Grade assigned to one evaluation criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterio {
    Otimo,
    Bom,
    Regular,
    Insuficiente,
}

/// Advisor evaluation of a report. At most one exists per report; saving
/// an evaluation is an upsert keyed by `relatorio_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvaliacaoRelatorio {
    pub id: EntityId,
    pub relatorio_id: EntityId,
    pub carga_horaria: Criterio,
    pub interesse_atividades: Criterio,
    pub habilidades_desenvolvidas: Criterio,
    pub outras_informacoes: Option<String>,
    pub criado_em: NaiveDateTime,
    pub atualizado_em: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvaliacaoDraft {
    pub relatorio_id: EntityId,
    pub carga_horaria: Criterio,
    pub interesse_atividades: Criterio,
    pub habilidades_desenvolvidas: Criterio,
    pub outras_informacoes: Option<String>,
}

impl Entity for AvaliacaoRelatorio {
    type Draft = AvaliacaoDraft;

    fn id(&self) -> EntityId {
        self.id
    }
}
