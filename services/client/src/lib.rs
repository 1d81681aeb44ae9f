pub mod adapters;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod roster;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use adapters::rest::{RestClient, RestCollection};
pub use adapters::token_file::FileTokenStore;
pub use coordinator::{EvaluationCoordinator, MutationCoordinator, Notice, NoticeKind};
pub use roster::{
    aluno_roster, historico_roster, relatorio_roster, AlunoRoster, HistoricoRoster,
    HistoricoRestRoster, RelatorioRoster, Roster,
};
pub use session::{SessionStore, TokenCell};
