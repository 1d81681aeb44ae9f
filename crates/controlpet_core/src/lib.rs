pub mod domain;
pub mod filter;
pub mod gate;
pub mod listview;
pub mod paginate;
pub mod ports;

pub use domain::{
    Aluno, AlunoDraft, AvaliacaoDraft, AvaliacaoRelatorio, Criterio, Entity, EntityId, Relatorio,
    RelatorioDraft, Role, Session, TipoEstudante, Usuario,
};
pub use filter::{DateRange, Searchable};
pub use gate::{decide, GateDecision, RedirectTarget, SessionResolution};
pub use listview::ListView;
pub use paginate::{page_window, paginate, Page};
pub use ports::{
    ApiError, ApiResult, AuthApi, AuthError, CollectionApi, ConflictReason, Credentials,
    EvaluationApi, LoginOutcome, RegisterRequest, TokenStore, UserInfo,
};
