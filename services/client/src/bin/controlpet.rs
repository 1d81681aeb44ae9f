//! services/client/src/bin/controlpet.rs
//!
//! Terminal front end for the Control PET backend: resolves (or creates) a
//! session, loads the student roster, and prints the first page. Mostly a
//! smoke harness for the roster engine against a live backend.

use std::sync::Arc;

use client_lib::{
    adapters::rest::RestClient, adapters::token_file::FileTokenStore, aluno_roster,
    config::Config, error::ClientError, session::{SessionStore, TokenCell},
};
use controlpet_core::gate::GateDecision;
use controlpet_core::ports::Credentials;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Backend at {}", config.api_base_url);

    // --- 2. Wire the Session Store and REST Adapter ---
    // One TokenCell is shared between the store (writer) and the REST
    // client's request interceptor (reader).
    let token = TokenCell::new();
    let rest = RestClient::new(config.api_base_url.clone(), token.clone());
    let store = Arc::new(FileTokenStore::new(config.token_path.clone()));
    let mut session = SessionStore::new(Arc::new(rest.clone()), store, token);

    // --- 3. Resolve the Session ---
    // Prefer the persisted token; fall back to credentials from the
    // environment when the token is absent or rejected.
    if session.resolve_current_session().await.is_err() {
        let email = std::env::var("CONTROLPET_EMAIL")
            .map_err(|_| ClientError::Internal("no session: set CONTROLPET_EMAIL and CONTROLPET_SENHA to log in".to_string()))?;
        let senha = std::env::var("CONTROLPET_SENHA")
            .map_err(|_| ClientError::Internal("no session: set CONTROLPET_EMAIL and CONTROLPET_SENHA to log in".to_string()))?;
        let resolved = session.login(&Credentials { email, senha }).await?;
        info!("Logged in as {} ({:?})", resolved.display_name, resolved.role);
    }

    // --- 4. Load and Print the Student Roster ---
    let mut roster = aluno_roster(&rest, config.page_size);
    match roster.load(&mut session).await? {
        GateDecision::Allowed => {}
        GateDecision::Pending => {
            return Err(ClientError::Internal("session resolution incomplete".to_string()));
        }
        GateDecision::Redirect(target) => {
            println!("Acesso negado; redirecionaria para {target:?}.");
            return Ok(());
        }
    }

    let page = roster.page();
    println!(
        "Página {}/{} — {} aluno(s) no total",
        page.current,
        page.total_pages,
        roster.view().len()
    );
    for aluno in &page.items {
        println!(
            "  #{:<4} {:<30} {:<30} {}",
            aluno.id, aluno.usuario.nome, aluno.usuario.email, aluno.curso
        );
    }
    println!("Páginas: {:?}", roster.page_numbers());

    Ok(())
}
