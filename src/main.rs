mod chart;
mod llm;
mod routes;
mod services;
mod state;
mod table;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // The credential is required before any service call — there is no
    // degraded mode without it.
    let llm = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            client
        }
        Err(e) => {
            tracing::error!(error = %e, "LLM client not configured");
            eprintln!(
                "tabchart cannot start: {e}\n\
                 Set OPENAI_API_KEY (or point LLM_API_KEY_ENV at the variable holding your key),\n\
                 e.g. in a .env file next to the binary, then restart."
            );
            std::process::exit(1);
        }
    };

    let state = state::AppState::new(Arc::new(llm));

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "tabchart listening");
    axum::serve(listener, app).await.expect("server failed");
}
