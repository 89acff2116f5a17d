//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tesla_cotizador::adapters::ai::{MockAiAdapter, OpenAiAdapter};
use tesla_cotizador::adapters::persistence::{FsRepo, StateJson};
use tesla_cotizador::adapters::render::MarkdownRenderer;
use tesla_cotizador::adapters::ui::tui::TuiInputPort;
use tesla_cotizador::domain::{Catalog, PiliBrain};
use tesla_cotizador::ports::{
    AiPort, DocumentRepoPort, InputPort, RendererPort, SequencePort,
};
use tesla_cotizador::shared::config::AppConfig;
use tesla_cotizador::usecases::DocumentService;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration, using defaults");
        AppConfig::default()
    });
    let company_name = cfg.company_name_or_default();

    tesla_cotizador::adapters::ui::init_ui(&company_name);

    let data_path = PathBuf::from(cfg.data_dir_or_default());
    tokio::fs::create_dir_all(&data_path)
        .await
        .map_err(|e| anyhow::anyhow!("create data dir: {}", e))?;
    let data_dir_abs = data_path
        .canonicalize()
        .unwrap_or_else(|_| data_path.clone());
    info!(path = %data_dir_abs.display(), "data directory");

    // --- Persistence ---
    let repo: Arc<dyn DocumentRepoPort> = Arc::new(FsRepo::new(data_path.join("documents")));
    let state_impl = StateJson::new(data_path.join("state.json"));
    state_impl
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let sequence: Arc<dyn SequencePort> = Arc::new(state_impl);

    // --- Export ---
    let exports_dir = PathBuf::from(cfg.exports_dir_or_default());
    info!(path = %exports_dir.display(), "exports directory");
    let renderer: Arc<dyn RendererPort> =
        Arc::new(MarkdownRenderer::new(exports_dir, company_name.clone()));

    // --- AI (optional summary polish) ---
    let ai: Option<Arc<dyn AiPort>> = if cfg.is_ai_configured() {
        info!(
            model = %cfg.ai_model_or_default(),
            url = %cfg.ai_api_url_or_default(),
            "AI summary refinement enabled with OpenAI adapter"
        );
        Some(Arc::new(OpenAiAdapter::new(
            cfg.ai_api_url_or_default(),
            cfg.ai_api_key().unwrap_or_default(),
            cfg.ai_model_or_default(),
        )))
    } else if std::env::var("COTIZADOR_AI_MOCK").is_ok() {
        warn!("COTIZADOR_AI_API_KEY not set, using mock AI adapter");
        Some(Arc::new(MockAiAdapter::new()))
    } else {
        info!("COTIZADOR_AI_API_KEY not set, summaries stay rule-based");
        None
    };

    // --- Brain + service ---
    let validity_days = cfg.validity_days_or_default();
    let brain = Arc::new(PiliBrain::new(Catalog::builtin()).with_validity_days(validity_days));
    info!(
        categories = brain.catalog().len(),
        validity_days, "PILI ready"
    );
    let service = Arc::new(DocumentService::new(brain, repo, sequence, renderer, ai));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        Arc::clone(&service),
        cfg.history_limit_or_default(),
    ));

    // --- Run (main menu -> Cotización / Proyecto / Informe / Historial) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
