//! Reporting server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};
use actix_web::{App, HttpServer, middleware, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use reporting_lib::api;
use reporting_lib::auth::Credentials;
use reporting_lib::config::Config;
use reporting_lib::core::{ReportingCore, ReportingSettings};
use reporting_lib::db::{DbPool, DbReportStore};
use reporting_lib::export_types::ExportTypesRegistry;
use reporting_lib::middleware::log_request;
use reporting_lib::store::{MemoryReportStore, ReportingStore};

/// Largest accepted JSON body; job params travel inline.
const JSON_BODY_LIMIT: usize = 1024 * 1024;

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    // Simple check - just verify we can load config
    Config::from_env().is_ok()
}

/// Pick the report store: PostgreSQL when configured, memory otherwise.
async fn build_store(config: &Config) -> Result<Arc<dyn ReportingStore>, String> {
    match &config.database_url {
        Some(url) => {
            let pool = DbPool::new(url).await.map_err(|e| e.to_string())?;
            info!("Database connection established");
            pool.run_migrations().await.map_err(|e| e.to_string())?;
            info!("Database migrations complete");
            Ok(Arc::new(DbReportStore::new(pool, config.index_prefix.clone())))
        }
        None => {
            warn!("DATABASE_URL not set - reports are kept in memory and lost on restart");
            Ok(Arc::new(MemoryReportStore::new(config.index_prefix.clone())))
        }
    }
}

fn cors(is_development: bool) -> Cors {
    let headers = vec![
        header::AUTHORIZATION,
        header::ACCEPT,
        header::CONTENT_TYPE,
        HeaderName::from_static("x-api-key"),
        HeaderName::from_static("x-admin-key"),
    ];

    let cors = if is_development {
        // Permissive CORS for development
        Cors::default()
            .allowed_origin("http://localhost:5601")
            .allowed_origin("http://127.0.0.1:5601")
    } else {
        // Restrictive CORS for production (same-origin only)
        Cors::default()
    };

    cors.allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(headers)
        .expose_headers(vec![header::RETRY_AFTER, header::CONTENT_DISPOSITION])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if health_check() { 0 } else { 1 });
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL must be set and security enabled");
            error!("  - RPT_API_KEYS entries must be 'username:sha256-hex:role'");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Reporting Server {}", config.version);
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let store = match build_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize report store: {}", e);
            std::process::exit(1);
        }
    };

    let registry = ExportTypesRegistry::with_defaults();
    for export_type in registry.iter() {
        info!(
            id = export_type.id(),
            jobtype = export_type.job_type(),
            "Export type registered"
        );
    }

    match &config.license {
        Some(license) => info!(
            license_type = %license.license_type,
            active = license.is_active(),
            "License loaded"
        ),
        None => warn!("No license information - report generation is disabled"),
    }

    if !config.security_enabled {
        warn!("Security disabled - all reports are created anonymously");
    } else if config.api_keys.is_empty() && config.admin_key.is_none() {
        warn!("Security enabled but no API keys configured - every request will be rejected");
    }

    let core = web::Data::new(ReportingCore::new(
        ReportingSettings::from_config(&config),
        registry,
        store,
        config.license.clone(),
    ));
    let credentials = web::Data::new(Credentials::from_config(&config));
    let bind_address = config.bind_address();
    let is_development = config.is_development();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!("Starting server at http://{} ({} workers)", bind_address, cpus);
        cpus
    };

    HttpServer::new(move || {
        App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors(is_development))
            .wrap(middleware::from_fn(log_request))
            .app_data(core.clone())
            .app_data(credentials.clone())
            .app_data(web::JsonConfig::default().limit(JSON_BODY_LIMIT))
            .configure(api::configure_reporting)
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run()
    .await
}
