//! Weight Manager
//!
//! An MCP server for calorie budgeting and food tracking.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use weightmgr::build_info;
use weightmgr::config::Settings;
use weightmgr::db::{self, Database};
use weightmgr::mcp::WeightManagerService;
use weightmgr::search::FatSecretClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env();

    // Logging goes to stderr to not interfere with MCP stdio
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(settings.log_directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let db_path = settings.database_path.clone();
    eprintln!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&db_path)?;
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let fatsecret = match settings.fatsecret {
        Some(credentials) => Some(FatSecretClient::new(credentials)?),
        None => {
            tracing::warn!("WM_FATSECRET_API_KEY/WM_FATSECRET_TOKEN not set, food search disabled");
            None
        }
    };

    let service = WeightManagerService::new(db_path, database, fatsecret);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
