//! Attendance import API server binary

use attendance_import::api::{run_api_server, ApiConfig};
use attendance_import::core::ImportConfig;
use attendance_import::excel::{AcademicYear, MAX_UPLOAD_BYTES};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "attendance-server")]
#[command(version)]
#[command(about = "Attendance import server - HTTP API for subject workbook uploads")]
#[command(long_about = r#"
Attendance import server

Endpoints:
  - POST /api/import-excel       - Import a subject workbook (multipart field "file")
  - GET  /api/download-template  - Download an example workbook
  - GET  /health, /api/health    - Health check (pings the database)
  - GET  /version                - Server version info
  - GET  /                       - API documentation

Example usage:
  attendance-server                           # Start on localhost:8080
  attendance-server --host 0.0.0.0 --port 3000

  curl -F "file=@mechanics.xlsx" http://localhost:8080/api/import-excel
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "ATTENDANCE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "ATTENDANCE_PORT")]
    port: u16,

    /// Database URL
    #[arg(
        short,
        long,
        default_value = "sqlite://attendance.db",
        env = "ATTENDANCE_DATABASE_URL"
    )]
    database: String,

    /// First calendar year of the academic year used for schedule dates
    #[arg(long, default_value_t = 2024, env = "ATTENDANCE_ACADEMIC_YEAR")]
    academic_year: i32,

    /// Reject uploads larger than this many bytes
    #[arg(long, default_value_t = MAX_UPLOAD_BYTES, env = "ATTENDANCE_MAX_UPLOAD_BYTES")]
    max_upload_bytes: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_import=info,tower_http=info".into()),
        )
        .init();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        database_url: args.database,
        import: ImportConfig {
            max_upload_bytes: args.max_upload_bytes,
            academic_year: AcademicYear::new(args.academic_year),
        },
    };

    run_api_server(config).await
}
