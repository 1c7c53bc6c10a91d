use attendance_import::cli::{self, ImportOptions};
use attendance_import::core::ImportConfig;
use attendance_import::error::ImportResult;
use attendance_import::excel::{AcademicYear, MAX_UPLOAD_BYTES};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "attendance-import")]
#[command(about = "Import subject workbooks (basic info + schedule) into the attendance database")]
#[command(long_about = "Attendance workbook importer

Reads an Excel workbook with two sheets and stores one subject and its
scheduled sessions:

  Sheet1  basic info at fixed cells
          B1 teacher, B2 department, B3 subject name,
          D1/D2 schedule notes, D3 attendance time
  Sheet2  header row, then one session per row
          column B date (e.g. 4月8日), column F hours, column G notes

Re-importing the same workbook never duplicates subjects or sessions.

EXAMPLES:
  attendance-import template template.xlsx
  attendance-import import mechanics.xlsx --dry-run
  attendance-import import mechanics.xlsx --database sqlite://attendance.db")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Import a subject workbook.

The subject is matched by name: a new name creates a subject, a known name
only refreshes the stored copy of the workbook. Sessions are matched by
date and only missing ones are created.

Dates without a year are placed in the academic year: April-December in
YEAR, January-March in YEAR+1 (default 2024).

Use --dry-run to see what would be imported without touching the database.")]
    /// Import a subject workbook (.xlsx / .xls)
    Import {
        /// Path to the workbook
        file: PathBuf,

        /// Database URL
        #[arg(
            short,
            long,
            default_value = "sqlite://attendance.db",
            env = "ATTENDANCE_DATABASE_URL"
        )]
        database: String,

        /// First calendar year of the academic year
        #[arg(long, default_value_t = 2024, env = "ATTENDANCE_ACADEMIC_YEAR")]
        academic_year: i32,

        /// Reject workbooks larger than this many bytes
        #[arg(long, default_value_t = MAX_UPLOAD_BYTES, env = "ATTENDANCE_MAX_UPLOAD_BYTES")]
        max_upload_bytes: usize,

        /// Parse and show the workbook without writing to the database
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show verbose import steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write an example workbook in the import layout
    Template {
        /// Output Excel file path (.xlsx)
        output: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "attendance_import=debug"
    } else {
        "attendance_import=warn"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> ImportResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            file,
            database,
            academic_year,
            max_upload_bytes,
            dry_run,
            verbose,
        } => {
            init_tracing(verbose);
            let options = ImportOptions {
                database_url: database,
                config: ImportConfig {
                    max_upload_bytes,
                    academic_year: AcademicYear::new(academic_year),
                },
                dry_run,
                verbose,
            };
            cli::import(file, options).await
        }

        Commands::Template { output } => cli::template(output),
    }
}
