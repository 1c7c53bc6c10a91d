use crate::core::{ImportConfig, WorkbookImporter};
use crate::error::ImportResult;
use crate::excel::{build_template, parse_upload, CalamineDecoder, ParsedWorkbook, Upload};
use crate::store::SqliteStore;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for the import command
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub database_url: String,
    pub config: ImportConfig,
    pub dry_run: bool,
    pub verbose: bool,
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Execute the import command
pub async fn import(file: PathBuf, options: ImportOptions) -> ImportResult<()> {
    println!("{}", "📥 Attendance - Workbook Import".bold().green());
    println!("   File:     {}", file.display());
    if !options.dry_run {
        println!("   Database: {}", options.database_url);
    }
    println!();

    let content = fs::read(&file)?;
    let filename = upload_name(&file);
    let upload = Upload::new(&filename, &content);

    if options.dry_run {
        println!(
            "{}",
            "📋 DRY RUN MODE - Nothing will be written\n".yellow()
        );
        let parsed = parse_upload(
            &upload,
            &CalamineDecoder,
            options.config.max_upload_bytes,
            options.config.academic_year,
        )?;
        print_preview(&parsed, options.verbose);
        return Ok(());
    }

    if options.verbose {
        println!("{}", "🗄️  Opening database...".cyan());
    }
    let store = SqliteStore::connect(&options.database_url).await?;
    let importer = WorkbookImporter::new(store).with_config(options.config);

    if options.verbose {
        println!("{}", "📖 Reading workbook...".cyan());
    }
    let summary = importer.import(&upload).await?;

    println!("{}", format!("✅ {}", summary.message).bold().green());
    println!("   Subject:           {}", summary.subject_name.bright_blue());
    println!("   Subjects created:  {}", summary.subjects_created);
    println!("   Schedules created: {}", summary.schedules_created);
    if summary.rows_skipped > 0 {
        println!("   Rows skipped:      {}", summary.rows_skipped);
    }
    for warning in &summary.warnings {
        println!("{}", format!("⚠️  {}", warning).yellow());
    }
    println!();

    if options.verbose {
        let store = importer.store();
        let schedules = store.schedules_for_subject(summary.subject_id).await?;
        println!("   📅 {} sessions on record:", schedules.len());
        for entry in schedules {
            println!("      {}  {}h  {}", entry.date, entry.hours, entry.notes);
        }
        println!();
    }

    Ok(())
}

fn print_preview(parsed: &ParsedWorkbook, verbose: bool) {
    let info = &parsed.basic_info;
    println!("   Sheets:          {}", parsed.sheet_names.join(", "));
    println!("   Subject:         {}", info.subject_name.bright_blue().bold());
    println!("   Teacher:         {}", info.teacher_name);
    println!("   Department:      {}", info.department);
    println!("   Attendance time: {}", info.attendance_time);
    if verbose && !info.description.is_empty() {
        println!("   Description:     {}", info.description.replace('\n', " / "));
    }
    println!();

    match &parsed.schedule {
        None => println!("   No schedule sheet (Sheet2) found"),
        Some(schedule) => {
            println!(
                "   📅 {} sessions, {} rows skipped",
                schedule.rows.len(),
                schedule.skipped.len()
            );
            for row in &schedule.rows {
                println!(
                    "      row {:>3}: {}  {}h  {}",
                    row.row_number, row.date, row.hours, row.notes
                );
            }
            if verbose {
                for skipped in &schedule.skipped {
                    println!(
                        "{}",
                        format!("      row {:>3}: skipped ({})", skipped.row_number, skipped.reason)
                            .dimmed()
                    );
                }
            }
        }
    }
    println!();
    println!("{}", "📋 Dry run complete - no changes written".yellow());
}

/// Execute the template command
pub fn template(output: PathBuf) -> ImportResult<()> {
    println!("{}", "📄 Attendance - Import Template".bold().green());

    let bytes = build_template()?;
    fs::write(&output, bytes)?;

    println!("{}", "✅ Template written".bold().green());
    println!("   Excel file: {}\n", output.display());
    Ok(())
}
