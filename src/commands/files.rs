//! Stored-recording commands, rendered through the sidebar view

use std::path::Path;

use colored::Colorize;
use prettytable::{format, row, Table};

use crate::api::{AudioFileMetadata, CallsumApi};
use crate::audio::AudioFile;
use crate::commands::AppContext;
use crate::error::Result;
use crate::views::{format_bytes, time_ago, Sidebar};

/// List the user's recordings.
pub async fn list_files(ctx: &AppContext) -> Result<()> {
    ctx.require_signed_in()?;
    let mut sidebar = Sidebar::new();
    sidebar.mount(&ctx.api, &ctx.session.snapshot()).await?;
    print_file_table(sidebar.files());
    Ok(())
}

/// Store a recording without summarizing it.
pub async fn upload_file(ctx: &AppContext, path: &Path) -> Result<()> {
    ctx.require_signed_in()?;
    let file = AudioFile::from_path(path).await?;
    let mut sidebar = Sidebar::new();
    let uploaded = sidebar.upload(&ctx.api, &file).await?;
    println!("{}", uploaded.message.green());
    println!("  ID:       {}", uploaded.file_id.cyan());
    println!("  Filename: {}", uploaded.filename);
    println!("  Stored:   {}", uploaded.storage_url);
    Ok(())
}

/// Show one recording's details and download URL.
pub async fn show_file(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.require_signed_in()?;
    let details = ctx.api.get_file(id).await?;
    println!("{}", details.filename.bold());
    println!("  ID:   {}", details.file_id);
    println!("  Size: {}", format_bytes(details.file_size));
    if let Some(created) = details.created_at {
        println!("  Uploaded: {}", time_ago(created, chrono::Utc::now()));
    }
    println!("  URL:  {}", details.url);
    Ok(())
}

/// Delete one recording.
pub async fn delete_file(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.require_signed_in()?;
    let mut sidebar = Sidebar::new();
    sidebar.delete_file(&ctx.api, id).await?;
    println!("{}", format!("Deleted file {}", id).green());
    println!("{} file(s) remaining", sidebar.files().len());
    Ok(())
}

fn print_file_table(files: &[AudioFileMetadata]) {
    if files.is_empty() {
        println!("{}", "No files uploaded yet.".yellow());
        return;
    }

    let now = chrono::Utc::now();
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row!["ID".bold(), "Filename".bold(), "Size".bold(), "Uploaded".bold()]);

    for file in files {
        let uploaded = file
            .created_at
            .map(|ts| time_ago(ts, now))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![
            file.id.as_deref().unwrap_or("-").cyan(),
            file.filename,
            format_bytes(file.file_size),
            uploaded
        ]);
    }

    println!();
    table.printstd();
    println!();
}
