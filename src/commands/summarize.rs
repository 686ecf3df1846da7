//! The dashboard flow in the terminal: pick a file, upload, show the result
//!
//! Plain transcription shares the same file gate but skips the summary.

use std::path::Path;

use colored::Colorize;

use crate::api::SummaryResponse;
use crate::audio::AudioFile;
use crate::commands::AppContext;
use crate::error::Result;
use crate::views::{format_bytes, Dashboard};

/// Summarize the recording at `path`.
///
/// The file type is checked before anything is read over the network.
pub async fn run_summarize(ctx: &AppContext, path: &Path, json: bool) -> Result<()> {
    ctx.require_signed_in()?;

    let mut dashboard = Dashboard::new();
    let file = AudioFile::from_path(path).await?;
    dashboard.select_file(file)?;

    if !json {
        println!("{}", format!("Uploading {}...", path.display()).cyan());
    }
    let summary = dashboard.upload(&ctx.api).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print_summary(summary);
    }
    Ok(())
}

/// Print the transcript of the recording at `path`.
///
/// Uses the same file-type gate as summarizing; the transcript is printed
/// as-is so it can be piped.
pub async fn run_transcribe(ctx: &AppContext, path: &Path) -> Result<()> {
    ctx.require_signed_in()?;

    let file = AudioFile::from_path(path).await?;
    file.validate()?;

    tracing::info!("Transcribing {}", file.file_name);
    let transcript = ctx.api.transcribe(&file).await?;
    println!("{}", transcript.trim());
    Ok(())
}

/// Render a summary as a short report.
pub fn print_summary(summary: &SummaryResponse) {
    println!();
    println!("{}", "Summary".bold().underline());
    println!("{}", summary.summary);

    let mut facts = Vec::new();
    if let Some(minutes) = summary.duration_minutes {
        facts.push(format!("Duration: {:.1} min", minutes));
    }
    if let Some(people) = summary.no_of_participants {
        facts.push(format!("Participants: {}", people));
    }
    if let Some(sentiment) = &summary.sentiment {
        facts.push(format!("Sentiment: {}", sentiment));
    }
    if !facts.is_empty() {
        println!();
        println!("{}", facts.join("  |  ").dimmed());
    }

    if let Some(aspects) = summary.key_aspects.as_ref().filter(|a| !a.is_empty()) {
        println!();
        println!("{}", "Key aspects".bold().underline());
        for aspect in aspects {
            println!("  • {}", aspect);
        }
    }

    if let Some(transcript) = summary.transcript.as_ref().filter(|t| !t.is_empty()) {
        println!();
        println!("{}", "Transcript".bold().underline());
        println!("{}", transcript);
    }

    if let Some(meta) = &summary.metadata {
        println!();
        println!(
            "{}",
            format!(
                "{} ({}) processed in {:.1}s",
                meta.file_name,
                format_bytes(meta.file_size),
                meta.processing_time
            )
            .dimmed()
        );
    }
    println!();
}
