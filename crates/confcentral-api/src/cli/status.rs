//! System status dashboard command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Display system status dashboard.
///
/// Shows conference, seat and speaker counts, the current announcement,
/// and where data lives.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let conferences = state.conference_service.query_conferences(&[]).await?;
    let speakers = state.speaker_service.list_speakers().await?;
    let announcement = state.conference_service.announcement().await?;

    let sold_out = conferences
        .iter()
        .filter(|v| v.conference.seats_available == 0)
        .count();
    let seats: i64 = conferences
        .iter()
        .map(|v| v.conference.seats_available)
        .sum();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "conferences": {
                "total": conferences.len(),
                "sold_out": sold_out,
                "seats_available": seats,
            },
            "speakers": speakers.len(),
            "announcement": announcement,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Conference Central v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Conferences ──").dim());
    println!("  Total:      {}", style(conferences.len()).bold());
    println!("  Open seats: {}", style(seats).green());
    if sold_out > 0 {
        println!("  Sold out:   {}", style(sold_out).red());
    }
    println!();

    println!("  {}", style("── Speakers ──").dim());
    println!("  Registered: {}", style(speakers.len()).bold());
    println!();

    if !announcement.is_empty() {
        println!("  {}", style("── Announcement ──").dim());
        println!("  {}", style(&announcement).yellow());
        println!();
    }

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style("SQLite (WAL mode)").dim());
    println!(
        "  Listen:   {}",
        style(format!("{}:{}", state.config.host, state.config.port)).dim()
    );
    println!();

    Ok(())
}
