//! Session listing for the CLI.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use confcentral_types::session::SessionType;

use crate::state::AppState;

fn type_cell(session_type: SessionType) -> Cell {
    let cell = Cell::new(session_type.to_string());
    match session_type {
        SessionType::Keynote => cell.fg(Color::Magenta),
        SessionType::Workshop => cell.fg(Color::Yellow),
        SessionType::NotSpecified => cell.fg(Color::DarkGrey),
        SessionType::Lecture | SessionType::Panel => cell,
    }
}

/// List a conference's sessions in schedule order.
pub async fn list_sessions(state: &AppState, key: &str, json: bool) -> Result<()> {
    let sessions = state.session_service.conference_sessions(key).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!("  {} This conference has no sessions.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Date").fg(Color::White),
        Cell::new("Start").fg(Color::White),
        Cell::new("Minutes").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Speakers").fg(Color::White),
    ]);

    for session in &sessions {
        table.add_row(vec![
            Cell::new(session.date.format("%Y-%m-%d").to_string()).fg(Color::DarkGrey),
            Cell::new(session.start_time.format("%H:%M").to_string()),
            Cell::new(session.duration),
            Cell::new(&session.name).fg(Color::Cyan),
            type_cell(session.session_type),
            Cell::new(session.speakers.join(", ")),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
