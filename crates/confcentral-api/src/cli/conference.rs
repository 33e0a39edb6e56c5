//! Conference CLI commands: list, show.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use confcentral_types::conference::ConferenceView;

use crate::state::AppState;

fn date_range(view: &ConferenceView) -> String {
    let fmt = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "?".to_string())
    };
    match (view.conference.start_date, view.conference.end_date) {
        (None, None) => "unscheduled".to_string(),
        (start, end) => format!("{} → {}", fmt(start), fmt(end)),
    }
}

fn seats_cell(view: &ConferenceView, nearly_sold_out: i64) -> Cell {
    let c = &view.conference;
    let text = format!("{}/{}", c.seats_available, c.max_attendees);
    match c.seats_available {
        0 => Cell::new(text).fg(Color::Red),
        n if n <= nearly_sold_out => Cell::new(text).fg(Color::Yellow),
        _ => Cell::new(text).fg(Color::Green),
    }
}

/// List every conference, ordered by name.
pub async fn list_conferences(state: &AppState, json: bool) -> Result<()> {
    let conferences = state.conference_service.query_conferences(&[]).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conferences)?);
        return Ok(());
    }

    if conferences.is_empty() {
        println!();
        println!(
            "  {} No conferences yet. Create one with: {}",
            style("i").blue().bold(),
            style("POST /api/v1/conferences").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Key").fg(Color::White),
        Cell::new("City").fg(Color::White),
        Cell::new("Dates").fg(Color::White),
        Cell::new("Seats").fg(Color::White),
        Cell::new("Organizer").fg(Color::White),
    ]);

    for view in &conferences {
        let organizer = view
            .organizer_display_name
            .clone()
            .unwrap_or_else(|| view.conference.organizer_user_id.clone());
        table.add_row(vec![
            Cell::new(&view.conference.name).fg(Color::Cyan),
            Cell::new(view.conference.id.to_string()).fg(Color::DarkGrey),
            Cell::new(&view.conference.city),
            Cell::new(date_range(view)),
            seats_cell(view, state.config.nearly_sold_out_seats),
            Cell::new(organizer),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conference{}",
        style(conferences.len()).bold(),
        if conferences.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Show one conference with its sessions and featured speaker.
pub async fn show_conference(state: &AppState, key: &str, json: bool) -> Result<()> {
    let view = state.conference_service.get_conference(key).await?;
    let sessions = state.session_service.conference_sessions(key).await?;
    let featured = state.session_service.featured_speaker(key).await?;

    if json {
        let detail = serde_json::json!({
            "conference": view,
            "sessions": sessions,
            "featured_speaker": featured,
        });
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let c = &view.conference;
    println!();
    println!("  {}", style(&c.name).cyan().bold());
    if let Some(description) = &c.description {
        println!("  {}", style(description).dim());
    }
    println!();
    println!("  Key:       {}", style(c.id).dim());
    println!("  City:      {}", c.city);
    println!("  Dates:     {}", date_range(&view));
    println!("  Topics:    {}", c.topics.join(", "));
    println!(
        "  Seats:     {} of {}",
        style(c.seats_available).bold(),
        c.max_attendees
    );
    println!(
        "  Organizer: {}",
        view.organizer_display_name
            .as_deref()
            .unwrap_or(&c.organizer_user_id)
    );
    println!("  Sessions:  {}", sessions.len());
    if !featured.is_empty() {
        println!();
        println!("  {} {}", style("★").yellow(), featured);
    }
    println!();

    Ok(())
}
