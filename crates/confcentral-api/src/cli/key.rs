//! API key issuance.

use anyhow::Result;
use console::style;

use crate::http::extractors::auth::issue_api_key;
use crate::state::AppState;

/// Issue a key for `email` and print it once.
pub async fn issue_key(state: &AppState, email: &str, name: &str, json: bool) -> Result<()> {
    let key = issue_api_key(&state.db_pool, email, name).await?;

    if json {
        let out = serde_json::json!({
            "email": email.trim().to_lowercase(),
            "api_key": key,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} API key issued for {} (save this -- it won't be shown again):",
        style("🔑").bold(),
        style(email.trim()).cyan()
    );
    println!();
    println!("  {}", style(&key).yellow().bold());
    println!();
    println!(
        "  Use it as {}",
        style("Authorization: Bearer <key>").dim()
    );
    println!();

    Ok(())
}
