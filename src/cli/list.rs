use anyhow::Result;

use thoughtlog::config::ThoughtlogConfig;

/// Print every session, most recently modified first.
pub async fn list(config: &ThoughtlogConfig) -> Result<()> {
    let sessions = super::open_sessions(config)?;
    let response = sessions.list_sessions(usize::MAX, 0).await?;

    if response.sessions.is_empty() {
        println!("No sessions found in {}.", sessions.store().dir().display());
        return Ok(());
    }

    println!("{:<48} {:>8} {:<17}", "Session", "Thoughts", "Last modified");
    println!("{}", "-".repeat(75));
    for s in &response.sessions {
        println!(
            "{:<48} {:>8} {:<17}",
            s.session_name,
            s.thought_count,
            super::format_time(s.last_modified),
        );
    }
    println!();
    println!("{} session(s)", response.total);

    Ok(())
}
