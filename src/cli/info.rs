use anyhow::Result;

use thoughtlog::config::ThoughtlogConfig;

/// Display session metadata in the terminal.
pub async fn info(config: &ThoughtlogConfig, session_name: &str) -> Result<()> {
    let sessions = super::open_sessions(config)?;
    let info = sessions.get_session_info(session_name).await?;

    if !info.exists {
        println!("Session {session_name} does not exist.");
        return Ok(());
    }

    println!("Session: {}", info.session_name);
    println!("{}", "=".repeat(40));
    println!("  Thoughts:        {}", info.thought_count);
    println!("  First thought:   {}", super::format_time(info.first_thought));
    println!("  Last thought:    {}", super::format_time(info.last_thought));
    println!("  Created:         {}", super::format_time(info.created));
    println!("  Last modified:   {}", super::format_time(info.last_modified));

    let modes: Vec<&str> = info.modes.iter().map(|m| m.as_str()).collect();
    println!("  Modes:           {}", modes.join(", "));
    if !info.tags.is_empty() {
        println!("  Tags:            {}", info.tags.join(", "));
    }

    Ok(())
}
