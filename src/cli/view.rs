//! CLI `view` command: print every thought of one session.

use anyhow::Result;

use thoughtlog::config::ThoughtlogConfig;

pub async fn view(config: &ThoughtlogConfig, session_name: &str) -> Result<()> {
    let sessions = super::open_sessions(config)?;
    let response = sessions.view_session(session_name, Some(usize::MAX), None).await?;

    if response.thoughts.is_empty() {
        println!("Session {session_name} has no thoughts.");
        return Ok(());
    }

    println!("Session: {session_name}");
    println!("{}", "=".repeat(50));
    for (i, t) in response.thoughts.iter().enumerate() {
        println!(
            "  {}. [{}] {} ({})",
            i + 1,
            t.mode,
            t.id,
            t.timestamp.format("%Y-%m-%d %H:%M:%S"),
        );
        if !t.tags.is_empty() {
            println!("     tags: {}", t.tags.join(", "));
        }
        if let (Some(target), Some(kind)) = (&t.relates_to, t.relationship_type) {
            println!("     --[{kind}]--> {target}");
        }
        for line in t.content.lines() {
            println!("     {line}");
        }
        println!();
    }

    Ok(())
}
