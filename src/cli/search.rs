use anyhow::Result;

use thoughtlog::config::ThoughtlogConfig;

/// Search one session, or rank all sessions when `session` is `None`.
pub async fn search(config: &ThoughtlogConfig, query: &str, session: Option<&str>) -> Result<()> {
    let sessions = super::open_sessions(config)?;
    let limit = config.retrieval.max_return;

    match session {
        Some(name) => {
            let response = sessions.search_in_session(name, query, limit, 0).await?;
            if response.results.is_empty() {
                println!("No results found.");
                return Ok(());
            }

            println!("Found {} result(s) in {name}\n", response.total_matches);
            for (i, hit) in response.results.iter().enumerate() {
                println!("  {}. [{}] {} (score: {})", i + 1, hit.mode, hit.thought_id, hit.score);
                println!("     {}", hit.content);
                println!();
            }
        }
        None => {
            let response = sessions.search_all_sessions(query, limit, 0).await?;
            if response.sessions.is_empty() {
                println!("No sessions match.");
                return Ok(());
            }

            println!("{:<48} {:>8} {:>8}", "Session", "Matches", "Thoughts");
            println!("{}", "-".repeat(66));
            for s in &response.sessions {
                println!(
                    "{:<48} {:>8} {:>8}",
                    s.session_name, s.match_count, s.thought_count
                );
            }
        }
    }

    Ok(())
}
