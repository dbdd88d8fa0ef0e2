//! CLI `cleanup` command: delete sessions that have gone stale.

use anyhow::Result;

use thoughtlog::config::ThoughtlogConfig;

pub async fn cleanup(config: &ThoughtlogConfig, max_age_days: u64, dry_run: bool) -> Result<()> {
    let sessions = super::open_sessions(config)?;

    let result = if dry_run {
        sessions.preview_cleanup(max_age_days).await?
    } else {
        sessions.cleanup_sessions(max_age_days).await?
    };

    if result.candidates.is_empty() {
        println!("No sessions older than {max_age_days} days.");
        return Ok(());
    }

    if dry_run {
        println!(
            "Found {} session(s) for cleanup (dry run, nothing deleted):\n",
            result.candidates.len()
        );
        println!("{:<48} {:>8}", "Session", "Age (d)");
        println!("{}", "-".repeat(57));
        for c in &result.candidates {
            println!("{:<48} {:>8}", c.session_name, c.age_days);
        }
    } else {
        println!("Deleted {} stale session(s).", result.deleted_count);
    }

    Ok(())
}
