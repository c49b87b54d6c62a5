use clap::Subcommand;
use stillwater_core::{Config, Database, SessionStore};

#[derive(Subcommand)]
pub enum SessionsAction {
    /// Completed sessions, most recent first
    List {
        /// Maximum number of sessions (defaults to session.history_limit)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Totals and streaks
    Stats,
}

pub fn run(action: SessionsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        SessionsAction::List { limit } => {
            let limit = match limit {
                Some(limit) => limit,
                None => Config::load()?.session.history_limit,
            };
            let sessions = db.list_sessions(limit)?;
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        SessionsAction::Stats => {
            let stats = db.session_stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
