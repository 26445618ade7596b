use std::io::{BufRead, Write};

use clap::Subcommand;
use citypulse_core::saved::{JsonFileStore, SavedCollection};
use citypulse_core::{filter, Config, EventSource, SyncError, UserId};

use super::{print_event_table, FilterArgs};

#[derive(Subcommand)]
pub enum SavedAction {
    /// List saved events
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save an event from a city's listing
    Add {
        /// City the event belongs to
        #[arg(long)]
        city: String,
        /// Event id (as shown by `citypulse events`)
        #[arg(long)]
        event: String,
    },
    /// Remove a saved event
    Remove {
        /// Saved event id
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

pub async fn run(action: SavedAction, user: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let saved = SavedCollection::new(JsonFileStore::open_default()?);

    // The CLI session starts signed out; a user, if any, signs in for this run.
    if let Some(user) = user.and_then(UserId::new).or_else(|| config.user()) {
        saved.sign_in(user).await?;
    }

    match action {
        SavedAction::List { filter: args, json } => {
            if saved.session().user().is_none() {
                return Err(SyncError::NotAuthenticated.into());
            }
            let events = saved.snapshot();
            let matched = filter(&events, &args.to_state(&config.vocabulary));

            if json {
                let list: Vec<_> = matched.iter().map(|(_, event)| *event).collect();
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else if matched.is_empty() {
                println!("No saved events.");
            } else {
                print_event_table(matched);
            }
        }
        SavedAction::Add { city, event } => {
            // Fail before the network call when nobody is signed in.
            if saved.session().user().is_none() {
                return Err(SyncError::NotAuthenticated.into());
            }
            let events = EventSource::from_config(&config.api)?
                .fetch_events(&city)
                .await?;
            let found = events
                .get(&event)
                .cloned()
                .ok_or_else(|| format!("event not found in {city}: {event}"))?;
            let name = found.name.clone();
            let id = saved.add(found).await?;
            println!("Saved: {name} ({id})");
        }
        SavedAction::Remove { id, yes } => {
            let pending = saved.prepare_remove(&id)?;
            if !yes && !confirm(&format!("Remove \"{}\" from saved events?", pending.name()))? {
                println!("Cancelled.");
                return Ok(());
            }
            let removed = saved.commit_remove(pending).await?;
            println!("Removed: {}", removed.name);
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
