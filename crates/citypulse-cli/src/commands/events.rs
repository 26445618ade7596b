use clap::Args;
use citypulse_core::{filter, Config, EventSource};

use super::{print_event_table, FilterArgs};

#[derive(Args)]
pub struct EventsArgs {
    /// City to search
    #[arg(long)]
    pub city: String,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: EventsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let source = EventSource::from_config(&config.api)?;
    let events = source.fetch_events(&args.city).await?;

    let state = args.filter.to_state(&config.vocabulary);
    let matched = filter(&events, &state);

    if args.json {
        let list: Vec<_> = matched.iter().map(|(_, event)| *event).collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if matched.is_empty() {
        println!("No events match ({} fetched for {}).", events.len(), args.city);
        return Ok(());
    }
    let shown = print_event_table(matched);
    println!("{shown} of {} events", events.len());
    Ok(())
}
