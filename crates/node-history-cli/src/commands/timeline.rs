//! Timeline command
//!
//! Usage: node-history timeline --events <FILE> [--users <FILE>] [--account <ID>] [--offset N --limit N]

use super::diff::OutputFormat;
use super::{read_input, read_yaml};
use chrono::NaiveDate;
use clap::Args;
use node_history_core::timeline::{
    account_display_name, account_filter_options, filter_by_account, filter_by_date_range,
    group_by_day, node_icon, paginate, NameFormat, StaticUserDirectory,
};
use node_history_core::{parse_events_bytes, ExError, ExErrorKind, NodeEvent, SchemaRegistry};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TimelineArgs {
    /// Event list JSON file (array of events)
    #[arg(long)]
    pub events: PathBuf,

    /// NodeTypes YAML file, used for node icons
    #[arg(long)]
    pub node_types: Option<PathBuf>,

    /// User directory YAML file (account id to firstName/lastName)
    #[arg(short, long)]
    pub users: Option<PathBuf>,

    /// Account name format: fullName, initials, fullFirstName
    #[arg(long, default_value = "fullName")]
    pub name_format: NameFormat,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Only show events recorded for this account
    #[arg(long)]
    pub account: Option<String>,

    /// List the accounts found in the events instead of the timeline
    #[arg(long)]
    pub list_accounts: bool,

    /// Number of events to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Maximum number of events to show
    #[arg(long, default_value_t = 25)]
    pub limit: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineEntry {
    time: Option<String>,
    account: String,
    event_type: Option<String>,
    node_type: Option<String>,
    node_identifier: Option<String>,
    icon: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineDay {
    day: String,
    events: Vec<TimelineEntry>,
}

#[derive(Debug, Serialize)]
struct AccountOption {
    identifier: String,
    label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelinePage {
    days: Vec<TimelineDay>,
    next_offset: Option<usize>,
}

/// Execute timeline command
pub fn execute(args: TimelineArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("timeline")
                .with_property("from")
                .with_message(format!("--from {} is after --to {}", from, to))
                .into());
        }
    }

    let events = parse_events_bytes(&read_input(&args.events)?)?;
    let registry = match &args.node_types {
        Some(path) => SchemaRegistry::from_yaml_file(path)?,
        None => SchemaRegistry::new(),
    };
    let users: StaticUserDirectory = read_yaml(args.users.as_deref())?;

    if args.list_accounts {
        let options: Vec<AccountOption> = account_filter_options(&events, &users)
            .into_iter()
            .map(|(identifier, label)| AccountOption { identifier, label })
            .collect();
        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
            OutputFormat::Text => {
                for option in &options {
                    println!("{}\t{}", option.identifier, option.label);
                }
            }
        }
        return Ok(());
    }

    let events = filter_by_account(events, args.account.as_deref());
    let events = filter_by_date_range(events, args.from, args.to);
    let page = paginate(events, args.offset, args.limit);
    tracing::debug!(
        event_count = page.items.len(),
        offset = args.offset,
        "timeline page selected"
    );

    let entry = |event: &NodeEvent| TimelineEntry {
        time: event.timestamp.map(|ts| ts.format("%H:%M").to_string()),
        account: account_display_name(
            event.account_identifier.as_deref(),
            &users,
            args.name_format,
        ),
        event_type: event.event_type.clone(),
        node_type: event.node_type().map(str::to_string),
        node_identifier: event.node_identifier.clone(),
        icon: node_icon(&registry, event.node_type()),
    };
    let timeline = TimelinePage {
        days: group_by_day(page.items)
            .iter()
            .map(|day| TimelineDay {
                day: day.day_key(),
                events: day.events().iter().map(&entry).collect(),
            })
            .collect(),
        next_offset: page.next_offset,
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&timeline)?),
        OutputFormat::Text => print!("{}", render_text(&timeline)),
    }
    Ok(())
}

fn render_text(timeline: &TimelinePage) -> String {
    let mut out = String::new();
    if timeline.days.is_empty() {
        out.push_str("No events.\n");
    }
    for day in &timeline.days {
        out.push_str(&format!("## {}\n\n", day.day));
        for entry in &day.events {
            out.push_str(&format!(
                "- {} [{}] {} {} {}",
                entry.time.as_deref().unwrap_or("--:--"),
                entry.icon,
                entry.account,
                entry.event_type.as_deref().unwrap_or("-"),
                entry.node_type.as_deref().unwrap_or("-"),
            ));
            if let Some(node) = &entry.node_identifier {
                out.push_str(&format!(" ({})", node));
            }
            out.push('\n');
        }
        out.push('\n');
    }
    if let Some(next) = timeline.next_offset {
        out.push_str(&format!("More events: --offset {}\n", next));
    }
    out
}
