//! Timeline helpers: day grouping, paging, account names and node icons.

#![allow(clippy::result_large_err)]

use crate::changes::collaborators::SchemaProvider;
use crate::diff::normalize::normalize;
use crate::errors::ExError;
use crate::event::NodeEvent;
use crate::model::value::PropertyValue;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Deserialize;
use std::collections::HashMap;

/// Icon shown for node types without a declared (or resolvable) icon.
pub const FALLBACK_ICON: &str = "question-circle";

/// Label shown for events without an account.
pub const NO_ACCOUNT: &str = "n/a";

/// Events that happened on one calendar day, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct EventsOnDate {
    day: NaiveDate,
    events: Vec<NodeEvent>,
}

impl EventsOnDate {
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// `YYYY-MM-DD`
    pub fn day_key(&self) -> String {
        self.day.format("%Y-%m-%d").to_string()
    }

    pub fn events(&self) -> &[NodeEvent] {
        &self.events
    }
}

/// Bucket events by the calendar day of their timestamp, in the timestamp's
/// own offset. Buckets keep first-seen order; events without a timestamp
/// are skipped.
pub fn group_by_day(events: impl IntoIterator<Item = NodeEvent>) -> Vec<EventsOnDate> {
    let mut days: Vec<EventsOnDate> = Vec::new();
    for event in events {
        let Some(timestamp) = event.timestamp else {
            continue;
        };
        let day = timestamp.date_naive();
        match days.iter_mut().find(|d| d.day == day) {
            Some(bucket) => bucket.events.push(event),
            None => days.push(EventsOnDate {
                day,
                events: vec![event],
            }),
        }
    }
    days
}

/// Bucket events that share the exact same second, e.g. the child events of
/// one publish action.
pub fn group_by_time(events: &[NodeEvent]) -> Vec<(DateTime<FixedOffset>, Vec<&NodeEvent>)> {
    let mut groups: Vec<(DateTime<FixedOffset>, Vec<&NodeEvent>)> = Vec::new();
    for event in events {
        let Some(timestamp) = event.timestamp else {
            continue;
        };
        match groups
            .iter_mut()
            .find(|(t, _)| t.timestamp() == timestamp.timestamp())
        {
            Some((_, bucket)) => bucket.push(event),
            None => groups.push((timestamp, vec![event])),
        }
    }
    groups
}

/// One page of events plus the offset of the next page, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_offset: Option<usize>,
}

/// Slice `limit` items starting at `offset`; `next_offset` is set only when
/// more items follow.
pub fn paginate<T>(items: Vec<T>, offset: usize, limit: usize) -> Page<T> {
    let total = items.len();
    let items: Vec<T> = items.into_iter().skip(offset).take(limit).collect();
    let end = offset.saturating_add(limit);
    Page {
        items,
        next_offset: (end < total).then_some(end),
    }
}

/// Keep events whose timestamp falls within `[start, end]` (whole days).
/// Open bounds are unlimited; events without a timestamp are dropped when
/// any bound is set.
pub fn filter_by_date_range(
    events: Vec<NodeEvent>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<NodeEvent> {
    if start.is_none() && end.is_none() {
        return events;
    }
    events
        .into_iter()
        .filter(|event| {
            event.timestamp.is_some_and(|ts| {
                let day = ts.date_naive();
                start.map_or(true, |s| day >= s) && end.map_or(true, |e| day <= e)
            })
        })
        .collect()
}

/// Keep events recorded for one account; `None` keeps every event.
pub fn filter_by_account(events: Vec<NodeEvent>, account_id: Option<&str>) -> Vec<NodeEvent> {
    let Some(account_id) = account_id else {
        return events;
    };
    events
        .into_iter()
        .filter(|event| event.account_identifier.as_deref() == Some(account_id))
        .collect()
}

/// A person's name as stored in the user directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserName {
    pub first_name: String,
    pub last_name: String,
}

impl UserName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// `Last, First`, as used in account filter lists.
    pub fn sortable_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Looks up people by account identifier.
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` for unknown accounts and accounts without a name.
    ///
    /// # Errors
    ///
    /// Any kind; callers fall back to the account identifier.
    fn user_name(&self, account_id: &str) -> Result<Option<UserName>, ExError>;
}

/// Directory backed by a fixed account map, e.g. loaded from YAML:
///
/// ```yaml
/// editor-1: { firstName: Jane, lastName: Doe }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StaticUserDirectory {
    users: HashMap<String, UserName>,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, account_id: impl Into<String>, name: UserName) -> Self {
        self.users.insert(account_id.into(), name);
        self
    }
}

impl UserDirectory for StaticUserDirectory {
    fn user_name(&self, account_id: &str) -> Result<Option<UserName>, ExError> {
        Ok(self.users.get(account_id).cloned())
    }
}

/// How an account is shown next to an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameFormat {
    /// `Jane Doe`
    #[default]
    FullName,
    /// `JD`
    Initials,
    /// `Jane D.`
    FullFirstName,
}

impl std::str::FromStr for NameFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fullName" | "full-name" => Ok(NameFormat::FullName),
            "initials" => Ok(NameFormat::Initials),
            "fullFirstName" | "full-first-name" => Ok(NameFormat::FullFirstName),
            other => Err(format!("unknown name format `{}`", other)),
        }
    }
}

/// Display name of an event's account.
pub fn account_display_name(
    account_id: Option<&str>,
    directory: &dyn UserDirectory,
    format: NameFormat,
) -> String {
    let Some(account_id) = account_id.filter(|id| !id.is_empty()) else {
        return NO_ACCOUNT.to_string();
    };
    let Some(name) = lookup_user(directory, account_id) else {
        return account_id.to_string();
    };

    match format {
        NameFormat::FullName => name.full_name(),
        NameFormat::Initials => format!(
            "{}{}",
            initial_of(&name.first_name),
            initial_of(&name.last_name)
        ),
        NameFormat::FullFirstName => {
            let initial: String = name.last_name.chars().take(1).collect();
            let abbreviated = if initial.is_empty() {
                String::new()
            } else {
                format!("{initial}.")
            };
            format!("{} {}", name.first_name, abbreviated)
                .trim()
                .to_string()
        }
    }
}

/// Distinct accounts of `events` in first-seen order, each paired with its
/// filter label: `Last, First`, or the identifier for unknown users.
pub fn account_filter_options(
    events: &[NodeEvent],
    directory: &dyn UserDirectory,
) -> Vec<(String, String)> {
    let mut options: Vec<(String, String)> = Vec::new();
    for account_id in events
        .iter()
        .filter_map(|event| event.account_identifier.as_deref())
        .filter(|id| !id.is_empty())
    {
        if options.iter().any(|(seen, _)| seen == account_id) {
            continue;
        }
        let label = lookup_user(directory, account_id)
            .map(|name| name.sortable_name())
            .unwrap_or_else(|| account_id.to_string());
        options.push((account_id.to_string(), label));
    }
    options
}

fn lookup_user(directory: &dyn UserDirectory, account_id: &str) -> Option<UserName> {
    match directory.user_name(account_id) {
        Ok(name) => name,
        Err(err) => {
            tracing::warn!(
                account_id,
                err.code = err.code(),
                "user lookup failed: {}",
                err
            );
            None
        }
    }
}

fn initial_of(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .take(1)
        .collect()
}

/// UI icon of a node type, or [`FALLBACK_ICON`].
pub fn node_icon(schemas: &dyn SchemaProvider, node_type: Option<&str>) -> String {
    node_type
        .and_then(|name| schemas.schema(name).ok())
        .and_then(|schema| schema.icon)
        .unwrap_or_else(|| FALLBACK_ICON.to_string())
}

/// Markup-free text of a string value; other values give `""`.
pub fn slimmed_down_content(value: &PropertyValue, strip_tags: bool) -> String {
    value
        .as_str()
        .map(|text| normalize(text, strip_tags))
        .unwrap_or_default()
}
