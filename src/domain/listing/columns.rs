//! Table columns and cell formatting rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::InstallMode;

use super::sort::SortColumn;

/// Users listed per row before the "more" link appears.
pub const USERS_SHOWN: usize = 5;

/// Shown when a site was never updated.
pub const NEVER_UPDATED: &str = "Never";

/// Shown when a site has no registration date.
pub const NOT_REGISTERED: &str = "\u{2014}";

/// How much detail each row carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    List,
    /// Adds times, site title and tagline, and user e-mails.
    Excerpt,
}

impl DisplayMode {
    /// Anything but `excerpt` selects the compact list view.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("excerpt") => DisplayMode::Excerpt,
            _ => DisplayMode::List,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::List => "list",
            DisplayMode::Excerpt => "excerpt",
        }
    }

    fn date_format(&self) -> &'static str {
        match self {
            DisplayMode::List => "%Y/%m/%d",
            DisplayMode::Excerpt => "%Y/%m/%d %-I:%M:%S %P",
        }
    }
}

/// A column of the sites table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    #[serde(rename = "cb")]
    Checkbox,
    BlogName,
    LastUpdated,
    Registered,
    Users,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Checkbox,
        Column::BlogName,
        Column::LastUpdated,
        Column::Registered,
        Column::Users,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Column::Checkbox => "cb",
            Column::BlogName => "blogname",
            Column::LastUpdated => "lastupdated",
            Column::Registered => "registered",
            Column::Users => "users",
        }
    }

    pub fn header(&self, mode: InstallMode) -> &'static str {
        match (self, mode) {
            (Column::Checkbox, _) => "",
            (Column::BlogName, InstallMode::Subdomain) => "Domain",
            (Column::BlogName, InstallMode::Subdirectory) => "Path",
            (Column::LastUpdated, _) => "Last Updated",
            (Column::Registered, _) => "Registered",
            (Column::Users, _) => "Users",
        }
    }

    /// The `orderby` value a header click requests.
    ///
    /// "Registered" sorts by id: ids grow with registration time.
    pub fn sort_column(&self) -> Option<SortColumn> {
        match self {
            Column::BlogName => Some(SortColumn::BlogName),
            Column::LastUpdated => Some(SortColumn::LastUpdated),
            Column::Registered => Some(SortColumn::BlogId),
            Column::Checkbox | Column::Users => None,
        }
    }
}

pub fn format_last_updated(value: Option<DateTime<Utc>>, mode: DisplayMode) -> String {
    match value {
        Some(ts) => ts.format(mode.date_format()).to_string(),
        None => NEVER_UPDATED.to_string(),
    }
}

pub fn format_registered(value: Option<DateTime<Utc>>, mode: DisplayMode) -> String {
    match value {
        Some(ts) => ts.format(mode.date_format()).to_string(),
        None => NOT_REGISTERED.to_string(),
    }
}
