//! Per-row status badges and action eligibility.
//!
//! The engine decides which transitions a row offers. It never performs
//! them: state-changing actions only become callable once a confirmation
//! token has been attached (see [`RowAction::is_callable`]).

use serde::{Serialize, Serializer};

use crate::domain::entities::{Network, Site};
use crate::domain::permissions::Permissions;

/// Status badge shown after a site's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Archived,
    Spam,
    Deleted,
    Mature,
}

impl Badge {
    /// Evaluation order; the last present badge also styles the row.
    pub const ORDER: [Badge; 4] = [Badge::Archived, Badge::Spam, Badge::Deleted, Badge::Mature];

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Archived => "Archived",
            Badge::Spam => "Spam",
            Badge::Deleted => "Deleted",
            Badge::Mature => "Mature",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Badge::Archived => "site-archived",
            Badge::Spam => "site-spammed",
            Badge::Deleted => "site-deleted",
            Badge::Mature => "site-mature",
        }
    }

    fn is_set(&self, site: &Site) -> bool {
        match self {
            Badge::Archived => site.archived,
            Badge::Spam => site.spam,
            Badge::Deleted => site.deleted,
            Badge::Mature => site.mature,
        }
    }
}

pub fn badges(site: &Site) -> Vec<Badge> {
    Badge::ORDER
        .into_iter()
        .filter(|badge| badge.is_set(site))
        .collect()
}

/// Identifies a row action. `Custom` entries come from extensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKey {
    Edit,
    Backend,
    Activate,
    Deactivate,
    Archive,
    Unarchive,
    Spam,
    Unspam,
    Delete,
    Visit,
    Custom(String),
}

impl ActionKey {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKey::Edit => "edit",
            ActionKey::Backend => "backend",
            ActionKey::Activate => "activate",
            ActionKey::Deactivate => "deactivate",
            ActionKey::Archive => "archive",
            ActionKey::Unarchive => "unarchive",
            ActionKey::Spam => "spam",
            ActionKey::Unspam => "unspam",
            ActionKey::Delete => "delete",
            ActionKey::Visit => "visit",
            ActionKey::Custom(key) => key,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ActionKey::Edit => "Edit",
            ActionKey::Backend => "Dashboard",
            ActionKey::Activate => "Activate",
            ActionKey::Deactivate => "Deactivate",
            ActionKey::Archive => "Archive",
            ActionKey::Unarchive => "Unarchive",
            ActionKey::Spam => "Spam",
            ActionKey::Unspam => "Not Spam",
            ActionKey::Delete => "Delete",
            ActionKey::Visit => "Visit",
            ActionKey::Custom(key) => key,
        }
    }

    /// Name of the transition handed to the action dispatcher, for actions
    /// that change site state.
    pub fn transition(&self) -> Option<&'static str> {
        match self {
            ActionKey::Activate => Some("activateblog"),
            ActionKey::Deactivate => Some("deactivateblog"),
            ActionKey::Archive => Some("archiveblog"),
            ActionKey::Unarchive => Some("unarchiveblog"),
            ActionKey::Spam => Some("spamblog"),
            ActionKey::Unspam => Some("unspamblog"),
            ActionKey::Delete => Some("deleteblog"),
            _ => None,
        }
    }

    pub fn is_state_transition(&self) -> bool {
        self.transition().is_some()
    }

    /// Prompt shown on the confirmation screen.
    pub fn confirm_message(&self, site_name: &str) -> Option<String> {
        let message = match self {
            ActionKey::Activate => format!("You are about to activate the site {site_name}"),
            ActionKey::Deactivate => format!("You are about to deactivate the site {site_name}"),
            ActionKey::Archive => format!("You are about to archive the site {site_name}."),
            ActionKey::Unarchive => format!("You are about to unarchive the site {site_name}."),
            ActionKey::Spam => format!("You are about to mark the site {site_name} as spam."),
            ActionKey::Unspam => format!("You are about to unspam the site {site_name}."),
            ActionKey::Delete => format!("You are about to delete the site {site_name}."),
            _ => return None,
        };
        Some(message)
    }
}

impl Serialize for ActionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One entry of a row's ordered action list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowAction {
    pub key: ActionKey,
    pub label: String,
    pub enabled: bool,
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<String>,
}

impl RowAction {
    pub fn new(key: ActionKey, enabled: bool) -> Self {
        let label = key.label().to_string();
        Self {
            key,
            label,
            enabled,
            url: None,
            confirmation: None,
        }
    }

    /// Enabled, and confirmed when it changes site state.
    pub fn is_callable(&self) -> bool {
        self.enabled && (!self.key.is_state_transition() || self.confirmation.is_some())
    }
}

/// Who is looking at the listing, and from where.
pub struct RowContext<'a> {
    pub network: &'a Network,
    /// The viewer's own currently-active site.
    pub current_site_id: i64,
    pub permissions: &'a dyn Permissions,
}

/// Derives the action list for one site, in display order.
///
/// Transitions come in exclusive pairs driven by the status flags. The
/// `deleted` flag drives the Activate/Deactivate pair. Neither the viewer's
/// own active site nor the network's main site offers any transition.
pub fn derive_actions(site: &Site, ctx: &RowContext<'_>) -> Vec<RowAction> {
    let guarded = site.id == ctx.current_site_id || ctx.network.is_main_site(site.id);
    let offer = |eligible: bool| !guarded && eligible;

    vec![
        RowAction::new(ActionKey::Edit, true),
        RowAction::new(ActionKey::Backend, true),
        RowAction::new(ActionKey::Activate, offer(site.deleted)),
        RowAction::new(ActionKey::Deactivate, offer(!site.deleted)),
        RowAction::new(ActionKey::Archive, offer(!site.archived)),
        RowAction::new(ActionKey::Unarchive, offer(site.archived)),
        RowAction::new(ActionKey::Spam, offer(!site.spam)),
        RowAction::new(ActionKey::Unspam, offer(site.spam)),
        RowAction::new(
            ActionKey::Delete,
            offer(ctx.permissions.can_delete_site(site.id)),
        ),
        RowAction::new(ActionKey::Visit, true),
    ]
}

/// Badges and actions for one listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowState {
    pub badges: Vec<Badge>,
    pub actions: Vec<RowAction>,
    /// Whether the row gets a bulk-selection checkbox.
    pub selectable: bool,
}

impl RowState {
    pub fn derive(site: &Site, ctx: &RowContext<'_>) -> Self {
        Self {
            badges: badges(site),
            actions: derive_actions(site, ctx),
            selectable: !ctx.network.is_main_site(site.id),
        }
    }

    pub fn row_class(&self) -> Option<&'static str> {
        self.badges.last().map(Badge::css_class)
    }

    pub fn action(&self, key: &ActionKey) -> Option<&RowAction> {
        self.actions.iter().find(|a| &a.key == key)
    }

    pub fn is_enabled(&self, key: &ActionKey) -> bool {
        self.action(key).is_some_and(|a| a.enabled)
    }

    pub fn enabled_actions(&self) -> impl Iterator<Item = &RowAction> {
        self.actions.iter().filter(|a| a.enabled)
    }
}

/// Hook that may append to or filter a row's actions before rendering.
pub trait RowActionExtension: Send + Sync {
    fn extend(&self, actions: &mut Vec<RowAction>, site: &Site, site_name: &str);
}

impl<F> RowActionExtension for F
where
    F: Fn(&mut Vec<RowAction>, &Site, &str) + Send + Sync,
{
    fn extend(&self, actions: &mut Vec<RowAction>, site: &Site, site_name: &str) {
        self(actions, site, site_name)
    }
}

/// A list-level action applied to the selected rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkAction {
    pub key: &'static str,
    pub label: &'static str,
}

pub fn bulk_actions(permissions: &dyn Permissions) -> Vec<BulkAction> {
    let mut actions = Vec::with_capacity(3);
    if permissions.can_delete_sites() {
        actions.push(BulkAction {
            key: "delete",
            label: "Delete",
        });
    }
    actions.push(BulkAction {
        key: "spam",
        label: "Mark as Spam",
    });
    actions.push(BulkAction {
        key: "notspam",
        label: "Not Spam",
    });
    actions
}
