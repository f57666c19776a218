//! Query parameters of the sites listing.

use serde::Deserialize;
use serde_with::{DefaultOnError, DisplayFromStr, serde_as};
use validator::Validate;

use crate::application::services::ListRequest;
use crate::domain::listing::DisplayMode;

/// Query string of `GET /api/sites` and `GET /network/sites`.
///
/// Malformed `paged` values fall back to the first page rather than
/// rejecting the request.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SiteListParams {
    #[serde(default)]
    pub mode: Option<String>,

    /// Search term.
    #[serde(default)]
    pub s: Option<String>,

    #[serde(default)]
    pub orderby: Option<String>,

    #[serde(default)]
    pub order: Option<String>,

    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub paged: Option<i64>,

    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 999, message = "per_page must be between 1 and 999"))]
    pub per_page: Option<i64>,
}

impl SiteListParams {
    pub fn to_request(&self) -> ListRequest {
        ListRequest {
            mode: DisplayMode::parse(self.mode.as_deref()),
            search: self.s.clone().unwrap_or_default(),
            orderby: self.orderby.clone(),
            order: self.order.clone(),
            paged: self.paged.unwrap_or(1),
            per_page: self.per_page,
            current_site_id: None,
        }
    }
}
