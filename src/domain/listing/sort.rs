//! Sort parameters for the sites listing.

use serde::Serialize;

use crate::domain::entities::InstallMode;

/// Sortable listing columns, as accepted in the `orderby` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Registered,
    LastUpdated,
    BlogName,
    #[serde(rename = "blog_id")]
    BlogId,
}

impl SortColumn {
    /// Parses an `orderby` value. Anything unrecognised means "no ordering".
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "registered" => Some(SortColumn::Registered),
            "lastupdated" => Some(SortColumn::LastUpdated),
            "blogname" => Some(SortColumn::BlogName),
            "blog_id" => Some(SortColumn::BlogId),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Registered => "registered",
            SortColumn::LastUpdated => "lastupdated",
            SortColumn::BlogName => "blogname",
            SortColumn::BlogId => "blog_id",
        }
    }

    /// Physical field this column orders by.
    pub fn field(&self, mode: InstallMode) -> SortField {
        match (self, mode) {
            (SortColumn::Registered, _) => SortField::Registered,
            (SortColumn::LastUpdated, _) => SortField::LastUpdated,
            (SortColumn::BlogName, InstallMode::Subdomain) => SortField::Domain,
            (SortColumn::BlogName, InstallMode::Subdirectory) => SortField::Path,
            (SortColumn::BlogId, _) => SortField::Id,
        }
    }
}

/// Sort direction. Only a case-insensitive `desc` selects descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// A column of the `sites` table that can appear in `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Registered,
    LastUpdated,
    Domain,
    Path,
    Id,
}

impl SortField {
    pub fn column_name(&self) -> &'static str {
        match self {
            SortField::Registered => "registered",
            SortField::LastUpdated => "last_updated",
            SortField::Domain => "domain",
            SortField::Path => "path",
            SortField::Id => "id",
        }
    }
}

/// Requested ordering. `column: None` emits no `ORDER BY` at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn from_request(orderby: Option<&str>, order: Option<&str>) -> Self {
        Self {
            column: orderby.and_then(SortColumn::parse),
            direction: SortDirection::parse(order),
        }
    }

    /// Resolves to a physical ordering, or `None` when unsorted.
    pub fn resolve(&self, mode: InstallMode) -> Option<(SortField, SortDirection)> {
        self.column.map(|c| (c.field(mode), self.direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_orderby_collapses_to_none() {
        let spec = SortSpec::from_request(Some("blog_id; DROP TABLE sites"), Some("desc"));
        assert_eq!(spec.column, None);
        assert_eq!(spec.resolve(InstallMode::Subdomain), None);
    }

    #[test]
    fn test_direction_is_case_insensitive() {
        assert_eq!(SortDirection::parse(Some("DeSc")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("sideways")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(None), SortDirection::Asc);
    }

    #[test]
    fn test_blogname_field_depends_on_install_mode() {
        assert_eq!(
            SortColumn::BlogName.field(InstallMode::Subdomain),
            SortField::Domain
        );
        assert_eq!(
            SortColumn::BlogName.field(InstallMode::Subdirectory),
            SortField::Path
        );
    }

    #[test]
    fn test_column_fields() {
        let mode = InstallMode::Subdomain;
        assert_eq!(SortColumn::Registered.field(mode).column_name(), "registered");
        assert_eq!(SortColumn::LastUpdated.field(mode).column_name(), "last_updated");
        assert_eq!(SortColumn::BlogId.field(mode).column_name(), "id");
    }

    #[test]
    fn test_parse_round_trips_as_str() {
        for column in [
            SortColumn::Registered,
            SortColumn::LastUpdated,
            SortColumn::BlogName,
            SortColumn::BlogId,
        ] {
            assert_eq!(SortColumn::parse(column.as_str()), Some(column));
        }
    }
}
