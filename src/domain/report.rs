//! Generated customer reports and their stored facets.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::customer::Customer;
use crate::domain::types::TypeConstraintError;

/// Storage prefix under which report facets live.
pub const REPORTS_PREFIX: &str = "reportes/";

const ID_PREFIX: &str = "reporte_";

/// Stored representation of one report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFacet {
    /// Rendered document, always present.
    Pdf,
    /// Snapshot of the customers the document was rendered from.
    Json,
}

impl ReportFacet {
    pub const fn extension(self) -> &'static str {
        match self {
            ReportFacet::Pdf => "pdf",
            ReportFacet::Json => "json",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            ReportFacet::Pdf => "application/pdf",
            ReportFacet::Json => "application/json",
        }
    }
}

/// Identifier shared by both facets of a report: `reporte_<epoch-millis>`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ReportId(i64);

impl ReportId {
    #[must_use]
    pub fn from_timestamp_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Epoch milliseconds at which the report was generated.
    pub const fn timestamp_millis(&self) -> i64 {
        self.0
    }

    /// Full storage key of the given facet.
    pub fn object_key(&self, facet: ReportFacet) -> String {
        format!("{REPORTS_PREFIX}{self}.{}", facet.extension())
    }

    /// Splits a storage key such as `reportes/reporte_1700000000000.pdf`.
    ///
    /// Returns `None` for keys that are not report facets.
    pub fn parse_object_key(key: &str) -> Option<(Self, ReportFacet)> {
        let name = key.strip_prefix(REPORTS_PREFIX)?;
        let (stem, extension) = name.rsplit_once('.')?;
        let facet = match extension {
            "pdf" => ReportFacet::Pdf,
            "json" => ReportFacet::Json,
            _ => return None,
        };
        stem.parse().ok().map(|id| (id, facet))
    }
}

impl Display for ReportId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{ID_PREFIX}{}", self.0)
    }
}

/// Digits only, without leading zeros, so that parsing and display round-trip.
fn is_canonical_millis(millis: &str) -> bool {
    !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && (millis == "0" || !millis.starts_with('0'))
}

impl std::str::FromStr for ReportId {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(ID_PREFIX)
            .filter(|millis| is_canonical_millis(millis))
            .and_then(|millis| millis.parse::<i64>().ok())
            .map(Self)
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

impl TryFrom<String> for ReportId {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReportId> for String {
    fn from(value: ReportId) -> Self {
        value.to_string()
    }
}

/// One generated report as shown on the reports board.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ReportCard {
    pub id: ReportId,
    /// Object name of the PDF facet, offered as download file name.
    pub pdf_name: String,
    pub pdf_url: String,
    /// Customers read back from the JSON facet; empty when it is missing.
    pub customers: Vec<Customer>,
}
