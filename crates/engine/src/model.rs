use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// What to do when a legacy link token has no authority date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPolicy {
    /// Leave the link as-is, record a warning, keep scanning the body.
    Continue,
    /// Stop rewriting the body at the first unresolved token, leaving any
    /// later links untouched. Reproduces the behavior of the system this
    /// pipeline replaces.
    LegacyParity,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self::Continue
    }
}

impl std::fmt::Display for LinkPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::LegacyParity => write!(f, "legacy-parity"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MigrateConfig {
    /// Base URL of the legacy host whose `/x/{token}` links get rewritten.
    /// `None` disables link rewriting entirely.
    pub link_host: Option<String>,
    pub link_policy: LinkPolicy,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Pre-loaded input text. Both files are read to completion before the run.
pub struct MigrateInput {
    pub export_xml: String,
    pub authority: String,
}

/// One `name`/value pair from an export object. `ref_id` is the nested
/// `<id>` element, present when the property references another record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub ref_id: Option<String>,
    pub text: String,
}

/// A generic node of the entity export. `class` discriminates the semantic
/// type; properties keep document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    pub id: String,
    pub class: String,
    pub properties: Vec<Property>,
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Post metadata extracted from a `BlogPost` record. `body_ref` is the
/// record's own id; body fragments point back at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub body_ref: String,
    pub created: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Authority
// ---------------------------------------------------------------------------

/// Title- and token-keyed date overrides built from the authority source.
#[derive(Debug, Clone, Default)]
pub struct AuthorityIndex {
    pub title_dates: HashMap<String, NaiveDate>,
    pub token_dates: HashMap<String, NaiveDate>,
}

// ---------------------------------------------------------------------------
// Canonicalization + Output
// ---------------------------------------------------------------------------

/// A fully reconciled post: deduplicated, date-resolved, body joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPost {
    pub title: String,
    pub body: String,
    pub published: NaiveDate,
}

/// One output file as planned by the writer. `content` is the front-matter
/// block plus the body, verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDocument {
    pub file_name: String,
    pub title: String,
    pub published: NaiveDate,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Recoverable data problems. The run continues with a degraded value;
/// the CLI prints these to stderr and they ride along in the JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
    MalformedCreationDate { id: String, value: String },
    MissingBody { title: String },
    UnresolvedLinkToken { title: String, token: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedCreationDate { id, value } => {
                write!(f, "object '{id}': malformed creationDate '{value}', using epoch")
            }
            Self::MissingBody { title } => {
                write!(f, "post '{title}': no body content found, emitting empty body")
            }
            Self::UnresolvedLinkToken { title, token } => {
                write!(f, "post '{title}': link token '{token}' has no authority date, link left as-is")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrateSummary {
    /// Object records decoded from the export.
    pub records: usize,
    /// Post drafts projected (before dedup).
    pub drafts: usize,
    /// Drafts merged away because another draft shared the title.
    pub superseded: usize,
    /// Drafts discarded for having an empty title.
    pub dropped_untitled: usize,
    /// Canonical posts emitted.
    pub posts: usize,
    pub links_rewritten: usize,
    pub links_unresolved: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrateMeta {
    pub engine_version: String,
    pub run_at: String,
    pub link_policy: LinkPolicy,
}

pub struct MigrateResult {
    pub meta: MigrateMeta,
    pub summary: MigrateSummary,
    pub documents: Vec<PlannedDocument>,
    pub warnings: Vec<Warning>,
}
