// Deduplication + canonicalization — merge drafts by title, resolve the
// publish date, join each survivor to its body fragment.

use std::collections::HashMap;

use crate::model::{AuthorityIndex, CanonicalPost, PostDraft, Warning};

/// Canonical posts in first-encounter title order, plus the counts the
/// run summary reports.
#[derive(Debug, Default)]
pub struct CanonicalOutput {
    pub posts: Vec<CanonicalPost>,
    pub superseded: usize,
    pub dropped_untitled: usize,
}

/// Merge drafts sharing a title, then resolve each survivor.
///
/// Merge rule: a strictly later `created` supersedes; exact ties keep the
/// first-seen draft. Empty titles are never retained. Survivors keep the
/// position where their title was first encountered, so output order is
/// stable across runs.
///
/// Resolution: `published` is the authority date when the title has an
/// override, else the draft's creation date. A missing body fragment
/// records a warning and leaves the body empty.
pub fn canonicalize(
    drafts: &[PostDraft],
    bodies: &HashMap<String, String>,
    authority: &AuthorityIndex,
    warnings: &mut Vec<Warning>,
) -> CanonicalOutput {
    let mut out = CanonicalOutput::default();

    let mut retained: Vec<&PostDraft> = Vec::new();
    let mut by_title: HashMap<&str, usize> = HashMap::new();

    for draft in drafts {
        if draft.title.is_empty() {
            out.dropped_untitled += 1;
            continue;
        }
        match by_title.get(draft.title.as_str()) {
            Some(&slot) => {
                out.superseded += 1;
                if draft.created > retained[slot].created {
                    retained[slot] = draft;
                }
            }
            None => {
                by_title.insert(draft.title.as_str(), retained.len());
                retained.push(draft);
            }
        }
    }

    for draft in retained {
        let published = match authority.title_dates.get(&draft.title) {
            Some(&d) => d,
            None => draft.created.date(),
        };

        let body = match bodies.get(&draft.body_ref) {
            Some(text) => text.clone(),
            None => {
                warnings.push(Warning::MissingBody {
                    title: draft.title.clone(),
                });
                String::new()
            }
        };

        out.posts.push(CanonicalPost {
            title: draft.title.clone(),
            body,
            published,
        });
    }

    out
}
