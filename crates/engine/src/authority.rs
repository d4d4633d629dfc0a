// Authority source — line-oriented publish-date overrides.
//
// Line shape: title:date:<reserved>:legacyLinkToken[:ignored...]
// One pass builds two indices: title → date and link token → date.

use chrono::NaiveDate;

use crate::error::EngineError;
use crate::model::AuthorityIndex;

const AUTHORITY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Build the override indices from the authority source.
///
/// Blank lines are skipped. A non-blank line with fewer than four fields,
/// or a date that does not parse, is fatal: silently dropping an override
/// would corrupt published dates downstream.
pub fn build_index(text: &str) -> Result<AuthorityIndex, EngineError> {
    let mut index = AuthorityIndex::default();

    for (n, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < 4 {
            return Err(EngineError::AuthorityLine {
                line: n + 1,
                content: line.to_string(),
            });
        }

        let date = NaiveDate::parse_from_str(fields[1], AUTHORITY_DATE_FORMAT).map_err(|_| {
            EngineError::AuthorityDate {
                line: n + 1,
                value: fields[1].to_string(),
            }
        })?;

        index.title_dates.insert(fields[0].to_string(), date);
        index.token_dates.insert(fields[3].to_string(), date);
    }

    Ok(index)
}
