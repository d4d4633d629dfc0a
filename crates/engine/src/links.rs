// Legacy link rewriting — scan bodies for `{host}/x/{token}` links and
// point them at the canonical `../{date}` address.

use std::collections::HashMap;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::{LinkPolicy, Warning};

/// One body's rewrite result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub body: String,
    pub rewritten: usize,
    pub unresolved: usize,
}

/// Compiled scanner for one legacy host.
pub struct LinkRewriter {
    pattern: Regex,
    policy: LinkPolicy,
}

impl LinkRewriter {
    pub fn new(host: &str, policy: LinkPolicy) -> Self {
        // Escaped host + fixed tail: the pattern is always valid.
        let pattern = Regex::new(&format!(r"{}/x/([\w-]+)", regex::escape(host))).unwrap();
        Self { pattern, policy }
    }

    /// Rewrite every legacy link whose token has an authority date.
    ///
    /// An unresolved token records a warning. Under `Continue` scanning
    /// proceeds past it; under `LegacyParity` rewriting of this body stops
    /// there and later occurrences are left untouched.
    pub fn rewrite(
        &self,
        title: &str,
        body: &str,
        token_dates: &HashMap<String, NaiveDate>,
        warnings: &mut Vec<Warning>,
    ) -> RewriteOutcome {
        let mut rewritten = 0;
        let mut unresolved = 0;
        let mut stopped = false;

        let out = self.pattern.replace_all(body, |caps: &regex::Captures| {
            if stopped {
                return caps[0].to_string();
            }
            let token = &caps[1];
            match token_dates.get(token) {
                Some(date) => {
                    rewritten += 1;
                    format!("../{date}")
                }
                None => {
                    unresolved += 1;
                    warnings.push(Warning::UnresolvedLinkToken {
                        title: title.to_string(),
                        token: token.to_string(),
                    });
                    if self.policy == LinkPolicy::LegacyParity {
                        stopped = true;
                    }
                    caps[0].to_string()
                }
            }
        });

        RewriteOutcome {
            body: out.into_owned(),
            rewritten,
            unresolved,
        }
    }
}
