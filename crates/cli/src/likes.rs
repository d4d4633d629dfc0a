//! `decant likes` — rank a live space's blog posts by like count.
//!
//! Sequential pager over the legacy content API. One request at a time,
//! no retries: the walker is a one-shot archival probe and the first
//! failure aborts the run.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::token;
use crate::CliError;

// ── Constants ───────────────────────────────────────────────────────

const PAGE_PATH: &str = "/rest/api/content/";
const USER_AGENT: &str = concat!("decant/", env!("CARGO_PKG_VERSION"));

// ── Walker records ──────────────────────────────────────────────────

/// One blog entry as collected from the content API. `published` stays
/// empty when the webui link carries no date path.
#[derive(Debug, Serialize)]
pub struct BlogEntry {
    pub id: String,
    pub title: String,
    pub likes: usize,
    pub published: String,
    pub permalink: String,
}

// ── Likes client ────────────────────────────────────────────────────

pub struct LikesClient {
    http: reqwest::blocking::Client,
    token: String,
    base_url: String,
}

impl LikesClient {
    pub fn new(host: &str, token: String) -> Self {
        Self::with_base_url(token, host.trim_end_matches('/').to_string())
    }

    pub fn with_base_url(token: String, base_url: String) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            token,
            base_url,
        }
    }

    /// GET one JSON document, bearer-authenticated.
    fn get_json(&self, url: &str) -> Result<serde_json::Value, CliError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| CliError::fetch(format!("request to {url} failed: {e}")))?;

        let status = resp.status().as_u16();
        if status == 401 || status == 403 {
            return Err(CliError::fetch(format!("auth failed ({status}) for {url}"))
                .with_hint(format!("check --token / {}", token::TOKEN_ENV)));
        }
        if status >= 400 {
            return Err(CliError::fetch(format!("HTTP {status} from {url}")));
        }

        let text = resp
            .text()
            .map_err(|e| CliError::fetch(format!("cannot read response from {url}: {e}")))?;
        serde_json::from_str(&text)
            .map_err(|e| CliError::fetch(format!("bad JSON from {url}: {e}")))
    }

    /// Collect every blog post in the space. Pages are followed through
    /// `_links.base` + `_links.next` while they come back full
    /// (`limit == size`); a short page ends the walk.
    pub fn walk_space(&self, space: &str, quiet: bool) -> Result<Vec<BlogEntry>, CliError> {
        let mut entries = Vec::new();
        let mut url = format!(
            "{}{}?spaceKey={}&type=blogpost",
            self.base_url, PAGE_PATH, space,
        );
        let mut page = 0u32;
        let stderr_tty = atty::is(atty::Stream::Stderr);
        let show_progress = !quiet && stderr_tty;

        loop {
            page += 1;
            let body = self.get_json(&url)?;

            let results = body["results"].as_array().ok_or_else(|| {
                CliError::fetch(format!("content response missing 'results' array ({url})"))
            })?;

            if show_progress {
                eprintln!("  page {}: {} posts", page, results.len());
            }

            let base = body["_links"]["base"]
                .as_str()
                .unwrap_or(&self.base_url)
                .to_string();
            for item in results {
                entries.push(self.collect_entry(item, &base)?);
            }

            let limit = body["limit"].as_u64().unwrap_or(0);
            let size = body["size"].as_u64().unwrap_or(0);
            match body["_links"]["next"].as_str() {
                Some(next) if limit > 0 && limit == size => {
                    url = format!("{base}{next}");
                }
                _ => break,
            }
        }

        Ok(entries)
    }

    /// One entry: read id/title, count its likes, recover the publish
    /// date from the webui link.
    fn collect_entry(
        &self,
        item: &serde_json::Value,
        base: &str,
    ) -> Result<BlogEntry, CliError> {
        let id = item["id"].as_str().unwrap_or("").to_string();
        let title = item["title"].as_str().unwrap_or("").to_string();
        let webui = item["_links"]["webui"].as_str().unwrap_or("").to_string();

        let likes_body = self.get_json(&format!(
            "{}/rest/likes/1.0/content/{}/likes",
            self.base_url, id,
        ))?;
        let likes = likes_body["likes"].as_array().map(|a| a.len()).unwrap_or(0);

        Ok(BlogEntry {
            id,
            title,
            likes,
            published: published_from_webui(&webui),
            permalink: format!("{base}{webui}"),
        })
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Pull `YYYY-MM-DD` out of a `/display/{space}/{yyyy}/{mm}/{dd}/…` webui
/// path. Pages without a date segment come back empty, as do impossible
/// dates.
fn published_from_webui(webui: &str) -> String {
    // Fixed shape, valid by construction.
    let re = Regex::new(r"/(\d{4})/(\d{2})/(\d{2})/").unwrap();
    let candidate = match re.captures(webui) {
        Some(caps) => format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]),
        None => return String::new(),
    };
    match NaiveDate::parse_from_str(&candidate, "%Y-%m-%d") {
        Ok(date) => date.to_string(),
        Err(_) => String::new(),
    }
}

/// Human listing on stdout, or CSV when `--out` is given. Returns the
/// output label for the progress message.
fn write_entries(entries: &[BlogEntry], out: &Option<PathBuf>) -> Result<String, CliError> {
    match out {
        Some(path) => {
            let f = std::fs::File::create(path).map_err(|e| {
                CliError::io(format!("cannot create {}: {}", path.display(), e))
            })?;
            let mut csv_writer = csv::WriterBuilder::new()
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(std::io::BufWriter::new(f));

            // Always write the header, even with zero entries
            if entries.is_empty() {
                csv_writer
                    .write_record(["id", "title", "likes", "published", "permalink"])
                    .map_err(|e| CliError::io(format!("CSV write error: {}", e)))?;
            }
            for entry in entries {
                csv_writer
                    .serialize(entry)
                    .map_err(|e| CliError::io(format!("CSV write error: {}", e)))?;
            }
            csv_writer
                .flush()
                .map_err(|e| CliError::io(format!("CSV flush error: {}", e)))?;
            Ok(path.display().to_string())
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            for entry in entries {
                let published = if entry.published.is_empty() {
                    "-"
                } else {
                    &entry.published
                };
                writeln!(
                    handle,
                    "{}  {:10}  {:>4}  {}",
                    entry.title, published, entry.likes, entry.permalink,
                )
                .map_err(|e| CliError::io(e.to_string()))?;
            }
            Ok("stdout".to_string())
        }
    }
}

// ── Entry point ─────────────────────────────────────────────────────

pub fn cmd_likes(
    host: String,
    space: String,
    token_flag: Option<String>,
    token_file: String,
    out: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    // 1. Resolve the bearer token.
    let bearer = token::resolve_token(token_flag, &token_file)?;

    let client = LikesClient::new(&host, bearer);

    let stderr_tty = atty::is(atty::Stream::Stderr);
    let show_progress = !quiet && stderr_tty;
    if show_progress {
        eprintln!("Walking space {} on {}...", space, host);
    }

    // 2. Walk the space.
    let mut entries = client.walk_space(&space, quiet)?;

    // 3. Sort by like count, ascending. Stable: equal counts keep API order.
    entries.sort_by_key(|e| e.likes);

    // 4. Emit.
    let out_label = write_entries(&entries, &out)?;
    if show_progress {
        eprintln!("Done: {} posts written to {}", entries.len(), out_label);
    }

    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────
