use crate::authority;
use crate::canonical;
use crate::error::EngineError;
use crate::export;
use crate::links::LinkRewriter;
use crate::model::{MigrateConfig, MigrateInput, MigrateMeta, MigrateResult, MigrateSummary};
use crate::output::{plan_documents, NameAllocator};
use crate::project;

/// Run the full pipeline: parse, project, index the authority source,
/// dedup, rewrite links, plan output. One deterministic pass; the only
/// fatal errors are export and authority parse failures.
pub fn run(config: &MigrateConfig, input: &MigrateInput) -> Result<MigrateResult, EngineError> {
    let records = export::parse_export(&input.export_xml)?;
    let authority = authority::build_index(&input.authority)?;

    let projected = project::project_records(&records);
    let mut warnings = projected.warnings;
    let drafts = projected.posts;
    let bodies = projected.bodies;

    let deduped = canonical::canonicalize(&drafts, &bodies, &authority, &mut warnings);
    let mut posts = deduped.posts;

    let mut links_rewritten = 0;
    let mut links_unresolved = 0;
    if let Some(host) = config.link_host.as_deref().filter(|h| !h.is_empty()) {
        let rewriter = LinkRewriter::new(host, config.link_policy);
        for post in &mut posts {
            let outcome =
                rewriter.rewrite(&post.title, &post.body, &authority.token_dates, &mut warnings);
            links_rewritten += outcome.rewritten;
            links_unresolved += outcome.unresolved;
            post.body = outcome.body;
        }
    }

    let documents = plan_documents(&posts, &mut NameAllocator::new());

    let summary = MigrateSummary {
        records: records.len(),
        drafts: drafts.len(),
        superseded: deduped.superseded,
        dropped_untitled: deduped.dropped_untitled,
        posts: posts.len(),
        links_rewritten,
        links_unresolved,
    };

    Ok(MigrateResult {
        meta: MigrateMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            link_policy: config.link_policy,
        },
        summary,
        documents,
        warnings,
    })
}
