//! `decant migrate` — run the reconciliation pipeline and write the archive.
//!
//! Also hosts `decant inspect`, which stops after projection and reports
//! counts instead of writing anything.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use decant_engine::model::{AuthorityIndex, MigrateResult, PlannedDocument};
use decant_engine::{canonical, export, project};
use decant_engine::{LinkPolicy, MigrateConfig, MigrateInput};

use crate::CliError;

#[allow(clippy::too_many_arguments)]
pub fn cmd_migrate(
    export_path: PathBuf,
    dates: PathBuf,
    out: PathBuf,
    link_host: Option<String>,
    legacy_link_parity: bool,
    json: bool,
    report: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    // 1. Read both inputs up front; the engine never touches the filesystem.
    let input = MigrateInput {
        export_xml: read_input(&export_path)?,
        authority: read_input(&dates)?,
    };

    let config = MigrateConfig {
        link_host,
        link_policy: if legacy_link_parity {
            LinkPolicy::LegacyParity
        } else {
            LinkPolicy::Continue
        },
    };

    // 2. Run the pipeline.
    let result =
        decant_engine::run(&config, &input).map_err(|e| CliError::parse(e.to_string()))?;

    // 3. Surface data problems before touching the sink.
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    // 4. Destructive sink: the output directory is recreated from scratch.
    write_archive(&out, &result.documents, quiet)?;

    // 5. Reports.
    if json || report.is_some() {
        let text = serde_json::to_string_pretty(&report_json(&result))
            .map_err(|e| CliError::io(format!("cannot encode report: {e}")))?;
        if json {
            println!("{text}");
        }
        if let Some(path) = report.as_ref() {
            fs::write(path, format!("{text}\n"))
                .map_err(|e| CliError::io(format!("cannot write {}: {}", path.display(), e)))?;
        }
    }

    if !quiet {
        eprintln!(
            "Done: {} posts written to {} ({} superseded, {} links rewritten, {} warnings)",
            result.summary.posts,
            out.display(),
            result.summary.superseded,
            result.summary.links_rewritten,
            result.warnings.len(),
        );
    }

    Ok(())
}

pub fn cmd_inspect(export_path: PathBuf) -> Result<(), CliError> {
    let xml = read_input(&export_path)?;
    let records = export::parse_export(&xml).map_err(|e| CliError::parse(e.to_string()))?;
    let projected = project::project_records(&records);

    // Class histogram, BTreeMap for stable output order.
    let mut classes: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &records {
        *classes.entry(record.class.as_str()).or_insert(0) += 1;
    }

    println!("records: {}", records.len());
    for (class, count) in &classes {
        println!("  {class}: {count}");
    }
    println!("drafts: {}", projected.posts.len());
    println!("bodies: {}", projected.bodies.len());
    println!("unrecognized: {}", projected.unrecognized);

    // What a migrate run would keep, without running one.
    let mut warnings = Vec::new();
    let deduped = canonical::canonicalize(
        &projected.posts,
        &projected.bodies,
        &AuthorityIndex::default(),
        &mut warnings,
    );
    println!("canonical posts: {}", deduped.posts.len());

    Ok(())
}

fn read_input(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))
}

/// Recreate `out` from scratch and write every planned document. Stale
/// files never survive a run; the directory mirrors exactly one plan.
fn write_archive(out: &Path, documents: &[PlannedDocument], quiet: bool) -> Result<(), CliError> {
    match fs::remove_dir_all(out) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(CliError::io(format!(
                "cannot clear {}: {}",
                out.display(),
                e,
            )))
        }
    }
    fs::create_dir_all(out)
        .map_err(|e| CliError::io(format!("cannot create {}: {}", out.display(), e)))?;

    for doc in documents {
        let path = out.join(&doc.file_name);
        fs::write(&path, &doc.content)
            .map_err(|e| CliError::io(format!("cannot write {}: {}", path.display(), e)))?;
        if !quiet {
            eprintln!("  {}", doc.file_name);
        }
    }

    Ok(())
}

fn report_json(result: &MigrateResult) -> serde_json::Value {
    serde_json::json!({
        "meta": result.meta,
        "summary": result.summary,
        "warnings": result.warnings,
        "files": result.documents.iter().map(|d| d.file_name.as_str()).collect::<Vec<_>>(),
    })
}
