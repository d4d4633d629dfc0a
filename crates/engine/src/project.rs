// Record projection — classify generic export records into typed views.
//
// One classification step, one closed variant set. No later stage goes
// back to raw properties.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::model::{ObjectRecord, PostDraft, Warning};

const CREATION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What a single export record means to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Post(PostDraft),
    Body { id: String, text: String },
    Unrecognized,
}

/// Everything projected from one export: drafts in encounter order, body
/// fragments keyed by their content reference.
#[derive(Debug, Default)]
pub struct ProjectOutput {
    pub posts: Vec<PostDraft>,
    pub bodies: HashMap<String, String>,
    pub unrecognized: usize,
    pub warnings: Vec<Warning>,
}

/// Project a full export. Duplicate body keys keep the last fragment in
/// document order.
pub fn project_records(records: &[ObjectRecord]) -> ProjectOutput {
    let mut out = ProjectOutput::default();
    for record in records {
        match project_record(record, &mut out.warnings) {
            Projection::Post(draft) => out.posts.push(draft),
            Projection::Body { id, text } => {
                out.bodies.insert(id, text);
            }
            Projection::Unrecognized => out.unrecognized += 1,
        }
    }
    out
}

/// Classify one record by its class discriminant.
///
/// A malformed creationDate is recoverable: the draft keeps the Unix epoch
/// and the problem is reported through `warnings`.
pub fn project_record(record: &ObjectRecord, warnings: &mut Vec<Warning>) -> Projection {
    match record.class.as_str() {
        "BlogPost" => Projection::Post(project_post(record, warnings)),
        "BodyContent" => project_body(record),
        _ => Projection::Unrecognized,
    }
}

fn project_post(record: &ObjectRecord, warnings: &mut Vec<Warning>) -> PostDraft {
    let mut title = String::new();
    let mut created = NaiveDateTime::default();

    // Repeated properties: last occurrence in document order wins.
    for prop in &record.properties {
        match prop.name.as_str() {
            "title" => {
                // Double quotes would break the quoted front-matter field.
                title = prop.text.replace('"', "'");
            }
            "creationDate" => match NaiveDateTime::parse_from_str(&prop.text, CREATION_DATE_FORMAT)
            {
                Ok(dt) => created = dt,
                Err(_) => {
                    created = NaiveDateTime::default();
                    warnings.push(Warning::MalformedCreationDate {
                        id: record.id.clone(),
                        value: prop.text.clone(),
                    });
                }
            },
            _ => {}
        }
    }

    PostDraft {
        title,
        body_ref: record.id.clone(),
        created,
    }
}

fn project_body(record: &ObjectRecord) -> Projection {
    let mut id = String::new();
    let mut text = String::new();

    for prop in &record.properties {
        match prop.name.as_str() {
            "body" => text = prop.text.clone(),
            "content" => {
                if let Some(ref r) = prop.ref_id {
                    id = r.clone();
                }
            }
            _ => {}
        }
    }

    Projection::Body { id, text }
}
