// Output planning — chronological ordering, collision-free file names,
// front-matter rendering. The CLI owns the actual directory sink.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::model::{CanonicalPost, PlannedDocument};

/// Hands out unique `date[_n].html` names for one run.
#[derive(Debug, Default)]
pub struct NameAllocator {
    taken: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bare `{date}.html`, or the first free `{date}_{n}.html`.
    pub fn allocate(&mut self, date: NaiveDate) -> String {
        let base = format!("{date}.html");
        if self.taken.insert(base.clone()) {
            return base;
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{date}_{n}.html");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Sort posts by publish date (stable: ties keep encounter order) and
/// plan one document per post, suffixing colliding names in sort order.
pub fn plan_documents(
    posts: &[CanonicalPost],
    allocator: &mut NameAllocator,
) -> Vec<PlannedDocument> {
    let mut ordered: Vec<&CanonicalPost> = posts.iter().collect();
    ordered.sort_by_key(|p| p.published);

    ordered
        .into_iter()
        .map(|post| PlannedDocument {
            file_name: allocator.allocate(post.published),
            title: post.title.clone(),
            published: post.published,
            content: render_document(post),
        })
        .collect()
}

/// Fixed front-matter block, then the body verbatim. No separator line.
fn render_document(post: &CanonicalPost) -> String {
    format!(
        "---\ntitle: \"{}\"\ndate: {}\ndraft: false\n---\n{}",
        post.title, post.published, post.body
    )
}
