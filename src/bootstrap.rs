use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use crate::{
    corpus, document,
    doc_id::{self, DocumentId},
    error::Result,
    providers::Embedder,
    store::{StoredDocument, VectorDb},
    walker,
};

/// Outcome of one warm-up pass over the news tree.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BootstrapStats {
    /// Documents embedded and written this pass.
    pub embedded: usize,
    /// Documents skipped because their content fingerprint was unchanged.
    pub skipped: usize,
    /// Stale store entries removed because the file no longer exists.
    pub pruned: usize,
}

/// Warm the embedding store from the news-article tree.
///
/// Every file under `news_root` is parsed for the five header markers and
/// embedded. Idempotency is keyed on a per-document content fingerprint:
/// unchanged documents are skipped, changed ones re-embedded, and store
/// entries whose files have disappeared are pruned. Safe to re-run after a
/// partial failure.
pub fn warm_store(
    news_root: &Path,
    source_label: &str,
    store: &VectorDb,
    embedder: &dyn Embedder,
) -> Result<BootstrapStats> {
    let files = walker::discover_files(news_root, None)?;
    info!(files = files.len(), "bootstrapping embedding store");

    let mut stats = BootstrapStats::default();
    let mut live_ids = HashSet::new();
    let mut pending: Vec<(u64, StoredDocument)> = Vec::new();

    for file in &files {
        let rel_path = file.relative_path.to_string_lossy();
        let doc_id = DocumentId::new(source_label, &rel_path);
        live_ids.insert(doc_id.numeric);

        let raw = corpus::read_text(&file.absolute_path)?;
        let fingerprint = doc_id::content_fingerprint(&raw);

        if store.fingerprint(doc_id.numeric)? == Some(fingerprint) {
            stats.skipped += 1;
            continue;
        }

        let article = document::parse(&raw);
        debug!(id = %doc_id, title = %article.meta.title, "embedding document");
        pending.push((
            doc_id.numeric,
            StoredDocument {
                meta: article.meta,
                content: raw,
                fingerprint,
            },
        ));
    }

    if !pending.is_empty() {
        let texts: Vec<&str> =
            pending.iter().map(|(_, d)| d.content.as_str()).collect();
        let vectors = embedder.embed_batch(&texts)?;

        for ((doc_id, document), vector) in pending.iter().zip(&vectors) {
            store.upsert(*doc_id, document, vector)?;
            stats.embedded += 1;
        }
    }

    // Prune entries whose files no longer exist on disk.
    let stale: Vec<u64> = store
        .list_ids()?
        .into_iter()
        .filter(|id| !live_ids.contains(id))
        .collect();
    store.batch_remove(&stale)?;
    stats.pruned = stale.len();

    info!(
        embedded = stats.embedded,
        skipped = stats.skipped,
        pruned = stats.pruned,
        "bootstrap complete"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::stubs::StubEmbedder;

    fn news_tree() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("a.txt"),
            "SOURCE: The Abila Post\nTITLE: First\n\nBody one.",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("b.txt"),
            "SOURCE: Homeland Illumination\nTITLE: Second\n\nBody two.",
        )
        .unwrap();
        tmp
    }

    fn store() -> (tempfile::TempDir, VectorDb) {
        let tmp = tempfile::tempdir().unwrap();
        let db = VectorDb::open(&tmp.path().join("vectors.redb")).unwrap();
        (tmp, db)
    }

    #[test]
    fn first_run_embeds_everything() {
        let news = news_tree();
        let (_tmp, db) = store();
        let embedder = StubEmbedder { dimensions: 4 };

        let stats = warm_store(news.path(), "news", &db, &embedder).unwrap();
        assert_eq!(stats.embedded, 2);
        assert_eq!(stats.skipped, 0);
        assert_eq!(db.list_ids().unwrap().len(), 2);
    }

    #[test]
    fn second_run_is_idempotent() {
        let news = news_tree();
        let (_tmp, db) = store();
        let embedder = StubEmbedder { dimensions: 4 };

        warm_store(news.path(), "news", &db, &embedder).unwrap();
        let stats = warm_store(news.path(), "news", &db, &embedder).unwrap();
        assert_eq!(stats.embedded, 0);
        assert_eq!(stats.skipped, 2);
    }

    #[test]
    fn changed_content_is_reembedded() {
        let news = news_tree();
        let (_tmp, db) = store();
        let embedder = StubEmbedder { dimensions: 4 };

        warm_store(news.path(), "news", &db, &embedder).unwrap();
        std::fs::write(
            news.path().join("a.txt"),
            "SOURCE: The Abila Post\nTITLE: First\n\nRevised body.",
        )
        .unwrap();

        let stats = warm_store(news.path(), "news", &db, &embedder).unwrap();
        assert_eq!(stats.embedded, 1);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn deleted_files_are_pruned() {
        let news = news_tree();
        let (_tmp, db) = store();
        let embedder = StubEmbedder { dimensions: 4 };

        warm_store(news.path(), "news", &db, &embedder).unwrap();
        std::fs::remove_file(news.path().join("b.txt")).unwrap();

        let stats = warm_store(news.path(), "news", &db, &embedder).unwrap();
        assert_eq!(stats.pruned, 1);
        assert_eq!(db.list_ids().unwrap().len(), 1);
    }

    #[test]
    fn stored_metadata_comes_from_headers() {
        let news = news_tree();
        let (_tmp, db) = store();
        let embedder = StubEmbedder { dimensions: 4 };

        warm_store(news.path(), "news", &db, &embedder).unwrap();
        let records = db
            .fetch_by_sources(&["The Abila Post".to_string()])
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].document.meta.title, "First");
        assert_eq!(records[0].vector.len(), 4);
    }
}
