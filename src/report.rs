use ndarray::{Array1, Array2, Axis};
use serde::Serialize;
use tracing::info;

use crate::{
    document::ArticleMeta,
    error::{Error, Result},
    store::VectorDb,
};

/// Iterations of power iteration per principal component.
const POWER_ITERATIONS: usize = 50;

/// One projected document in the scatter plot.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterPoint {
    pub x: f32,
    pub y: f32,
    pub meta: ArticleMeta,
    pub content: String,
}

/// The similarity-report payload: projected points plus axis titles that
/// carry the share of variance explained by each component.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityReport {
    pub data: Vec<ScatterPoint>,
    #[serde(rename = "x-axis-title")]
    pub x_axis_title: String,
    #[serde(rename = "y-axis-title")]
    pub y_axis_title: String,
}

/// Generate the similarity report for the selected sources.
///
/// Fetches every stored document whose `source` matches (OR filter),
/// projects the embedding vectors onto the top two principal components,
/// and returns per-document coordinates with metadata and content. An
/// empty selection returns an empty report with zero-labeled axes; fewer
/// than two matching documents is a reduction error rather than a shape
/// panic further down.
pub fn generate(
    store: &VectorDb,
    sources: &[String],
) -> Result<SimilarityReport> {
    if sources.is_empty() {
        return Ok(SimilarityReport {
            data: Vec::new(),
            x_axis_title: axis_title(1, 0.0),
            y_axis_title: axis_title(2, 0.0),
        });
    }

    let records = store.fetch_by_sources(sources)?;
    info!(sources = sources.len(), documents = records.len(), "similarity report");
    if records.len() < 2 {
        return Err(Error::Reduction(format!(
            "need at least 2 documents to project, found {}",
            records.len()
        )));
    }

    let dimension = records[0].vector.len();
    if dimension < 2 {
        return Err(Error::Reduction(format!(
            "embedding dimension {dimension} is too small to project"
        )));
    }
    if records.iter().any(|r| r.vector.len() != dimension) {
        return Err(Error::Reduction(
            "stored embeddings have mixed dimensions".into(),
        ));
    }

    let mut matrix = Array2::zeros((records.len(), dimension));
    for (i, record) in records.iter().enumerate() {
        matrix
            .row_mut(i)
            .assign(&Array1::from_vec(record.vector.clone()));
    }

    let pca = Pca2::fit(&matrix)?;
    let projected = pca.transform(&matrix);

    let data = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| ScatterPoint {
            x: projected[[i, 0]],
            y: projected[[i, 1]],
            meta: record.document.meta,
            content: record.document.content,
        })
        .collect();

    Ok(SimilarityReport {
        data,
        x_axis_title: axis_title(1, pca.explained[0]),
        y_axis_title: axis_title(2, pca.explained[1]),
    })
}

fn axis_title(component: usize, explained_ratio: f32) -> String {
    format!("PC{component} ({:.2}% variance)", explained_ratio * 100.0)
}

/// Two-component principal-component projection fitted by power iteration
/// with deflation over the covariance matrix.
#[derive(Debug)]
pub struct Pca2 {
    mean: Array1<f32>,
    /// Row-per-component projection matrix (2 x dimension).
    components: Array2<f32>,
    /// Fraction of total variance explained by each component.
    pub explained: [f32; 2],
}

impl Pca2 {
    /// Fit on an (n_samples x dimension) matrix, n_samples >= 2.
    pub fn fit(data: &Array2<f32>) -> Result<Self> {
        let (n_samples, dimension) = data.dim();
        if n_samples < 2 || dimension < 2 {
            return Err(Error::Reduction(format!(
                "cannot fit 2-component projection on {n_samples}x{dimension} data"
            )));
        }

        let mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| Error::Reduction("empty input matrix".into()))?;
        let centered = data - &mean.clone().insert_axis(Axis(0));

        let cov = centered.t().dot(&centered) / (n_samples as f32 - 1.0);
        let total_variance: f32 = cov.diag().sum();

        let mut components = Array2::zeros((2, dimension));
        let mut explained = [0.0f32; 2];
        let mut deflated = cov;

        for i in 0..2 {
            let (eigenvector, eigenvalue) = dominant_eigenpair(&deflated);
            components.row_mut(i).assign(&eigenvector);
            if total_variance > f32::EPSILON {
                explained[i] = (eigenvalue / total_variance).max(0.0);
            }

            // Deflate: A' = A - lambda * v * v^T
            let v_col = eigenvector.clone().insert_axis(Axis(1));
            let v_row = eigenvector.insert_axis(Axis(0));
            deflated = &deflated - &(v_col.dot(&v_row) * eigenvalue);
        }

        Ok(Self {
            mean,
            components,
            explained,
        })
    }

    /// Project (n x dimension) data onto the fitted components, yielding
    /// an (n x 2) coordinate matrix.
    pub fn transform(&self, data: &Array2<f32>) -> Array2<f32> {
        let centered = data - &self.mean.clone().insert_axis(Axis(0));
        centered.dot(&self.components.t())
    }
}

/// Dominant eigenvector/eigenvalue of a symmetric matrix via power
/// iteration with a deterministic start vector.
fn dominant_eigenpair(matrix: &Array2<f32>) -> (Array1<f32>, f32) {
    let dimension = matrix.ncols();
    let mut v = Array1::from_elem(dimension, 1.0f32);
    let norm = v.dot(&v).sqrt();
    v /= norm;

    for _ in 0..POWER_ITERATIONS {
        let next = matrix.dot(&v);
        let norm = next.dot(&next).sqrt();
        if norm < 1e-10 {
            break;
        }
        v = next / norm;
    }

    // Rayleigh quotient gives the eigenvalue estimate.
    let eigenvalue = v.dot(&matrix.dot(&v));
    (v, eigenvalue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoredDocument;

    fn store_with(vectors: &[(&str, Vec<f32>)]) -> (tempfile::TempDir, VectorDb) {
        let tmp = tempfile::tempdir().unwrap();
        let db = VectorDb::open(&tmp.path().join("vectors.redb")).unwrap();
        for (i, (source, vector)) in vectors.iter().enumerate() {
            let document = StoredDocument {
                meta: ArticleMeta {
                    source: source.to_string(),
                    title: format!("doc-{i}"),
                    ..ArticleMeta::default()
                },
                content: format!("content-{i}"),
                fingerprint: i as u64,
            };
            db.upsert(i as u64, &document, vector).unwrap();
        }
        (tmp, db)
    }

    #[test]
    fn empty_selection_returns_zeroed_report() {
        let (_tmp, db) = store_with(&[]);
        let report = generate(&db, &[]).unwrap();

        assert!(report.data.is_empty());
        assert_eq!(report.x_axis_title, "PC1 (0.00% variance)");
        assert_eq!(report.y_axis_title, "PC2 (0.00% variance)");
    }

    #[test]
    fn fewer_than_two_documents_is_an_error() {
        let (_tmp, db) = store_with(&[("Wire", vec![1.0, 2.0, 3.0])]);
        let err = generate(&db, &["Wire".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Reduction(_)));
    }

    #[test]
    fn report_carries_meta_and_content() {
        let (_tmp, db) = store_with(&[
            ("Wire", vec![1.0, 0.0, 0.0]),
            ("Wire", vec![0.0, 1.0, 0.0]),
            ("Wire", vec![0.0, 0.0, 1.0]),
        ]);

        let report = generate(&db, &["Wire".to_string()]).unwrap();
        assert_eq!(report.data.len(), 3);
        assert_eq!(report.data[0].meta.title, "doc-0");
        assert_eq!(report.data[0].content, "content-0");
        assert!(report.x_axis_title.starts_with("PC1 ("));
    }

    #[test]
    fn unselected_sources_are_excluded() {
        let (_tmp, db) = store_with(&[
            ("Wire", vec![1.0, 0.0]),
            ("Wire", vec![0.0, 1.0]),
            ("Other", vec![5.0, 5.0]),
        ]);

        let report = generate(&db, &["Wire".to_string()]).unwrap();
        assert_eq!(report.data.len(), 2);
    }

    #[test]
    fn first_component_follows_dominant_spread() {
        // Points spread along one axis; PC1 must capture nearly all
        // variance and separate the extremes.
        let data = Array2::from_shape_vec(
            (4, 3),
            vec![
                -3.0, 0.1, 0.0, //
                -1.0, -0.1, 0.0, //
                1.0, 0.1, 0.0, //
                3.0, -0.1, 0.0,
            ],
        )
        .unwrap();

        let pca = Pca2::fit(&data).unwrap();
        assert!(pca.explained[0] > 0.9);
        assert!(pca.explained[1] < 0.1);

        let projected = pca.transform(&data);
        assert!(projected[[0, 0]].abs() > 2.0);
        // Opposite extremes land on opposite sides of the origin.
        assert!(projected[[0, 0]] * projected[[3, 0]] < 0.0);
    }

    #[test]
    fn identical_vectors_have_zero_explained_variance() {
        let data = Array2::from_elem((3, 4), 0.5f32);
        let pca = Pca2::fit(&data).unwrap();
        assert_eq!(pca.explained, [0.0, 0.0]);
    }

    #[test]
    fn serializes_with_dashed_axis_keys() {
        let (_tmp, db) = store_with(&[]);
        let report = generate(&db, &[]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("x-axis-title").is_some());
        assert!(json.get("y-axis-title").is_some());
        assert_eq!(json["data"], serde_json::json!([]));
    }
}
