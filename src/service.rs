use serde::{Deserialize, Serialize};

use crate::{
    answer,
    corpus::SourceDir,
    error::Result,
    graph::{self, GraphData},
    providers::{Embedder, TextGenerator},
    report::{self, SimilarityReport},
    resume,
    store::VectorDb,
    tokenize,
};

// -- Request/response bodies (JSON shapes of the dashboard routes) --

#[derive(Debug, Clone, Deserialize)]
pub struct WordcloudRequest {
    pub folders: Vec<String>,
    /// Number of ranked words to return; defaults to 50.
    pub words: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub folders: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeText {
    pub text: String,
}

/// The dashboard's operations behind the HTTP routes, with all
/// configuration and external capabilities injected at construction.
/// Handlers stay testable with stub providers and a temp corpus.
pub struct Dashboard {
    source: SourceDir,
    store: VectorDb,
    embedder: Box<dyn Embedder>,
    generator: Box<dyn TextGenerator>,
}

impl Dashboard {
    pub fn new(
        source: SourceDir,
        store: VectorDb,
        embedder: Box<dyn Embedder>,
        generator: Box<dyn TextGenerator>,
    ) -> Self {
        Self {
            source,
            store,
            embedder,
            generator,
        }
    }

    pub fn source(&self) -> &SourceDir {
        &self.source
    }

    pub fn store(&self) -> &VectorDb {
        &self.store
    }

    /// Selectable corpus partitions, for the folder picker.
    pub fn folders(&self) -> Result<Vec<String>> {
        self.source.list_folders()
    }

    /// `/wordcloud`: ranked (token, count) pairs for the selected folders.
    pub fn wordcloud(
        &self,
        request: &WordcloudRequest,
    ) -> Result<Vec<(String, usize)>> {
        let text = self.source.load_lowercased(&request.folders)?;
        let tokens = tokenize::tokenize(&text);
        Ok(tokenize::rank(
            &tokens,
            request.words.unwrap_or(tokenize::DEFAULT_TOP_WORDS),
        ))
    }

    /// `/llm_query`: retrieval-augmented answer over the selected folders.
    pub fn llm_query(&self, request: &QueryRequest) -> Result<String> {
        answer::answer_query(
            &self.source,
            &request.folders,
            &request.query,
            self.generator.as_ref(),
        )
    }

    /// `/people_data`: the static entity graph fixture.
    pub fn people_data(&self) -> Result<GraphData> {
        graph::people_graph()
    }

    /// `/resume_text/<name>`: resume content, empty when absent.
    pub fn resume_text(&self, name: &str) -> Result<ResumeText> {
        let text = resume::lookup(&self.source.resumes_dir(), name)?;
        Ok(ResumeText { text })
    }

    /// `/generate_similarity_report`: 2-D projection of the stored
    /// embeddings for the selected sources.
    pub fn similarity_report(
        &self,
        request: &ReportRequest,
    ) -> Result<SimilarityReport> {
        report::generate(&self.store, &request.sources)
    }

    /// Warm the embedding store from the news tree. Blocks until done.
    pub fn bootstrap(&self) -> Result<crate::bootstrap::BootstrapStats> {
        crate::bootstrap::warm_store(
            &self.source.news_dir(),
            "news",
            &self.store,
            self.embedder.as_ref(),
        )
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
