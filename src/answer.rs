use tracing::info;

use crate::{corpus::SourceDir, error::Result, providers::TextGenerator};

/// Fill the fixed answer prompt with the aggregated context and the user
/// question. The model is told to rely on the supplied context only.
pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "You are an investigative research assistant. Answer the question \
using only the context provided below. If the context does not contain \
the answer, say so.\n\n\
Context:\n{context}\n\
Question: {query}\n\
Answer:"
    )
}

/// Run the retrieval/answer flow: aggregate the selected folders into one
/// context, fill the prompt, and make a single blocking round trip to the
/// generation service. Provider failures propagate to the caller.
pub fn answer_query(
    source: &SourceDir,
    folders: &[String],
    query: &str,
    generator: &dyn TextGenerator,
) -> Result<String> {
    let context = source.aggregate_contexts(folders)?;
    info!(
        folders = folders.len(),
        context_len = context.len(),
        "running answer pipeline"
    );
    generator.generate(&build_prompt(&context, query))
}
