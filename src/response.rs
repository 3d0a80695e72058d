//! Turns search hits into the text block shown for each question.

/// Placeholder stored in bundles for sentences that have no summary.
pub const SUMMARY_UNAVAILABLE: &str = "Summary not available.";

pub const NO_RELEVANT_CONTENT: &str = "No relevant content found.";

/// At most this many sentences and summaries are quoted per answer.
const MAX_QUOTED: usize = 2;

pub fn format_response(
    query: &str,
    labels: &[i64],
    sentences: &[String],
    summaries: &[String],
) -> String {
    let mut relevant_sentences = Vec::new();
    let mut relevant_summaries = Vec::new();

    for &label in labels {
        let Ok(idx) = usize::try_from(label) else {
            continue;
        };
        let Some(sentence) = sentences.get(idx) else {
            continue;
        };
        relevant_sentences.push(sentence.as_str());

        if let Some(summary) = summaries.get(idx) {
            if !summary.is_empty() && summary != SUMMARY_UNAVAILABLE {
                relevant_summaries.push(summary.as_str());
            }
        }
    }

    if relevant_sentences.is_empty() {
        return format!("Question: {query}\n\nAnswer: {NO_RELEVANT_CONTENT}");
    }

    let answer = join_first(&relevant_sentences);
    let mut response = format!("Question: {query}\n\nAnswer: {answer}");
    if !relevant_summaries.is_empty() {
        response.push_str("\n\nSummary: ");
        response.push_str(&join_first(&relevant_summaries));
    }
    response
}

/// Shown in place of an answer when the search for its batch failed.
pub fn error_response(query: &str) -> String {
    format!("Error while processing question '{query}'.")
}

fn join_first(parts: &[&str]) -> String {
    parts
        .iter()
        .take(MAX_QUOTED)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
