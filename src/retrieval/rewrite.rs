//! Query rewriting for the preemptive retrieval strategy.
//!
//! A lightweight completion call turns the raw user message into 1-3
//! short, self-contained search queries. The contract with the model is a
//! bare JSON array of strings; models habitually wrap it in a markdown
//! code fence, so fences are stripped before parsing. Any parse failure
//! falls back to the raw message, since rewriting is an optimization, never a
//! failure point.

use crate::ports::CompletionClient;

pub const REWRITE_SYSTEM_PROMPT: &str = "Rewrite the user's message into 1-3 short, \
self-contained search queries that together cover what the user wants to know. \
Respond with a JSON array of strings and nothing else.";

/// Parse the rewrite completion into sub-queries, capped at
/// `max_subqueries`. Returns `None` on any malformed output.
pub fn parse_subqueries(raw: &str, max_subqueries: usize) -> Option<Vec<String>> {
    let stripped = strip_code_fence(raw.trim());

    let parsed: Vec<String> = serde_json::from_str(stripped).ok()?;

    let queries: Vec<String> = parsed
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .take(max_subqueries)
        .collect();

    if queries.is_empty() {
        None
    } else {
        Some(queries)
    }
}

/// Ask the completion client to rewrite `message`; on any failure, treat
/// the raw message as the single query.
pub async fn rewrite_queries(
    completion: &dyn CompletionClient,
    message: &str,
    max_subqueries: usize,
) -> Vec<String> {
    match completion.complete(REWRITE_SYSTEM_PROMPT, message).await {
        Ok(raw) => match parse_subqueries(&raw, max_subqueries) {
            Some(queries) => {
                tracing::debug!(count = queries.len(), "Message rewritten into sub-queries");
                queries
            }
            None => {
                tracing::warn!(
                    raw = %raw.chars().take(120).collect::<String>(),
                    "Rewrite output was not a JSON string array, using raw message"
                );
                vec![message.to_string()]
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Rewrite completion failed, using raw message");
            vec![message.to_string()]
        }
    }
}

/// Strip a surrounding markdown code fence (with or without a language
/// tag) from the completion output.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line, e.g. "```json".
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}
