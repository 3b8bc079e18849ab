use async_trait::async_trait;
use folio_core::markup::{escape_translation, unescape_html};
use folio_core::post::PostSummary;

use crate::collaborators::Renderer;
use crate::error::HistoryResult;

/// Renderer for posts stored as plain text with HTML entities.
///
/// Delivered content has its translation markers escaped so clients do not
/// expand `[[...]]` keys found in user text.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

#[async_trait]
impl Renderer for HtmlRenderer {
    fn unescape(&self, stored: &str) -> String {
        unescape_html(stored)
    }

    fn escape(&self, raw: &str) -> String {
        escape_translation(raw)
    }

    async fn parse_post(&self, post: PostSummary) -> HistoryResult<PostSummary> {
        tracing::trace!(post_id = post.post_id, "Parsing reconstructed post");
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_restores_raw_text() {
        let renderer = HtmlRenderer;
        assert_eq!(renderer.unescape("a &lt; b &amp;&amp; c"), "a < b && c");
    }

    #[test]
    fn escape_neutralises_translation_keys() {
        let renderer = HtmlRenderer;
        assert_eq!(renderer.escape("see [[key]]"), "see &lsqb;&lsqb;key&rsqb;&rsqb;");
    }
}
