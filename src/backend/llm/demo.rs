/**
 * Demo Model Provider
 *
 * Picks one of four canned replies by keyword and streams it word by word,
 * pausing between fragments to mimic a real model. Used for local
 * development and tests; no network access.
 *
 * # Keyword Routing
 *
 * Checked in order against the lowercased prompt:
 * 1. `introduction`, `intro`, `opening` - introduction review
 * 2. `citation`, `reference`, `bibliography` - citation check
 * 3. `summary`, `summarize`, `abstract` - manuscript summary
 * 4. anything else - capability overview
 */

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::{ModelError, ModelProvider, TokenStream};
use crate::shared::ModelInfo;

pub const DEMO_MODEL_NAME: &str = "fake-claude-demo";
pub const DEMO_MODEL_VERSION: &str = "1.0.0";

const INTRODUCTION_KEYWORDS: &[&str] = &["introduction", "intro", "opening"];
const CITATION_KEYWORDS: &[&str] = &["citation", "reference", "bibliography"];
const SUMMARY_KEYWORDS: &[&str] = &["summary", "summarize", "abstract"];

pub const INTRODUCTION_RESPONSE: &str = "I'd be happy to help you improve your introduction section!

Here are my suggestions:

**Opening Hook**: Consider starting with a compelling statistic or recent development in the field to immediately capture reader attention.

**Problem Statement**: Clearly articulate the gap in current research or the problem your manuscript addresses.

**Research Questions**: State your main research questions or hypotheses early in the introduction.

**Significance**: Explain why this research matters and what contributions it makes to the field.

**Structure Preview**: End with a brief overview of how the paper is organized.

Would you like me to help draft any specific section?";

pub const CITATION_RESPONSE: &str = "Let me check the citations in your document.

**Citation Analysis:**

1. ✅ Smith et al. (2024) - Properly formatted
2. ⚠️ Johnson 2023 - Missing parentheses, should be (Johnson, 2023)
3. ✅ Chen et al. (2025) - Properly formatted
4. ⚠️ Reference #15 - Not found in bibliography

**Recommendations:**
- Ensure all in-text citations have corresponding bibliography entries
- Use consistent citation format (APA, MLA, Chicago, etc.)
- Check that all author names are spelled correctly

Would you like me to help fix any specific citation issues?";

pub const SUMMARY_RESPONSE: &str = "Here's a summary of your manuscript:

**Title**: AI-Driven Clinical Decision Support Systems

**Main Themes**:
1. Integration of machine learning in healthcare diagnostics
2. Regulatory considerations for AI in clinical settings
3. Implementation challenges and best practices

**Key Arguments**:
- AI systems can significantly improve diagnostic accuracy
- Human oversight remains essential for clinical decisions
- Proper validation frameworks are needed before deployment

**Conclusion**: The manuscript advocates for a balanced approach to AI adoption in healthcare, emphasizing both potential benefits and necessary safeguards.

The document is approximately 3,245 words with 12 cited references.";

pub const DEFAULT_RESPONSE: &str = "Thank you for your question! I'm your manuscript assistant, here to help with your writing.

I can assist with:
- **Literature Review**: Checking citations and references
- **Drafting**: Writing or improving sections
- **Clarity**: Enhancing academic writing style
- **Summaries**: Generating abstracts and summaries
- **Analysis**: Reviewing document structure and flow

Please share more details about what you'd like me to help with, and I'll provide specific assistance.

*Note: This is a demo environment. In the full version, I would analyze your actual document content and provide tailored suggestions.*";

/// Canned-response model
#[derive(Debug, Clone)]
pub struct DemoModel {
    token_delay: Duration,
}

impl DemoModel {
    pub fn new(token_delay: Duration) -> Self {
        Self { token_delay }
    }

    /// Choose the reply for a prompt
    pub fn select_response(prompt: &str) -> &'static str {
        let prompt = prompt.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|word| prompt.contains(word));

        if mentions(INTRODUCTION_KEYWORDS) {
            INTRODUCTION_RESPONSE
        } else if mentions(CITATION_KEYWORDS) {
            CITATION_RESPONSE
        } else if mentions(SUMMARY_KEYWORDS) {
            SUMMARY_RESPONSE
        } else {
            DEFAULT_RESPONSE
        }
    }
}

/// Split a reply into stream fragments: each word, with a lone `" "`
/// fragment before every word after the first.
pub fn fragments(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for (i, word) in text.split(' ').enumerate() {
        if i > 0 {
            out.push(" ".to_string());
        }
        if !word.is_empty() {
            out.push(word.to_string());
        }
    }
    out
}

#[async_trait]
impl ModelProvider for DemoModel {
    fn info(&self) -> ModelInfo {
        ModelInfo {
            model: DEMO_MODEL_NAME.to_string(),
            version: DEMO_MODEL_VERSION.to_string(),
            description: "Fake LLM for demo purposes".to_string(),
            capabilities: vec![
                "literature_review".to_string(),
                "drafting".to_string(),
                "citation_checking".to_string(),
                "summarization".to_string(),
            ],
        }
    }

    async fn generate(&self, prompt: &str, _context: &str) -> Result<String, ModelError> {
        tokio::time::sleep(self.token_delay).await;
        Ok(Self::select_response(prompt).to_string())
    }

    fn stream(&self, prompt: &str, _context: &str) -> TokenStream {
        let pieces = fragments(Self::select_response(prompt));
        let delay = self.token_delay;
        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            for piece in pieces {
                if tx.send(Ok(piece)).await.is_err() {
                    tracing::debug!("Token consumer dropped, stopping demo stream");
                    return;
                }
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        });

        ReceiverStream::new(rx).boxed()
    }
}
