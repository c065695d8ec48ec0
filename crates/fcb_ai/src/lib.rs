pub mod assumptions;
pub mod chains;
pub mod gemini;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod retriever;
pub mod search;
