//! Combined context assembly.
//!
//! Formats retrieved knowledge and brand text into the single context
//! block attached to every agent in a run. Knowledge comes first, brand
//! second; an empty combined block is never attached at all.

use draftsmith_knowledge::ScoredDocument;

/// Format retrieved documents into a knowledge context block.
///
/// Returns an empty string when there are no documents.
pub fn knowledge_context(documents: &[ScoredDocument]) -> String {
    if documents.is_empty() {
        return String::new();
    }

    let mut context = String::from("Relevant information from knowledge base:\n\n");
    for (i, document) in documents.iter().enumerate() {
        context.push_str(&format!("Document {}:\n{}\n\n", i + 1, document.text));
    }

    context
}

/// Combine knowledge and brand context into one block.
///
/// Knowledge first, brand second, trimmed of surrounding whitespace.
pub fn combine_context(knowledge: &str, brand: &str) -> String {
    format!("{}\n{}", knowledge, brand).trim().to_string()
}
