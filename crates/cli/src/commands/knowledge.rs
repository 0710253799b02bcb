//! Knowledge base command handlers.
//!
//! Adds documents to, and searches, the workspace-scoped vector index.

use clap::{Args, Subcommand};
use draftsmith_core::{config::AppConfig, AppError, AppResult};
use std::path::PathBuf;

/// Knowledge base management
#[derive(Args, Debug)]
pub struct KnowledgeCommand {
    #[command(subcommand)]
    pub action: KnowledgeAction,
}

#[derive(Subcommand, Debug)]
pub enum KnowledgeAction {
    /// Add a document to the knowledge base
    Add {
        /// Document text (alternative to --file)
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Read document text from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Workspace the document belongs to
        #[arg(long)]
        workspace_id: String,

        /// Source label stored in metadata
        #[arg(long)]
        source: Option<String>,
    },

    /// Search the knowledge base
    Search {
        /// Query text
        #[arg(long)]
        query: String,

        /// Workspace scope
        #[arg(long)]
        workspace_id: Option<String>,

        /// Number of matches to return
        #[arg(long, default_value_t = draftsmith_knowledge::DEFAULT_TOP_K)]
        top_k: usize,
    },
}

impl KnowledgeCommand {
    /// Execute the knowledge command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let retriever = super::build_retriever(config)?;

        match &self.action {
            KnowledgeAction::Add {
                text,
                file,
                workspace_id,
                source,
            } => {
                let text = match (text, file) {
                    (Some(text), _) => text.clone(),
                    (None, Some(file)) => std::fs::read_to_string(file).map_err(|e| {
                        AppError::Config(format!("Failed to read {:?}: {}", file, e))
                    })?,
                    (None, None) => {
                        return Err(AppError::Config(
                            "Either --text or --file is required".to_string(),
                        ))
                    }
                };

                let metadata = match source {
                    Some(source) => serde_json::json!({"source": source}),
                    None => serde_json::json!({}),
                };

                match retriever.store(&text, workspace_id, metadata).await? {
                    Some(id) => println!("Stored document {}", id),
                    None => println!("Skipped empty document"),
                }
            }

            KnowledgeAction::Search {
                query,
                workspace_id,
                top_k,
            } => {
                let documents = retriever
                    .retrieve(query, workspace_id.as_deref(), *top_k)
                    .await?;

                if documents.is_empty() {
                    println!("No matches");
                } else {
                    for document in documents {
                        println!("[{:.3}] {}: {}", document.score, document.id, document.text);
                    }
                }
            }
        }

        Ok(())
    }
}
