//! Reads the profile and summary documents into a [`KnowledgeBase`].
//!
//! `.pdf` files go through text extraction (with the `pdf` feature);
//! anything else is read as UTF-8 text.

use std::path::Path;

use dossier_core::error::KnowledgeError;
use dossier_core::persona::KnowledgeBase;
use tracing::{debug, info, warn};

/// Load both documents. A missing or unreadable file is a startup error;
/// a document with no text is logged and loaded as empty.
pub fn load_knowledge(profile_path: &Path, summary_path: &Path) -> Result<KnowledgeBase, KnowledgeError> {
    let profile = extract_text(profile_path)?;
    let summary = extract_text(summary_path)?;

    let knowledge = KnowledgeBase::new(profile, summary);
    info!(
        profile = %profile_path.display(),
        summary = %summary_path.display(),
        estimated_tokens = knowledge.estimated_tokens(),
        "Knowledge loaded"
    );
    Ok(knowledge)
}

/// Extract the text of a single document, choosing the reader by extension.
pub fn extract_text(path: &Path) -> Result<String, KnowledgeError> {
    if !path.exists() {
        return Err(KnowledgeError::Read {
            path: path.to_path_buf(),
            reason: "file not found".into(),
        });
    }

    let text = if is_pdf(path) {
        extract_pdf(path)?
    } else {
        std::fs::read_to_string(path).map_err(|e| KnowledgeError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
    };

    if text.trim().is_empty() {
        warn!(path = %path.display(), "Document contains no text");
    }
    debug!(path = %path.display(), chars = text.len(), "Document read");
    Ok(text)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path) -> Result<String, KnowledgeError> {
    let pages = pdf_extract::extract_text_by_pages(path).map_err(|e| KnowledgeError::Extract {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // Image-only pages come back blank.
    Ok(join_pages(pages))
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(path: &Path) -> Result<String, KnowledgeError> {
    Err(KnowledgeError::Extract {
        path: path.to_path_buf(),
        reason: "built without the `pdf` feature; convert the profile to .txt or .md".into(),
    })
}

#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .concat()
}
