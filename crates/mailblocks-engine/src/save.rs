//! Save gate and the template-store hand-off.
//!
//! Every commercial email must offer an unsubscribe link, so a document is
//! only handed to a [`TemplateStore`] once it has a footer whose rendered
//! fragment contains [`UNSUBSCRIBE_TOKEN`].

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::blocks::BlockType;
use crate::compiler::render_block;
use crate::editing::{Document, DocumentStructure};
use crate::error::EngineError;

/// Placeholder the sending service replaces with the recipient's unsubscribe URL
pub const UNSUBSCRIBE_TOKEN: &str = "{{unsubscribeUrl}}";

pub type TemplateId = String;

/// Editor metadata stored alongside a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateMeta {
    pub name: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// Exactly what the template store receives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    #[serde(flatten)]
    pub meta: TemplateMeta,
    pub structure: DocumentStructure,
}

/// Persistence collaborator for templates and campaigns
pub trait TemplateStore {
    fn save(&mut self, record: &TemplateRecord) -> anyhow::Result<TemplateId>;
}

fn unsubscribe_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        RegexBuilder::new(&regex::escape(UNSUBSCRIBE_TOKEN))
            .case_insensitive(true)
            .build()
            .expect("Invalid unsubscribe regex")
    })
}

/// True if some footer block renders the unsubscribe placeholder (any case)
pub fn has_unsubscribe_link(document: &Document) -> bool {
    document
        .blocks
        .iter()
        .filter(|block| block.kind() == Some(BlockType::Footer))
        .any(|block| unsubscribe_pattern().is_match(&render_block(block)))
}

pub fn check_save_gate(document: &Document) -> Result<(), EngineError> {
    if has_unsubscribe_link(document) {
        Ok(())
    } else {
        Err(EngineError::MissingUnsubscribeLink)
    }
}

/// Run the save gate, then hand the record to `store`.
///
/// The store is not called at all when the gate fails.
pub fn save_template<S: TemplateStore + ?Sized>(
    store: &mut S,
    meta: TemplateMeta,
    document: &Document,
) -> Result<TemplateId, EngineError> {
    check_save_gate(document)?;
    let record = TemplateRecord {
        meta,
        structure: document.structure(),
    };
    let id = store.save(&record)?;
    log::debug!("template '{}' saved as {id}", record.meta.name);
    Ok(id)
}
