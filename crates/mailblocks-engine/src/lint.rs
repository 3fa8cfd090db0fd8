use std::fmt;

use serde_json::Value;

use crate::blocks::registry::required_fields;
use crate::blocks::{BlockContent, BlockId};
use crate::editing::Document;

/// A non-fatal finding about a document
#[derive(Debug, Clone, PartialEq)]
pub struct LintIssue {
    pub block_id: Option<BlockId>,
    pub message: String,
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.block_id {
            Some(id) => write!(f, "block {id}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Report incomplete blocks. Never blocks compilation or saving.
pub fn lint(document: &Document) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    for block in &document.blocks {
        let issue = |message: String| LintIssue {
            block_id: Some(block.id.clone()),
            message,
        };

        let Some(kind) = block.kind() else {
            issues.push(issue(format!(
                "unknown block type '{}' will not be rendered",
                block.content.type_name()
            )));
            continue;
        };

        let content = block.content.to_value();
        for field in required_fields(kind) {
            let missing = match content.get(*field) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(Value::Array(items)) => items.is_empty(),
                Some(_) => false,
            };
            if missing {
                issues.push(issue(format!("{kind} block is missing '{field}'")));
            }
        }

        if let BlockContent::Social(social) = &block.content
            && social.links.iter().any(|link| link.url.trim().is_empty())
        {
            issues.push(issue("social link without a URL will be skipped".to_string()));
        }
    }

    if document.settings.preheader.trim().is_empty() {
        issues.push(LintIssue {
            block_id: None,
            message: "no preheader set".to_string(),
        });
    }

    issues
}
