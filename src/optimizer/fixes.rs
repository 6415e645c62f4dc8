//! Automated fix enumeration.
//!
//! Maps issue types to fix descriptors: a human description plus the
//! external command that would apply it. The engine only enumerates
//! candidates; execution is delegated to an external collaborator, and a
//! missing mapping for one issue never aborts enumeration of the rest.

use super::Issue;
use serde::{Deserialize, Serialize};

/// A candidate automated fix for one issue type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixDescriptor {
    /// Issue type this fix addresses
    pub issue_type: String,
    /// What the fix does
    pub description: String,
    /// External command reference that performs the fix
    pub command: String,
}

/// Look up the fix descriptor for one issue type, if one exists.
fn descriptor_for(issue_type: &str) -> Option<FixDescriptor> {
    let (description, command) = match issue_type {
        "bundle-size" => (
            "Re-run the production build with compression and chunk splitting enabled",
            "npm run build:optimized",
        ),
        "versioning" => (
            "Enable content-hashed output filenames in the bundler config",
            "npm run build -- --hash-filenames",
        ),
        "cls" => (
            "Regenerate image dimension attributes from the asset manifest",
            "npm run images:dimensions",
        ),
        "response-time" => (
            "Warm the server-side response cache for the slowest routes",
            "npm run cache:warm",
        ),
        _ => return None,
    };
    Some(FixDescriptor {
        issue_type: issue_type.to_string(),
        description: description.to_string(),
        command: command.to_string(),
    })
}

/// Enumerate fix candidates for a set of issues, one per issue type.
///
/// Issues without a mapping are skipped; duplicates collapse to a single
/// descriptor in first-seen order.
pub fn enumerate_fixes(issues: &[&Issue]) -> Vec<FixDescriptor> {
    let mut fixes: Vec<FixDescriptor> = Vec::new();
    for issue in issues {
        if fixes.iter().any(|f| f.issue_type == issue.issue_type) {
            continue;
        }
        if let Some(descriptor) = descriptor_for(&issue.issue_type) {
            fixes.push(descriptor);
        }
    }
    fixes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::Severity;

    fn issue(issue_type: &str) -> Issue {
        Issue {
            category: "test".to_string(),
            issue_type: issue_type.to_string(),
            severity: Severity::Medium,
            description: String::new(),
            recommendations: vec![],
            related: vec![],
        }
    }

    #[test]
    fn test_known_types_map_to_descriptors() {
        let a = issue("bundle-size");
        let b = issue("versioning");
        let fixes = enumerate_fixes(&[&a, &b]);

        assert_eq!(fixes.len(), 2);
        assert_eq!(fixes[0].issue_type, "bundle-size");
        assert!(fixes[0].command.contains("build"));
        assert_eq!(fixes[1].issue_type, "versioning");
    }

    #[test]
    fn test_unknown_type_is_skipped_without_aborting() {
        let a = issue("lcp"); // no automated fix
        let b = issue("versioning");
        let fixes = enumerate_fixes(&[&a, &b]);

        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].issue_type, "versioning");
    }

    #[test]
    fn test_duplicate_types_collapse() {
        let a = issue("response-time");
        let b = issue("response-time");
        let fixes = enumerate_fixes(&[&a, &b]);
        assert_eq!(fixes.len(), 1);
    }

    #[test]
    fn test_empty_issue_list_yields_no_fixes() {
        assert!(enumerate_fixes(&[]).is_empty());
    }
}
