mod rules;

pub use rules::RuleSet;

use std::fmt::Write as _;

use crate::config::{ContentEncoding, OutputSettings};
use crate::request::GenerationRequest;

/// Where a request's module lives, derived only from the identifier and output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLayout {
    pub name: String,
    pub root: String,
}

impl ModuleLayout {
    pub fn new(request: &GenerationRequest, output: &OutputSettings) -> Self {
        let name = format!("{}_{}", output.module_prefix, request.identifier());
        let root = format!("{}/{}", output.addons_root.trim_end_matches('/'), name);
        Self { name, root }
    }

    /// Prefix every generated path has to start with.
    pub fn allow_prefix(&self) -> String {
        format!("{}/", self.root)
    }

    pub fn required_paths(&self, rules: &RuleSet) -> Vec<String> {
        rules
            .files
            .iter()
            .map(|file| format!("{}/{}", self.root, file.trim_start_matches('/')))
            .collect()
    }
}

pub fn build_prompt(
    request: &GenerationRequest,
    layout: &ModuleLayout,
    rules: &RuleSet,
    encoding: ContentEncoding,
) -> String {
    let field = encoding.files_field();
    let value_hint = match encoding {
        ContentEncoding::Plain => "file_content_utf8",
        ContentEncoding::Base64 => "base64(file_content_utf8)",
    };

    let mut prompt = String::new();
    let _ = writeln!(prompt, "You are generating {}.", rules.target);
    prompt.push('\n');
    prompt.push_str("Return ONLY valid JSON of this shape:\n");
    let _ = writeln!(
        prompt,
        "{{\n  \"{field}\": {{\n    \"path\": \"{value_hint}\",\n    ...\n  }}\n}}"
    );
    prompt.push('\n');
    prompt.push_str("Rules:\n");
    let _ = writeln!(
        prompt,
        "- ALL file paths MUST start with \"{}\"",
        layout.allow_prefix()
    );
    prompt.push_str("- Return ONLY these exact paths (no extra files):\n");
    for (idx, path) in layout.required_paths(rules).iter().enumerate() {
        let _ = writeln!(prompt, "  {}) \"{}\"", idx + 1, path);
    }
    for constraint in &rules.constraints {
        let _ = writeln!(prompt, "- {constraint}");
    }
    prompt.push_str("- No markdown. No explanations. JSON only.\n");
    prompt.push('\n');
    let _ = writeln!(prompt, "Issue title: {}", request.title());
    prompt.push_str("Issue body:\n");
    prompt.push_str(request.body());

    prompt.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::TriggerInputs;

    fn request(id: Option<&str>) -> GenerationRequest {
        GenerationRequest::new(TriggerInputs {
            title: Some("Customer loyalty".into()),
            body: Some("Track points per partner.".into()),
            identifier: id.map(str::to_string),
        })
        .unwrap()
    }

    #[test]
    fn layout_embeds_identifier() {
        let layout = ModuleLayout::new(&request(Some("8")), &OutputSettings::default());
        assert_eq!(layout.name, "ai_issue_8");
        assert_eq!(layout.root, "odoo/addons/ai_issue_8");
        assert_eq!(layout.allow_prefix(), "odoo/addons/ai_issue_8/");
        assert_eq!(
            layout.required_paths(&RuleSet::default()),
            vec![
                "odoo/addons/ai_issue_8/__manifest__.py",
                "odoo/addons/ai_issue_8/__init__.py",
                "odoo/addons/ai_issue_8/models/__init__.py",
                "odoo/addons/ai_issue_8/models/models.py",
            ]
        );
    }

    #[test]
    fn missing_identifier_uses_fallback_module() {
        let layout = ModuleLayout::new(&request(None), &OutputSettings::default());
        assert_eq!(layout.root, "odoo/addons/ai_issue_0");
    }

    #[test]
    fn prompt_names_every_required_path_and_the_issue() {
        let req = request(Some("2"));
        let layout = ModuleLayout::new(&req, &OutputSettings::default());
        let rules = RuleSet::default();
        let prompt = build_prompt(&req, &layout, &rules, ContentEncoding::Base64);

        for path in layout.required_paths(&rules) {
            assert!(prompt.contains(&format!("\"{path}\"")), "missing {path}");
        }
        assert!(prompt.contains("\"files_b64\""));
        assert!(prompt.contains("base64(file_content_utf8)"));
        assert!(prompt.contains("Issue title: Customer loyalty"));
        assert!(prompt.ends_with("Track points per partner."));
        assert!(prompt.contains("fields.Many2one('res.partner', required=True)"));
    }

    #[test]
    fn prompt_is_deterministic_and_follows_encoding() {
        let req = request(Some("2"));
        let layout = ModuleLayout::new(&req, &OutputSettings::default());
        let rules = RuleSet::default();
        let first = build_prompt(&req, &layout, &rules, ContentEncoding::Plain);
        let second = build_prompt(&req, &layout, &rules, ContentEncoding::Plain);
        assert_eq!(first, second);
        assert!(first.contains("\"files\": {"));
        assert!(!first.contains("files_b64"));
    }
}
