/// Fixed instructions describing what the generated module must contain.
///
/// `files` are relative to the module root; the prompt builder prefixes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    pub target: String,
    pub files: Vec<String>,
    pub constraints: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            target: "an Odoo 18 addon inside an existing repository".to_string(),
            files: vec![
                "__manifest__.py".to_string(),
                "__init__.py".to_string(),
                "models/__init__.py".to_string(),
                "models/models.py".to_string(),
            ],
            constraints: vec![
                "Keep code minimal and correct for Odoo 18.".to_string(),
                "__manifest__.py must be a Python dict literal (not JSON).".to_string(),
                "models/models.py must be a minimal valid declarative model definition with \
                 partner_id = fields.Many2one('res.partner', required=True) and \
                 points = fields.Integer(default=0)."
                    .to_string(),
            ],
        }
    }
}
