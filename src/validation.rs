//! Validation System - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Policy maps violations to actions: doctype errors block emission,
//! deprecations are only reported.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::attributes::{AttributeDef, DoctypeConstraint};
use crate::config::DeprecationPolicy;
use crate::doctype::Doctype;
use crate::emit::EmitError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<CompatibilityViolation>,
    pub attribute: String,
    pub doctype: Doctype,
}

impl ValidationResult {
    pub fn warnings(&self) -> impl Iterator<Item = &CompatibilityViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Warning)
    }
}

/// Compatibility rule trait - produces violations
pub trait CompatibilityRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self, def: &AttributeDef, doctype: Doctype) -> Vec<CompatibilityViolation>;
}

// --- Concrete Rules ---

pub struct DoctypeRule;

impl CompatibilityRule for DoctypeRule {
    fn name(&self) -> &'static str { "doctype" }

    fn check(&self, def: &AttributeDef, doctype: Doctype) -> Vec<CompatibilityViolation> {
        if def.constraint.allows(doctype) {
            return vec![];
        }

        let replacement = def.deprecation.as_ref().and_then(|d| d.replacement.as_deref());
        let remediation = match (def.constraint, replacement) {
            (DoctypeConstraint::RemovedInHtml5, Some(r)) => format!("Use {} instead", r),
            (DoctypeConstraint::RemovedInHtml5, None) => "Remove the attribute".to_string(),
            _ => "Declare the HTML5 doctype".to_string(),
        };

        vec![CompatibilityViolation {
            rule: self.name().to_string(),
            severity: ViolationSeverity::Error,
            message: format!("Attribute \"{}\" is {}", def.name, def.constraint.requirement()),
            expected: Some(def.constraint.requirement().to_string()),
            actual: Some(doctype.to_string()),
            remediation: vec![remediation],
        }]
    }
}

pub struct DeprecationRule;

impl CompatibilityRule for DeprecationRule {
    fn name(&self) -> &'static str { "deprecation" }

    fn check(&self, def: &AttributeDef, _doctype: Doctype) -> Vec<CompatibilityViolation> {
        match def.deprecation.as_ref().and_then(|d| d.replacement.as_deref()) {
            Some(replacement) => vec![CompatibilityViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: format!("Attribute \"{}\" is deprecated", def.name),
                expected: Some(replacement.to_string()),
                actual: Some(def.name.to_string()),
                remediation: vec![format!("Use {} instead", replacement)],
            }],
            None => vec![],
        }
    }
}

/// "Expected only on element K" is informational; the element kind is never checked.
pub struct ExpectedElementRule;

impl CompatibilityRule for ExpectedElementRule {
    fn name(&self) -> &'static str { "expected_element" }

    fn check(&self, def: &AttributeDef, _doctype: Doctype) -> Vec<CompatibilityViolation> {
        match def.deprecation.as_ref().and_then(|d| d.expected_on.as_deref()) {
            Some(element) => vec![CompatibilityViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Info,
                message: format!("Attribute \"{}\" is global but expected only on <{}>", def.name, element),
                expected: Some(element.to_string()),
                actual: None,
                remediation: vec![format!("Move the handler to <{}>", element)],
            }],
            None => vec![],
        }
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn CompatibilityRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(DoctypeRule),
                Box::new(DeprecationRule),
                Box::new(ExpectedElementRule),
            ],
        }
    }

    /// Shared validator with the standard rules
    pub fn standard() -> &'static Validator {
        static STANDARD: OnceLock<Validator> = OnceLock::new();
        STANDARD.get_or_init(Validator::new)
    }

    pub fn validate(&self, def: &AttributeDef, doctype: Doctype) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.check(def, doctype))
            .collect();

        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);

        ValidationResult {
            valid,
            violations,
            attribute: def.name.to_string(),
            doctype,
        }
    }

    /// Validate, report non-blocking violations per `policy`, and fail on errors.
    pub fn enforce(
        &self,
        def: &AttributeDef,
        doctype: Doctype,
        policy: DeprecationPolicy,
    ) -> Result<ValidationResult, EmitError> {
        let result = self.validate(def, doctype);

        if !result.valid {
            return Err(EmitError::IncompatibleDoctype {
                attribute: def.name.to_string(),
                doctype,
                requirement: def.constraint.requirement(),
            });
        }

        for v in &result.violations {
            match (policy, &v.severity) {
                (DeprecationPolicy::Ignore, _) | (_, ViolationSeverity::Error) => {}
                (DeprecationPolicy::Warn, ViolationSeverity::Warning) => {
                    tracing::warn!(attribute = %def.name, rule = %v.rule, "{}", v.message)
                }
                (DeprecationPolicy::Log, ViolationSeverity::Warning) => {
                    tracing::debug!(attribute = %def.name, rule = %v.rule, "{}", v.message)
                }
                (_, ViolationSeverity::Info) => {
                    tracing::trace!(attribute = %def.name, rule = %v.rule, "{}", v.message)
                }
            }
        }

        Ok(result)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{ALIGN, ONAFTERPRINT, ONCHANGE, ONCONTEXTMENU, ONMOUSEWHEEL};

    #[test]
    fn html5_only_attribute_fails_in_legacy() {
        let result = Validator::new().validate(&ONCONTEXTMENU, Doctype::Html4Strict);
        assert!(!result.valid);
        assert_eq!(result.violations[0].rule, "doctype");
        assert_eq!(result.violations[0].actual.as_deref(), Some("HTML4 Strict"));
    }

    #[test]
    fn deprecation_is_a_warning_only() {
        let result = Validator::new().validate(&ONMOUSEWHEEL, Doctype::Html5);
        assert!(result.valid);
        let warnings: Vec<_> = result.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].expected.as_deref(), Some("onwheel"));
    }

    #[test]
    fn expected_element_is_informational() {
        let result = Validator::new().validate(&ONAFTERPRINT, Doctype::Html5);
        assert!(result.valid);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].severity, ViolationSeverity::Info);
    }

    #[test]
    fn removed_attribute_suggests_replacement() {
        let result = Validator::new().validate(&ALIGN, Doctype::Html5);
        assert!(!result.valid);
        assert_eq!(result.violations[0].remediation, vec!["Use style instead".to_string()]);
    }

    #[test]
    fn enforce_maps_errors_to_emit_error() {
        let err = Validator::standard()
            .enforce(&ONCONTEXTMENU, Doctype::Html4Strict, DeprecationPolicy::Warn)
            .unwrap_err();
        assert!(matches!(err, EmitError::IncompatibleDoctype { .. }));

        let ok = Validator::standard()
            .enforce(&ONCHANGE, Doctype::Html4Strict, DeprecationPolicy::Ignore)
            .unwrap();
        assert!(ok.violations.is_empty());
    }
}
