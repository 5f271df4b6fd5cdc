//! Angle and template catalog
//!
//! Static, immutable configuration: the nine response angles, the literal
//! empathetic and civic-empowerment banks, and the structured depth templates.

pub mod banks;
pub mod depth;

pub use banks::{CIVIC_BANK, EMPATHETIC_BANK, NEW_ANGLE_NOTICE, ResponseBank};
pub use depth::{DepthTemplate, all_depth_template_keys, depth_template, generate_deep_response};

use serde::{Deserialize, Serialize};

/// Response archetype a reply can be built around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AngleType {
    Clarification,
    StepByStep,
    Reframe,
    ProsCons,
    Example,
    Summary,
    NextSteps,
    Empathetic,
    Diagnostic,
}

impl AngleType {
    /// All angle kinds in catalog order
    pub const ALL: [AngleType; 9] = [
        AngleType::Clarification,
        AngleType::StepByStep,
        AngleType::Reframe,
        AngleType::ProsCons,
        AngleType::Example,
        AngleType::Summary,
        AngleType::NextSteps,
        AngleType::Empathetic,
        AngleType::Diagnostic,
    ];

    /// Kebab-case name of the angle
    pub fn as_str(&self) -> &'static str {
        match self {
            AngleType::Clarification => "clarification",
            AngleType::StepByStep => "step-by-step",
            AngleType::Reframe => "reframe",
            AngleType::ProsCons => "pros-cons",
            AngleType::Example => "example",
            AngleType::Summary => "summary",
            AngleType::NextSteps => "next-steps",
            AngleType::Empathetic => "empathetic",
            AngleType::Diagnostic => "diagnostic",
        }
    }

    /// Stable key used for anti-repetition and bias matching
    pub fn key(&self) -> &'static str {
        match self {
            AngleType::Clarification => "angle-clarification",
            AngleType::StepByStep => "angle-steps",
            AngleType::Reframe => "angle-reframe",
            AngleType::ProsCons => "angle-pros-cons",
            AngleType::Example => "angle-example",
            AngleType::Summary => "angle-summary",
            AngleType::NextSteps => "angle-next-steps",
            AngleType::Empathetic => "angle-empathetic",
            AngleType::Diagnostic => "angle-diagnostic",
        }
    }
}

impl std::fmt::Display for AngleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every stable angle key that takes part in anti-repetition
pub fn all_angle_keys() -> Vec<&'static str> {
    AngleType::ALL.iter().map(AngleType::key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_angle_keys_unique() {
        let keys: HashSet<_> = all_angle_keys().into_iter().collect();
        assert_eq!(keys.len(), 9);
    }

    #[test]
    fn test_angle_serde_names() {
        let json = serde_json::to_string(&AngleType::StepByStep).unwrap();
        assert_eq!(json, "\"step-by-step\"");
        let parsed: AngleType = serde_json::from_str("\"pros-cons\"").unwrap();
        assert_eq!(parsed, AngleType::ProsCons);
    }

    #[test]
    fn test_display_matches_as_str() {
        for angle in AngleType::ALL {
            assert_eq!(angle.to_string(), angle.as_str());
        }
    }
}
