//! User-facing text for resolution outcomes

use hsn_core::Outcome;

/// Appended after every lookup reply
pub const FOLLOW_UP_PROMPT: &str = "💬 Want to check another one?";

/// Shown for a candidate that contained no digits
pub const NO_VALID_CODE_MESSAGE: &str = "⚠️ Please provide a valid HSN code between 2 and 8 digits.";

pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Found { code, matches } => {
            let mut text = format!("✅ HSN Code {code} is valid.");
            for m in matches {
                text.push_str(&format!("\n📘 {}: {}", m.code, m.description));
            }
            text
        }
        Outcome::NotFound { code } => {
            format!("❌ HSN Code {code} not found in the master data.")
        }
        Outcome::NoValidCode => NO_VALID_CODE_MESSAGE.to_string(),
    }
}

/// Render every outcome, separated by blank lines, followed by the
/// follow-up prompt
pub fn render_outcomes(outcomes: &[Outcome]) -> String {
    let mut sections: Vec<String> = outcomes.iter().map(render_outcome).collect();
    sections.push(FOLLOW_UP_PROMPT.to_string());
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsn_core::HierarchyMatch;

    fn found() -> Outcome {
        Outcome::Found {
            code: "010121".to_string(),
            matches: vec![
                HierarchyMatch {
                    code: "0101".to_string(),
                    description: "Horses".to_string(),
                },
                HierarchyMatch {
                    code: "01".to_string(),
                    description: "Live animals".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_render_found() {
        assert_eq!(
            render_outcome(&found()),
            "✅ HSN Code 010121 is valid.\n📘 0101: Horses\n📘 01: Live animals"
        );
    }

    #[test]
    fn test_render_not_found() {
        let outcome = Outcome::NotFound {
            code: "9999".to_string(),
        };
        assert_eq!(
            render_outcome(&outcome),
            "❌ HSN Code 9999 not found in the master data."
        );
    }

    #[test]
    fn test_render_no_valid_code() {
        assert_eq!(render_outcome(&Outcome::NoValidCode), NO_VALID_CODE_MESSAGE);
    }

    #[test]
    fn test_render_outcomes_joins_and_prompts() {
        let text = render_outcomes(&[
            found(),
            Outcome::NotFound {
                code: "9999".to_string(),
            },
        ]);

        let sections: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(sections.len(), 3);
        assert!(sections[0].starts_with("✅ HSN Code 010121"));
        assert!(sections[1].starts_with("❌ HSN Code 9999"));
        assert_eq!(sections[2], FOLLOW_UP_PROMPT);
    }
}
