use solace_core::models::SeverityBand;

use super::frequency_items;
use crate::Instrument;
use crate::scoring::Item;

/// PHQ-9: Patient Health Questionnaire, depression module.
/// 9 items rated 0–3 over the last two weeks. Total 0–27.
/// Item 9 asks about thoughts of self-harm.
pub struct Phq9;

/// Zero-based index of item 9.
pub const SELF_HARM_INDEX: usize = 8;

impl Instrument for Phq9 {
    fn id(&self) -> &str {
        "phq9"
    }

    fn name(&self) -> &str {
        "PHQ-9"
    }

    fn items(&self) -> &[Item] {
        static ITEMS: std::sync::LazyLock<Vec<Item>> = std::sync::LazyLock::new(|| {
            frequency_items(&[
                ("interest", "Little interest or pleasure in doing things"),
                ("mood", "Feeling down, depressed, or hopeless"),
                ("sleep", "Trouble falling or staying asleep, or sleeping too much"),
                ("energy", "Feeling tired or having little energy"),
                ("appetite", "Poor appetite or overeating"),
                ("self_worth", "Feeling bad about yourself"),
                ("concentration", "Trouble concentrating on things"),
                ("psychomotor", "Moving or speaking slowly, or being fidgety or restless"),
                (
                    "self_harm",
                    "Thoughts that you would be better off dead, or of hurting yourself",
                ),
            ])
        });
        &ITEMS
    }

    fn band(&self, score: u32) -> SeverityBand {
        match score {
            0..=4 => SeverityBand::Minimal,
            5..=9 => SeverityBand::Mild,
            10..=14 => SeverityBand::Moderate,
            15..=19 => SeverityBand::ModeratelySevere,
            _ => SeverityBand::Severe,
        }
    }

    fn self_harm_index(&self) -> Option<usize> {
        Some(SELF_HARM_INDEX)
    }
}
