use solace_core::models::SeverityBand;

use super::frequency_items;
use crate::Instrument;
use crate::scoring::Item;

/// GAD-7: Generalized Anxiety Disorder scale.
/// 7 items rated 0–3. Total 0–21. No self-harm item.
pub struct Gad7;

impl Instrument for Gad7 {
    fn id(&self) -> &str {
        "gad7"
    }

    fn name(&self) -> &str {
        "GAD-7"
    }

    fn items(&self) -> &[Item] {
        static ITEMS: std::sync::LazyLock<Vec<Item>> = std::sync::LazyLock::new(|| {
            frequency_items(&[
                ("nervous", "Feeling nervous, anxious, or on edge"),
                ("uncontrolled_worry", "Not being able to stop or control worrying"),
                ("excessive_worry", "Worrying too much about different things"),
                ("relaxing", "Trouble relaxing"),
                ("restless", "Being so restless that it is hard to sit still"),
                ("irritable", "Becoming easily annoyed or irritable"),
                ("afraid", "Feeling afraid, as if something awful might happen"),
            ])
        });
        &ITEMS
    }

    fn band(&self, score: u32) -> SeverityBand {
        match score {
            0..=4 => SeverityBand::Minimal,
            5..=9 => SeverityBand::Mild,
            10..=14 => SeverityBand::Moderate,
            _ => SeverityBand::Severe,
        }
    }
}
