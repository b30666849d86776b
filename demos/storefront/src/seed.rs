//! The six classic varieties the storefront opens with

use morel_core::{Category, ItemDraft, Potency, Tier};

/// Drafts for an empty database, menu order
pub fn classic_varieties() -> Vec<ItemDraft> {
    vec![
        variety(
            "Golden Teachers",
            "Psilocybe cubensis",
            "Perfect for beginners seeking wisdom and introspection",
            &["Euphoria", "Visual Enhancement", "Deep Insights"],
            Potency::Moderate,
            "4-6 hours",
            "from-yellow-400 to-orange-500",
            Tier::LightTier,
            ["$25", "$45", "$85", "$160"],
        ),
        variety(
            "Blue Meanies",
            "Panaeolus cyanescens",
            "Intense visuals and profound consciousness expansion",
            &["Strong Visuals", "Ego Dissolution", "Time Distortion"],
            Potency::High,
            "6-8 hours",
            "from-blue-400 to-cyan-500",
            Tier::Boomers,
            ["$35", "$65", "$120", "$220"],
        ),
        variety(
            "Penis Envy",
            "Psilocybe cubensis var.",
            "One of the most potent varieties for experienced journeyers",
            &["Intense Body High", "Reality Shifts", "Spiritual Awakening"],
            Potency::VeryHigh,
            "5-7 hours",
            "from-purple-400 to-pink-500",
            Tier::MegaBooms,
            ["$40", "$75", "$140", "$260"],
        ),
        variety(
            "Liberty Caps",
            "Psilocybe semilanceata",
            "Classic European variety with gentle, flowing experiences",
            &["Gentle Euphoria", "Nature Connection", "Creative Flow"],
            Potency::Moderate,
            "4-5 hours",
            "from-green-400 to-emerald-500",
            Tier::LightTier,
            ["$25", "$45", "$85", "$160"],
        ),
        variety(
            "Albino A+",
            "Psilocybe cubensis albino",
            "Rare albino variety with clean, clear-headed journeys",
            &["Mental Clarity", "Emotional Release", "Peaceful Insights"],
            Potency::ModerateHigh,
            "5-6 hours",
            "from-white to-gray-300",
            Tier::MediumTier,
            ["$30", "$55", "$100", "$190"],
        ),
        variety(
            "McKennaii",
            "Psilocybe cubensis",
            "Named after Terence McKenna, for philosophical exploration",
            &["Deep Thoughts", "Pattern Recognition", "Cosmic Awareness"],
            Potency::High,
            "6-7 hours",
            "from-indigo-400 to-purple-600",
            Tier::Boomers,
            ["$35", "$65", "$120", "$220"],
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn variety(
    name: &str,
    scientific: &str,
    description: &str,
    effects: &[&str],
    potency: Potency,
    duration: &str,
    color: &str,
    tier: Tier,
    prices: [&str; 4],
) -> ItemDraft {
    let pricing = ["1/8", "1/4", "1/2", "Oz"]
        .into_iter()
        .zip(prices)
        .map(|(label, price)| (label.to_string(), price.to_string()))
        .collect();
    ItemDraft {
        name: name.to_string(),
        scientific: scientific.to_string(),
        description: description.to_string(),
        effects: effects.iter().map(|effect| effect.to_string()).collect(),
        potency,
        duration: duration.to_string(),
        color: color.to_string(),
        image: None,
        tier,
        pricing,
        category: Category::Mushroom,
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morel_core::validate_draft;
    use std::collections::BTreeMap;

    #[test]
    fn test_every_seed_draft_validates() {
        let drafts = classic_varieties();
        assert_eq!(drafts.len(), 6);
        for draft in &drafts {
            assert!(
                validate_draft(draft).is_ok(),
                "seed draft {} failed validation",
                draft.name
            );
        }
    }

    #[test]
    fn test_seed_names_are_unique() {
        let drafts = classic_varieties();
        let names: BTreeMap<&str, usize> =
            drafts
                .iter()
                .map(|d| d.name.as_str())
                .fold(BTreeMap::new(), |mut acc, name| {
                    *acc.entry(name).or_default() += 1;
                    acc
                });
        assert!(names.values().all(|&count| count == 1));
    }
}
