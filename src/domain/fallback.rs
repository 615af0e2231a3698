//! Local compatibility generator.
//!
//! The deterministic-shape fallback used whenever the remote analysis
//! path fails. It accepts the same input as the remote path and produces
//! a structurally identical [`CompatibilityReport`], so callers never
//! branch on which path ran. The heuristic is pure and total over valid
//! inputs: it cannot fail.

use crate::domain::compat::{
    CompatibilityLevel, CompatibilityReport, MatchInput, Zodiac, ALL_SIGNS,
};
use rand::Rng;

/// Per-sign persona phrases used by the story templates.
struct Persona {
    personality: &'static str,
    behavior: &'static str,
    interaction: &'static str,
}

/// Base compatibility score for an owner's sign.
fn base_score(sign: Zodiac) -> u8 {
    match sign {
        Zodiac::Aries => 85,
        Zodiac::Taurus => 78,
        Zodiac::Gemini => 92,
        Zodiac::Cancer => 88,
        Zodiac::Leo => 90,
        Zodiac::Virgo => 82,
        Zodiac::Libra => 86,
        Zodiac::Scorpio => 79,
        Zodiac::Sagittarius => 94,
        Zodiac::Capricorn => 81,
        Zodiac::Aquarius => 87,
        Zodiac::Pisces => 89,
    }
}

/// Pet trait keys that resonate with an owner's sign.
///
/// Shares the vocabulary of [`MatchInput::pet_traits`] so the affinity
/// bonus can actually fire.
fn affinity_traits(sign: Zodiac) -> &'static [&'static str] {
    match sign {
        Zodiac::Aries => &["active", "playful", "brave"],
        Zodiac::Taurus => &["gentle", "calm", "loyal"],
        Zodiac::Gemini => &["intelligent", "curious", "active"],
        Zodiac::Cancer => &["gentle", "clingy", "sensitive"],
        Zodiac::Leo => &["brave", "confident", "active"],
        Zodiac::Virgo => &["intelligent", "independent", "picky"],
        Zodiac::Libra => &["gentle", "friendly", "elegant"],
        Zodiac::Scorpio => &["independent", "mysterious", "loyal"],
        Zodiac::Sagittarius => &["active", "free", "friendly"],
        Zodiac::Capricorn => &["calm", "loyal", "independent"],
        Zodiac::Aquarius => &["intelligent", "quirky", "friendly"],
        Zodiac::Pisces => &["gentle", "sensitive", "clingy"],
    }
}

fn persona(sign: Zodiac) -> Persona {
    match sign {
        Zodiac::Aries => Persona {
            personality: "fiery and impulsive",
            behavior: "charging headfirst into everything",
            interaction: "loves a good chase game",
        },
        Zodiac::Taurus => Persona {
            personality: "warm and steady",
            behavior: "taking life at its own unhurried pace",
            interaction: "savors quiet companionship",
        },
        Zodiac::Gemini => Persona {
            personality: "clever and curious",
            behavior: "switching moods by the minute",
            interaction: "chases anything new",
        },
        Zodiac::Cancer => Persona {
            personality: "tender and attentive",
            behavior: "wearing its heart on its sleeve",
            interaction: "needs to feel safe",
        },
        Zodiac::Leo => Persona {
            personality: "proud and confident",
            behavior: "holding court wherever it goes",
            interaction: "basks in attention",
        },
        Zodiac::Virgo => Persona {
            personality: "precise and particular",
            behavior: "keeping everything just so",
            interaction: "notices every small detail",
        },
        Zodiac::Libra => Persona {
            personality: "graceful and even-keeled",
            behavior: "seeking balance in all things",
            interaction: "drawn to beautiful things",
        },
        Zodiac::Scorpio => Persona {
            personality: "intense and enigmatic",
            behavior: "watching everything with quiet focus",
            interaction: "fiercely loyal yet independent",
        },
        Zodiac::Sagittarius => Persona {
            personality: "free-spirited and bold",
            behavior: "forever exploring the next horizon",
            interaction: "needs room to roam",
        },
        Zodiac::Capricorn => Persona {
            personality: "grounded and dependable",
            behavior: "moving through the day with method",
            interaction: "thrives on routine",
        },
        Zodiac::Aquarius => Persona {
            personality: "inventive and offbeat",
            behavior: "doing things its own peculiar way",
            interaction: "prefers unconventional games",
        },
        Zodiac::Pisces => Persona {
            personality: "dreamy and sensitive",
            behavior: "drifting gently through the day",
            interaction: "needs emotional closeness",
        },
    }
}

/// Playful tags per pet sign; 2-3 of these end up in the report.
fn tag_pool(sign: Zodiac) -> &'static [&'static str] {
    match sign {
        Zodiac::Aries => &[
            "fearless little vanguard",
            "perpetual-motion fireball",
            "instant best friend to every stranger",
        ],
        Zodiac::Taurus => &[
            "undercover snack custodian",
            "slow-living philosopher",
            "connoisseur of the softest cushion",
        ],
        Zodiac::Gemini => &[
            "detective with boundless curiosity",
            "mood-flip master",
            "explorer of everything new",
        ],
        Zodiac::Cancer => &[
            "gentle little guardian angel",
            "resident drama performer",
            "keeper of the household hearth",
        ],
        Zodiac::Leo => &[
            "born headliner",
            "royalty in a fur coat",
            "performance artist craving the spotlight",
        ],
        Zodiac::Virgo => &[
            "perfectionist housekeeper",
            "picky yet devoted life consultant",
            "ace of the smallest details",
        ],
        Zodiac::Libra => &[
            "aesthetics-first charmer",
            "diplomat of peaceful coexistence",
            "textbook case of choice paralysis",
        ],
        Zodiac::Scorpio => &[
            "inscrutable little spy",
            "deep-feeling philosopher",
            "psychic with uncanny intuition",
        ],
        Zodiac::Sagittarius => &[
            "untamed adventurer",
            "sunshine dispenser",
            "always-on-the-road travel buddy",
        ],
        Zodiac::Capricorn => &[
            "tiny grown-up of the household",
            "goal-driven go-getter",
            "quietly accomplished overachiever",
        ],
        Zodiac::Aquarius => &[
            "solo observer of strange human habits",
            "wide-eyed creative genius",
            "one-of-a-kind independent artist",
        ],
        Zodiac::Pisces => &[
            "romantic little poet",
            "soft-hearted dreamer",
            "healer with a magic touch",
        ],
    }
}

const TIPS: [&str; 5] = [
    "Spend unhurried time together to deepen your bond",
    "Learn your pet's quirks and tailor your affection to them",
    "Stay patient; every pet moves at its own pace",
    "Keep a rhythm of daily play to build mutual understanding",
    "Respect your pet's personality instead of trying to change it",
];

fn analysis_templates(owner: Zodiac) -> [String; 3] {
    [
        format!(
            "You and your pet score remarkably well together! A {owner} \
             like you reads its moods with ease, and your personalities \
             overlap in all the right places."
        ),
        format!(
            "Your pet's temperament complements a {owner} beautifully; \
             there is a natural rapport between you two."
        ),
        format!(
            "As a {owner}, you form a complementary pair with your pet, \
             each of you learning from the other's nature."
        ),
    ]
}

fn story_templates(owner: Zodiac, pet: Zodiac) -> [String; 3] {
    let o = persona(owner);
    let p = persona(pet);
    [
        format!(
            "As the sun sets, you, a {owner}, reach down to stroke your \
             little {pet} companion. Your {op} nature lets you understand \
             its habit of {pb}. One evening, coming home worn out, you \
             find it sensing your mood; it {pi}, comforting you in its \
             own peculiar way. In that moment the bond between your two \
             signs feels effortless.",
            op = o.personality,
            pb = p.behavior,
            pi = p.interaction,
        ),
        format!(
            "Morning light spills across the floor while your {pet} pet \
             enjoys the calm. A {owner} through and through, you go about \
             {ob} as you prepare its breakfast. Suddenly it does something \
             that makes you laugh out loud; it {pi}. Your {op} streak and \
             its {pp} temperament spark a game neither of you planned, \
             and the ordinary morning becomes a small shared treasure.",
            ob = o.behavior,
            pi = p.interaction,
            op = o.personality,
            pp = p.personality,
        ),
        format!(
            "On a rainy night you sit reading while your {pet} companion \
             curls up beside you. No words pass between you, yet you each \
             feel the other's presence. Being {op}, you have learned that \
             it {pi}; its way of {pb} has taught you, a {owner}, to \
             treasure this simple companionship.",
            op = o.personality,
            pi = p.interaction,
            pb = p.behavior,
        ),
    ]
}

/// Generates compatibility reports without any remote dependency.
///
/// Construction is free; the generator holds no state. Tests inject a
/// seeded RNG through [`generate_with`](Self::generate_with).
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    /// Create a generator.
    pub fn new() -> Self {
        Self
    }

    /// Produce a report using the thread-local RNG.
    pub fn generate(&self, input: &MatchInput) -> CompatibilityReport {
        self.generate_with(input, &mut rand::thread_rng())
    }

    /// Produce a report using the supplied RNG.
    pub fn generate_with<R: Rng + ?Sized>(
        &self,
        input: &MatchInput,
        rng: &mut R,
    ) -> CompatibilityReport {
        let owner = input.owner_zodiac;

        let affinities = affinity_traits(owner);
        let matching = input
            .pet_traits
            .iter()
            .filter(|t| affinities.contains(&t.as_str()))
            .count() as u32;

        let score = (u32::from(base_score(owner)) + matching * 3).min(100) as u8;
        let pet_zodiac = ALL_SIGNS[rng.gen_range(0..ALL_SIGNS.len())];

        let analyses = analysis_templates(owner);
        let analysis = analyses[rng.gen_range(0..analyses.len())].clone();

        let stories = story_templates(owner, pet_zodiac);
        let story = stories[rng.gen_range(0..stories.len())].clone();

        CompatibilityReport {
            pet_zodiac,
            compatibility_score: score,
            compatibility_level: CompatibilityLevel::from_score(score),
            analysis,
            tips: default_tips(),
            story,
            fun_tags: pick_fun_tags(pet_zodiac, rng),
        }
    }
}

/// The default tip list, also substituted when the remote payload carries
/// malformed tips.
pub fn default_tips() -> Vec<String> {
    TIPS.iter().take(3).map(|t| t.to_string()).collect()
}

/// Pick 2-3 distinct playful tags for a pet sign.
pub fn pick_fun_tags<R: Rng + ?Sized>(pet_zodiac: Zodiac, rng: &mut R) -> Vec<String> {
    let pool = tag_pool(pet_zodiac);
    let want = rng.gen_range(2..=3usize).min(pool.len());

    let mut picked: Vec<String> = Vec::with_capacity(want);
    while picked.len() < want {
        let candidate = pool[rng.gen_range(0..pool.len())];
        if !picked.iter().any(|t| t == candidate) {
            picked.push(candidate.to_string());
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn input(traits: &[&str]) -> MatchInput {
        MatchInput::new(Zodiac::Gemini, "cat", traits.iter().copied())
    }

    #[test]
    fn report_has_all_required_fields() {
        let gen = FallbackGenerator::new();
        let mut rng = StdRng::seed_from_u64(7);
        let report = gen.generate_with(&input(&["curious"]), &mut rng);

        assert!(report.compatibility_score <= 100);
        assert!(!report.analysis.is_empty());
        assert!(!report.story.is_empty());
        assert!(!report.tips.is_empty());
        assert!((2..=3).contains(&report.fun_tags.len()));
    }

    #[test]
    fn matching_traits_raise_the_score() {
        let gen = FallbackGenerator::new();
        let mut rng = StdRng::seed_from_u64(7);

        let none = gen.generate_with(&input(&[]), &mut rng);
        let mut rng = StdRng::seed_from_u64(7);
        let two = gen.generate_with(&input(&["curious", "intelligent"]), &mut rng);

        // Gemini base 92, +3 per matching trait, capped at 100.
        assert_eq!(none.compatibility_score, 92);
        assert_eq!(two.compatibility_score, 98);
    }

    #[test]
    fn score_is_capped_at_one_hundred() {
        let gen = FallbackGenerator::new();
        let mut rng = StdRng::seed_from_u64(1);
        let traits = ["active", "free", "friendly"];
        let input = MatchInput::new(Zodiac::Sagittarius, "dog", traits);

        // Sagittarius base 94 + 9 would overflow the range.
        let report = gen.generate_with(&input, &mut rng);
        assert_eq!(report.compatibility_score, 100);
        assert_eq!(report.compatibility_level, CompatibilityLevel::Perfect);
    }

    #[test]
    fn non_matching_traits_leave_base_score() {
        let gen = FallbackGenerator::new();
        let mut rng = StdRng::seed_from_u64(3);
        let input = MatchInput::new(Zodiac::Taurus, "rabbit", ["quirky"]);

        let report = gen.generate_with(&input, &mut rng);
        assert_eq!(report.compatibility_score, 78);
    }

    #[test]
    fn level_matches_score() {
        let gen = FallbackGenerator::new();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let report = gen.generate_with(&input(&["curious"]), &mut rng);
            assert_eq!(
                report.compatibility_level,
                CompatibilityLevel::from_score(report.compatibility_score)
            );
        }
    }

    #[test]
    fn fun_tags_are_distinct() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let tags = pick_fun_tags(Zodiac::Scorpio, &mut rng);
            assert!((2..=3).contains(&tags.len()));
            let mut deduped = tags.clone();
            deduped.dedup();
            deduped.sort();
            deduped.dedup();
            assert_eq!(deduped.len(), tags.len());
        }
    }

    #[test]
    fn default_tips_has_three_entries() {
        assert_eq!(default_tips().len(), 3);
    }
}
