//! Zodiac compatibility types.
//!
//! Shared vocabulary between the remote analysis path and the local
//! fallback generator: zodiac signs, the five-level compatibility scale,
//! the analysis input, and the report both paths produce. Callers never
//! branch on which path built a report; the shape is identical.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// The twelve zodiac signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Zodiac {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// All signs in calendar order.
pub const ALL_SIGNS: [Zodiac; 12] = [
    Zodiac::Aries,
    Zodiac::Taurus,
    Zodiac::Gemini,
    Zodiac::Cancer,
    Zodiac::Leo,
    Zodiac::Virgo,
    Zodiac::Libra,
    Zodiac::Scorpio,
    Zodiac::Sagittarius,
    Zodiac::Capricorn,
    Zodiac::Aquarius,
    Zodiac::Pisces,
];

impl Zodiac {
    /// Parse a lowercase sign key, e.g. `"aries"`.
    pub fn from_key(key: &str) -> Option<Self> {
        let sign = match key {
            "aries" => Zodiac::Aries,
            "taurus" => Zodiac::Taurus,
            "gemini" => Zodiac::Gemini,
            "cancer" => Zodiac::Cancer,
            "leo" => Zodiac::Leo,
            "virgo" => Zodiac::Virgo,
            "libra" => Zodiac::Libra,
            "scorpio" => Zodiac::Scorpio,
            "sagittarius" => Zodiac::Sagittarius,
            "capricorn" => Zodiac::Capricorn,
            "aquarius" => Zodiac::Aquarius,
            "pisces" => Zodiac::Pisces,
            _ => return None,
        };
        Some(sign)
    }

    /// The lowercase key form of the sign.
    pub fn key(&self) -> &'static str {
        match self {
            Zodiac::Aries => "aries",
            Zodiac::Taurus => "taurus",
            Zodiac::Gemini => "gemini",
            Zodiac::Cancer => "cancer",
            Zodiac::Leo => "leo",
            Zodiac::Virgo => "virgo",
            Zodiac::Libra => "libra",
            Zodiac::Scorpio => "scorpio",
            Zodiac::Sagittarius => "sagittarius",
            Zodiac::Capricorn => "capricorn",
            Zodiac::Aquarius => "aquarius",
            Zodiac::Pisces => "pisces",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Zodiac::Aries => "Aries",
            Zodiac::Taurus => "Taurus",
            Zodiac::Gemini => "Gemini",
            Zodiac::Cancer => "Cancer",
            Zodiac::Leo => "Leo",
            Zodiac::Virgo => "Virgo",
            Zodiac::Libra => "Libra",
            Zodiac::Scorpio => "Scorpio",
            Zodiac::Sagittarius => "Sagittarius",
            Zodiac::Capricorn => "Capricorn",
            Zodiac::Aquarius => "Aquarius",
            Zodiac::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for Zodiac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Five-level compatibility scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityLevel {
    /// Score 90 and above.
    Perfect,
    /// Score 80-89.
    High,
    /// Score 70-79.
    Good,
    /// Score 60-69.
    Fair,
    /// Score below 60.
    NeedsWork,
}

impl CompatibilityLevel {
    /// Derive the level from a clamped [0,100] score.
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => CompatibilityLevel::Perfect,
            80..=89 => CompatibilityLevel::High,
            70..=79 => CompatibilityLevel::Good,
            60..=69 => CompatibilityLevel::Fair,
            _ => CompatibilityLevel::NeedsWork,
        }
    }

    /// Parse a level label, case-insensitively, with or without spaces.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace([' ', '_'], "");
        let level = match normalized.as_str() {
            "perfect" | "perfectmatch" => CompatibilityLevel::Perfect,
            "high" | "highmatch" | "highlycompatible" => CompatibilityLevel::High,
            "good" | "goodmatch" => CompatibilityLevel::Good,
            "fair" | "fairmatch" => CompatibilityLevel::Fair,
            "needswork" => CompatibilityLevel::NeedsWork,
            _ => return None,
        };
        Some(level)
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            CompatibilityLevel::Perfect => "perfect match",
            CompatibilityLevel::High => "high match",
            CompatibilityLevel::Good => "good match",
            CompatibilityLevel::Fair => "fair match",
            CompatibilityLevel::NeedsWork => "needs work",
        }
    }
}

impl fmt::Display for CompatibilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Input to a compatibility analysis, whichever path produces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInput {
    /// The owner's zodiac sign.
    pub owner_zodiac: Zodiac,
    /// Free-form pet type, e.g. "cat".
    pub pet_type: String,
    /// Selected pet trait keys, e.g. "curious", "calm".
    pub pet_traits: BTreeSet<String>,
}

impl MatchInput {
    /// Build an input from a sign and trait keys.
    pub fn new<I, S>(owner_zodiac: Zodiac, pet_type: impl Into<String>, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            owner_zodiac,
            pet_type: pet_type.into(),
            pet_traits: traits.into_iter().map(Into::into).collect(),
        }
    }
}

/// The structured result of a compatibility analysis.
///
/// Both the remote model path and the local fallback produce exactly this
/// shape, so consumers never need to know which path ran.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    /// The sign assigned to the pet.
    pub pet_zodiac: Zodiac,
    /// Compatibility score, always within [0,100].
    pub compatibility_score: u8,
    /// Level derived from (or consistent with) the score.
    pub compatibility_level: CompatibilityLevel,
    /// Prose analysis of the pairing.
    pub analysis: String,
    /// Actionable suggestions.
    pub tips: Vec<String>,
    /// A short vignette about the pairing.
    pub story: String,
    /// Two or three playful tags for the pet's sign.
    pub fun_tags: Vec<String>,
}

/// Clamp an arbitrary integer score into the report range.
pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(0, 100) as u8
}
