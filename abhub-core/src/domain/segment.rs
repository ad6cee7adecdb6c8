use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::principle::PersuasionPrinciple;

// ===== Generation Segments =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Generation {
    GenZ,
    Millennial,
    GenX,
    Boomer,
}

impl Generation {
    pub fn all() -> [Generation; 4] {
        use Generation::*;
        [GenZ, Millennial, GenX, Boomer]
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generation::GenZ => write!(f, "gen-z"),
            Generation::Millennial => write!(f, "millennial"),
            Generation::GenX => write!(f, "gen-x"),
            Generation::Boomer => write!(f, "boomer"),
        }
    }
}

impl std::str::FromStr for Generation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gen-z" | "genz" => Ok(Generation::GenZ),
            "millennial" => Ok(Generation::Millennial),
            "gen-x" | "genx" => Ok(Generation::GenX),
            "boomer" => Ok(Generation::Boomer),
            other => Err(format!("Unknown segment '{}'", other)),
        }
    }
}

// ===== Segment Profiles =====

/// Benchmark profile for one generation cohort.
///
/// Conversion and device figures are industry reference numbers; the
/// principle sensitivities are working assumptions meant to be validated
/// with real tests, scored 1-10.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SegmentProfile {
    pub generation: Generation,
    pub name: &'static str,
    pub birth_years: &'static str,
    pub description: &'static str,
    /// Baseline conversion rate in percent.
    pub conversion_rate: f64,
    pub avg_order_value: Decimal,
    /// Traffic share by device, in percent of sessions.
    pub mobile_share: u8,
    pub desktop_share: u8,
    pub tablet_share: u8,
    pub social_proof_sensitivity: u8,
    pub scarcity_sensitivity: u8,
    pub authority_sensitivity: u8,
    pub behaviors: Vec<&'static str>,
    pub recommendations: Vec<&'static str>,
}

impl SegmentProfile {
    pub fn all() -> Vec<SegmentProfile> {
        Generation::all()
            .into_iter()
            .map(Self::for_generation)
            .collect()
    }

    pub fn for_generation(generation: Generation) -> SegmentProfile {
        match generation {
            Generation::GenZ => SegmentProfile {
                generation,
                name: "Gen Z",
                birth_years: "1997-2012",
                description: "Digital natives who shop mobile-first and \
                              discover products through social feeds.",
                conversion_rate: 2.8,
                avg_order_value: Decimal::from(45),
                mobile_share: 85,
                desktop_share: 10,
                tablet_share: 5,
                social_proof_sensitivity: 9,
                scarcity_sensitivity: 7,
                authority_sensitivity: 5,
                behaviors: vec![
                    "Shops almost entirely on mobile",
                    "Discovers products through creators and social media",
                    "Expects instant page loads and one-tap checkout",
                    "Distrusts polished traditional advertising",
                ],
                recommendations: vec![
                    "Lead with user-generated reviews and creator content",
                    "Design every flow for one thumb",
                    "Use authentic, unpolished visuals over studio shots",
                ],
            },
            Generation::Millennial => SegmentProfile {
                generation,
                name: "Millennial",
                birth_years: "1981-1996",
                description: "Research-driven comparison shoppers who reward \
                              loyalty programs and clear value.",
                conversion_rate: 3.5,
                avg_order_value: Decimal::from(65),
                mobile_share: 70,
                desktop_share: 25,
                tablet_share: 5,
                social_proof_sensitivity: 8,
                scarcity_sensitivity: 8,
                authority_sensitivity: 7,
                behaviors: vec![
                    "Compares options across several sites before buying",
                    "Reads reviews thoroughly, including the bad ones",
                    "Responds to loyalty and rewards programs",
                    "Values experiences over possessions",
                ],
                recommendations: vec![
                    "Surface comparison tables and detailed specs",
                    "Run limited-time offers with honest end dates",
                    "Make loyalty rewards visible at checkout",
                ],
            },
            Generation::GenX => SegmentProfile {
                generation,
                name: "Gen X",
                birth_years: "1965-1980",
                description: "Pragmatic, value-conscious buyers who convert \
                              best once trust is established.",
                conversion_rate: 4.2,
                avg_order_value: Decimal::from(85),
                mobile_share: 55,
                desktop_share: 40,
                tablet_share: 5,
                social_proof_sensitivity: 6,
                scarcity_sensitivity: 6,
                authority_sensitivity: 8,
                behaviors: vec![
                    "Splits shopping between desktop and mobile",
                    "Weighs price against durability",
                    "Loyal to brands that have earned trust",
                    "Reads return policies before purchase",
                ],
                recommendations: vec![
                    "Emphasize warranties and money-back guarantees",
                    "Keep navigation conventional and predictable",
                    "Show total cost up front with no surprises",
                ],
            },
            Generation::Boomer => SegmentProfile {
                generation,
                name: "Baby Boomer",
                birth_years: "1946-1964",
                description: "Deliberate buyers who value service, expertise \
                              and established reputations.",
                conversion_rate: 3.8,
                avg_order_value: Decimal::from(95),
                mobile_share: 40,
                desktop_share: 55,
                tablet_share: 5,
                social_proof_sensitivity: 5,
                scarcity_sensitivity: 4,
                authority_sensitivity: 9,
                behaviors: vec![
                    "Prefers desktop and larger screens",
                    "Calls support rather than searching FAQs",
                    "Trusts established brands and expert opinion",
                    "Takes time to decide, rarely impulse-buys",
                ],
                recommendations: vec![
                    "Display certifications and expert endorsements prominently",
                    "Use larger type and high-contrast buttons",
                    "Offer a phone number, not just chat",
                ],
            },
        }
    }

    /// Sensitivity score for a principle, where the catalog tracks one.
    pub fn sensitivity(&self, principle: PersuasionPrinciple) -> Option<u8> {
        match principle {
            PersuasionPrinciple::SocialProof => Some(self.social_proof_sensitivity),
            PersuasionPrinciple::Scarcity => Some(self.scarcity_sensitivity),
            PersuasionPrinciple::Authority => Some(self.authority_sensitivity),
            _ => None,
        }
    }
}

/// The generation most receptive to a principle, if the catalog scores it.
pub fn most_sensitive_to(principle: PersuasionPrinciple) -> Option<Generation> {
    SegmentProfile::all()
        .into_iter()
        .filter_map(|profile| {
            profile
                .sensitivity(principle)
                .map(|score| (profile.generation, score))
        })
        .max_by_key(|(_, score)| *score)
        .map(|(generation, _)| generation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_all_generations() {
        let profiles = SegmentProfile::all();
        assert_eq!(profiles.len(), 4);

        for profile in &profiles {
            assert!(profile.conversion_rate > 0.0);
            assert!(profile.avg_order_value > Decimal::ZERO);
            assert_eq!(
                profile.mobile_share + profile.desktop_share + profile.tablet_share,
                100
            );
            assert!(!profile.behaviors.is_empty());
            assert!(!profile.recommendations.is_empty());
        }
    }

    #[test]
    fn test_most_sensitive_segments() {
        assert_eq!(
            most_sensitive_to(PersuasionPrinciple::SocialProof),
            Some(Generation::GenZ)
        );
        assert_eq!(
            most_sensitive_to(PersuasionPrinciple::Scarcity),
            Some(Generation::Millennial)
        );
        assert_eq!(
            most_sensitive_to(PersuasionPrinciple::Authority),
            Some(Generation::Boomer)
        );
        assert_eq!(most_sensitive_to(PersuasionPrinciple::Liking), None);
    }

    #[test]
    fn test_generation_parsing() {
        assert_eq!("gen-z".parse::<Generation>().unwrap(), Generation::GenZ);
        assert_eq!("GenX".parse::<Generation>().unwrap(), Generation::GenX);
        assert!("gen-alpha".parse::<Generation>().is_err());
    }

    #[test]
    fn test_gen_x_converts_best() {
        let best = SegmentProfile::all()
            .into_iter()
            .max_by(|a, b| a.conversion_rate.total_cmp(&b.conversion_rate))
            .unwrap();
        assert_eq!(best.generation, Generation::GenX);
    }
}
