use serde::{Deserialize, Serialize};
use std::fmt;

// ===== Persuasion Principles =====

/// The six Cialdini persuasion principles used to classify test ideas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PersuasionPrinciple {
    Reciprocity,
    Commitment,
    SocialProof,
    Authority,
    Liking,
    Scarcity,
}

impl PersuasionPrinciple {
    pub fn all() -> [PersuasionPrinciple; 6] {
        use PersuasionPrinciple::*;
        [Reciprocity, Commitment, SocialProof, Authority, Liking, Scarcity]
    }
}

impl fmt::Display for PersuasionPrinciple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersuasionPrinciple::Reciprocity => write!(f, "reciprocity"),
            PersuasionPrinciple::Commitment => write!(f, "commitment"),
            PersuasionPrinciple::SocialProof => write!(f, "social-proof"),
            PersuasionPrinciple::Authority => write!(f, "authority"),
            PersuasionPrinciple::Liking => write!(f, "liking"),
            PersuasionPrinciple::Scarcity => write!(f, "scarcity"),
        }
    }
}

impl std::str::FromStr for PersuasionPrinciple {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reciprocity" => Ok(PersuasionPrinciple::Reciprocity),
            "commitment" => Ok(PersuasionPrinciple::Commitment),
            "social-proof" | "social_proof" => Ok(PersuasionPrinciple::SocialProof),
            "authority" => Ok(PersuasionPrinciple::Authority),
            "liking" => Ok(PersuasionPrinciple::Liking),
            "scarcity" => Ok(PersuasionPrinciple::Scarcity),
            other => Err(format!("Unknown principle '{}'", other)),
        }
    }
}

// ===== Principle Reference Cards =====

/// Reference card content for one persuasion principle.
/// Static catalog data, serialized for machine-readable output only.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PrincipleCard {
    pub principle: PersuasionPrinciple,
    pub name: &'static str,
    pub description: &'static str,
    pub examples: [&'static str; 3],
    pub implementation_tip: &'static str,
}

impl PrincipleCard {
    pub fn all() -> Vec<PrincipleCard> {
        PersuasionPrinciple::all()
            .into_iter()
            .map(Self::for_principle)
            .collect()
    }

    pub fn for_principle(principle: PersuasionPrinciple) -> PrincipleCard {
        match principle {
            PersuasionPrinciple::Reciprocity => PrincipleCard {
                principle,
                name: "Reciprocity",
                description: "People feel obliged to return favors. Give value \
                              first and visitors become far more willing to give back.",
                examples: [
                    "Free trial or sample before asking for payment",
                    "Genuinely useful content with no strings attached",
                    "An unexpected bonus at signup",
                ],
                implementation_tip: "Provide value before asking for anything in return.",
            },
            PersuasionPrinciple::Commitment => PrincipleCard {
                principle,
                name: "Commitment & Consistency",
                description: "Once people commit to something small, they strive \
                              to act consistently with it.",
                examples: [
                    "Small first commitments such as a wishlist or quiz",
                    "Progress bars that show how far the user has come",
                    "Reminders of choices the user already made",
                ],
                implementation_tip: "Chain micro-commitments before the big ask.",
            },
            PersuasionPrinciple::SocialProof => PrincipleCard {
                principle,
                name: "Social Proof",
                description: "When uncertain, people copy what others are doing.",
                examples: [
                    "Customer reviews and ratings near the buy button",
                    "Live purchase or signup counts",
                    "'Most popular' badges on recommended plans",
                ],
                implementation_tip: "Show real-time activity from people like the visitor.",
            },
            PersuasionPrinciple::Authority => PrincipleCard {
                principle,
                name: "Authority",
                description: "People defer to credible experts and symbols of competence.",
                examples: [
                    "Endorsements from recognized experts",
                    "Awards and press mentions",
                    "Industry certifications and security seals",
                ],
                implementation_tip: "Place trust signals at the moment of decision.",
            },
            PersuasionPrinciple::Liking => PrincipleCard {
                principle,
                name: "Liking",
                description: "People say yes to those they know and like.",
                examples: [
                    "A friendly, human tone in copy",
                    "Storytelling about real customers",
                    "Case studies featuring similar people",
                ],
                implementation_tip: "Mirror the visitor with relatable personas.",
            },
            PersuasionPrinciple::Scarcity => PrincipleCard {
                principle,
                name: "Scarcity",
                description: "Opportunities seem more valuable when they are limited.",
                examples: [
                    "Limited stock indicators",
                    "Countdown timers on offers",
                    "Time-limited discounts",
                ],
                implementation_tip: "Show honest constraints; fake scarcity destroys trust.",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_principles_have_cards() {
        let cards = PrincipleCard::all();
        assert_eq!(cards.len(), 6);

        for card in &cards {
            assert!(!card.name.is_empty());
            assert!(!card.description.is_empty());
            assert_eq!(card.examples.len(), 3);
        }
    }

    #[test]
    fn test_principle_parsing() {
        assert_eq!(
            "social-proof".parse::<PersuasionPrinciple>().unwrap(),
            PersuasionPrinciple::SocialProof
        );
        assert_eq!(
            "Scarcity".parse::<PersuasionPrinciple>().unwrap(),
            PersuasionPrinciple::Scarcity
        );
        assert!("urgency".parse::<PersuasionPrinciple>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for principle in PersuasionPrinciple::all() {
            let parsed: PersuasionPrinciple = principle.to_string().parse().unwrap();
            assert_eq!(parsed, principle);
        }
    }
}
