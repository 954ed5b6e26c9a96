use std::fmt;
use std::str::FromStr;

/// Outcome of combining a Genre with a Type, from best to worst.
/// `NotBad` is the implicit default: it owns no tier data and is returned
/// whenever no tier claims the pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rating {
    Amazing,
    Creative,
    NotBad,
    Hmm,
    NotGood,
}

impl Rating {
    /// Canonical priority order. Tier lookup walks this order and the first
    /// match wins, which also resolves pairs claimed by more than one tier.
    /// Sorting and filtering must go through this constant rather than
    /// numeric literals.
    pub const PRIORITY_ORDER: [Rating; 5] = [
        Rating::Amazing,
        Rating::Creative,
        Rating::NotBad,
        Rating::Hmm,
        Rating::NotGood,
    ];

    /// Position in `PRIORITY_ORDER`; lower is better.
    pub fn priority(self) -> usize {
        Self::PRIORITY_ORDER
            .iter()
            .position(|r| *r == self)
            .unwrap_or(Self::PRIORITY_ORDER.len())
    }

    /// The label shown to the user, matching the in-game strings.
    pub fn label(self) -> &'static str {
        match self {
            Rating::Amazing => "Amazing!",
            Rating::Creative => "Creative",
            Rating::NotBad => "Not Bad",
            Rating::Hmm => "Hmm...",
            Rating::NotGood => "Not Good",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

impl FromStr for Rating {
    type Err = String;

    /// Accepts display labels ("Amazing!", "Not Bad") as well as
    /// case/punctuation-insensitive names ("amazing", "not-bad", "NOTBAD").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "amazing" => Ok(Rating::Amazing),
            "creative" => Ok(Rating::Creative),
            "notbad" => Ok(Rating::NotBad),
            "hmm" => Ok(Rating::Hmm),
            "notgood" => Ok(Rating::NotGood),
            _ => Err(format!(
                "Unknown rating \"{}\", expected one of: amazing, creative, not-bad, hmm, not-good",
                s
            )),
        }
    }
}

/// Filter argument for listing combos: either one rating or the "All"
/// sentinel, which keeps everything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatingFilter {
    All,
    Only(Rating),
}

impl fmt::Display for RatingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingFilter::All => f.write_str("All"),
            RatingFilter::Only(rating) => f.write_str(rating.label()),
        }
    }
}

impl FromStr for RatingFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if normalize(s) == "all" {
            return Ok(RatingFilter::All);
        }
        Rating::from_str(s).map(RatingFilter::Only).map_err(|_| {
            format!(
                "Unknown filter \"{}\", expected \"all\" or one of: amazing, creative, not-bad, hmm, not-good",
                s
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_follows_canonical_order() {
        assert_eq!(Rating::Amazing.priority(), 0);
        assert_eq!(Rating::Creative.priority(), 1);
        assert_eq!(Rating::NotBad.priority(), 2);
        assert_eq!(Rating::Hmm.priority(), 3);
        assert_eq!(Rating::NotGood.priority(), 4);
    }

    #[test]
    fn labels_match_game_strings() {
        assert_eq!(Rating::Amazing.label(), "Amazing!");
        assert_eq!(Rating::Creative.label(), "Creative");
        assert_eq!(Rating::NotBad.label(), "Not Bad");
        assert_eq!(Rating::Hmm.label(), "Hmm...");
        assert_eq!(Rating::NotGood.label(), "Not Good");
    }

    #[test]
    fn parses_labels_and_names() {
        assert_eq!("Amazing!".parse::<Rating>(), Ok(Rating::Amazing));
        assert_eq!("amazing".parse::<Rating>(), Ok(Rating::Amazing));
        assert_eq!("Not Bad".parse::<Rating>(), Ok(Rating::NotBad));
        assert_eq!("not-bad".parse::<Rating>(), Ok(Rating::NotBad));
        assert_eq!("NOTBAD".parse::<Rating>(), Ok(Rating::NotBad));
        assert_eq!("Hmm...".parse::<Rating>(), Ok(Rating::Hmm));
        assert_eq!("not good".parse::<Rating>(), Ok(Rating::NotGood));
        assert!("great".parse::<Rating>().is_err());
        assert!("".parse::<Rating>().is_err());
    }

    #[test]
    fn parses_filter_with_all_sentinel() {
        assert_eq!("all".parse::<RatingFilter>(), Ok(RatingFilter::All));
        assert_eq!("All".parse::<RatingFilter>(), Ok(RatingFilter::All));
        assert_eq!(
            "creative".parse::<RatingFilter>(),
            Ok(RatingFilter::Only(Rating::Creative))
        );
        assert!("everything".parse::<RatingFilter>().is_err());
    }
}
