use super::{Rating, TierData};
use std::collections::{BTreeSet, HashMap};

/// Types force-added to the derived universe. The source data only mentions
/// "Marathon" in the Hmm/Not Good tiers, and without the seed it would vanish
/// from the pickers if those tiers were ever emptied. Extend this list instead
/// of patching the derivation when the data grows another such value.
pub const SEEDED_TYPES: &[&str] = &["Marathon"];

/// Non-fatal issue found while building the table. The table is still usable;
/// problems are reported so the data file can be fixed.
#[derive(Debug, PartialEq, Eq)]
pub enum Problem {
    EmptyGenreName {
        tier: Rating,
    },
    EmptyTypeName {
        tier: Rating,
        genre: String,
    },
    /// Per-genre tier lists are set-like; a repeated entry is dropped
    /// (first occurrence kept) and reported.
    DuplicateTypeInTier {
        tier: Rating,
        genre: String,
        game_type: String,
    },
}

pub struct TableBuild {
    pub table: ComboTable,
    pub problems: Vec<Problem>,
}

/// The immutable rating table: four tier mappings plus the universes derived
/// from them. Built once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct ComboTable {
    amazing: HashMap<String, Vec<String>>,
    creative: HashMap<String, Vec<String>>,
    hmm: HashMap<String, Vec<String>>,
    not_good: HashMap<String, Vec<String>>,
    all_genres: Vec<String>,
    all_types: Vec<String>,
}

fn clean_tier(
    tier: Rating,
    raw: HashMap<String, Vec<String>>,
    problems: &mut Vec<Problem>,
) -> HashMap<String, Vec<String>> {
    let mut out = HashMap::with_capacity(raw.len());
    for (genre, list) in raw {
        if genre.trim().is_empty() {
            problems.push(Problem::EmptyGenreName { tier });
            continue;
        }
        let mut cleaned: Vec<String> = Vec::with_capacity(list.len());
        for game_type in list {
            if game_type.trim().is_empty() {
                problems.push(Problem::EmptyTypeName {
                    tier,
                    genre: genre.clone(),
                });
                continue;
            }
            if cleaned.contains(&game_type) {
                problems.push(Problem::DuplicateTypeInTier {
                    tier,
                    genre: genre.clone(),
                    game_type,
                });
                continue;
            }
            cleaned.push(game_type);
        }
        out.insert(genre, cleaned);
    }
    out
}

impl ComboTable {
    /// Builds the table and derives the universes. Never fails: malformed
    /// entries are dropped and reported as problems, mirroring how the data
    /// would have been silently tolerated by a plain lookup.
    pub fn build(data: TierData) -> TableBuild {
        let mut problems = Vec::new();
        let amazing = clean_tier(Rating::Amazing, data.amazing, &mut problems);
        let creative = clean_tier(Rating::Creative, data.creative, &mut problems);
        let hmm = clean_tier(Rating::Hmm, data.hmm, &mut problems);
        let not_good = clean_tier(Rating::NotGood, data.not_good, &mut problems);

        let mut genres = BTreeSet::new();
        let mut types = BTreeSet::new();
        for seeded in SEEDED_TYPES {
            types.insert(seeded.to_string());
        }
        for tier in [&amazing, &creative, &hmm, &not_good] {
            for (genre, list) in tier.iter() {
                genres.insert(genre.clone());
                for game_type in list {
                    types.insert(game_type.clone());
                }
            }
        }

        let table = ComboTable {
            amazing,
            creative,
            hmm,
            not_good,
            all_genres: genres.into_iter().collect(),
            all_types: types.into_iter().collect(),
        };
        TableBuild { table, problems }
    }

    fn tier(&self, rating: Rating) -> Option<&HashMap<String, Vec<String>>> {
        match rating {
            Rating::Amazing => Some(&self.amazing),
            Rating::Creative => Some(&self.creative),
            Rating::NotBad => None,
            Rating::Hmm => Some(&self.hmm),
            Rating::NotGood => Some(&self.not_good),
        }
    }

    /// Total lookup: walks the tiers in `Rating::PRIORITY_ORDER` and returns
    /// the first one claiming the pair, so a pair listed in two tiers resolves
    /// to the higher-priority one. Unknown genres or types are a normal miss
    /// and fall through to `NotBad`.
    pub fn rating_of(&self, genre: &str, game_type: &str) -> Rating {
        for rating in Rating::PRIORITY_ORDER {
            if let Some(tier) = self.tier(rating) {
                let claimed = tier
                    .get(genre)
                    .map_or(false, |types| types.iter().any(|t| t == game_type));
                if claimed {
                    return rating;
                }
            }
        }
        Rating::NotBad
    }

    /// All distinct genres appearing in any tier, sorted lexicographically.
    pub fn all_genres(&self) -> &[String] {
        &self.all_genres
    }

    /// All distinct types appearing in any tier plus `SEEDED_TYPES`, sorted
    /// lexicographically.
    pub fn all_types(&self) -> &[String] {
        &self.all_types
    }

    pub fn get_genres_count(&self) -> usize {
        self.all_genres.len()
    }

    pub fn get_types_count(&self) -> usize {
        self.all_types.len()
    }

    /// The Amazing-tier list for a genre in source order; empty for genres
    /// without one. `best_combos` depends on this order.
    pub fn amazing_types(&self, genre: &str) -> &[String] {
        self.amazing.get(genre).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(genre, types)| {
                (
                    genre.to_string(),
                    types.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect()
    }

    fn builtin_table() -> ComboTable {
        let build = ComboTable::build(TierData::builtin());
        assert!(build.problems.is_empty());
        build.table
    }

    #[test]
    fn known_pairs_rate_their_tier() {
        let table = builtin_table();
        assert_eq!(table.rating_of("Puzzle", "Checkers"), Rating::Amazing);
        assert_eq!(table.rating_of("RPG", "Art"), Rating::Creative);
        assert_eq!(table.rating_of("Puzzle", "Marathon"), Rating::Hmm);
        assert_eq!(table.rating_of("Shooter", "Marathon"), Rating::NotGood);
        assert_eq!(table.rating_of("Adventure", "Marathon"), Rating::NotGood);
    }

    #[test]
    fn unknown_pairs_default_to_not_bad() {
        let table = builtin_table();
        assert_eq!(table.rating_of("Puzzle", "Zzz-Unknown"), Rating::NotBad);
        assert_eq!(table.rating_of("No Such Genre", "Fantasy"), Rating::NotBad);
        assert_eq!(table.rating_of("", ""), Rating::NotBad);
    }

    #[test]
    fn pair_in_two_tiers_resolves_by_priority_order() {
        // The shipped data has one such pair.
        let table = builtin_table();
        assert_eq!(table.rating_of("Educational", "Card Game"), Rating::Amazing);

        // Synthetic check for a tier combination the data does not carry.
        let data = TierData {
            amazing: HashMap::new(),
            creative: tier(&[("Quiz", &["Jetpack"])]),
            hmm: tier(&[("Quiz", &["Jetpack"])]),
            not_good: tier(&[("Quiz", &["Jetpack"])]),
        };
        let build = ComboTable::build(data);
        assert_eq!(build.table.rating_of("Quiz", "Jetpack"), Rating::Creative);
    }

    #[test]
    fn universes_are_sorted_and_deduped() {
        let table = builtin_table();
        let genres = table.all_genres();
        let types = table.all_types();

        assert_eq!(genres.len(), 19);
        assert_eq!(types.len(), 76);
        assert!(genres.windows(2).all(|w| w[0] < w[1]));
        assert!(types.windows(2).all(|w| w[0] < w[1]));

        // "Racing" and "Audio Novel" only exist in the Creative tier.
        assert!(genres.contains(&"Racing".to_string()));
        assert!(genres.contains(&"Audio Novel".to_string()));
    }

    #[test]
    fn seeded_type_is_always_selectable() {
        let table = builtin_table();
        assert!(table.all_types().contains(&"Marathon".to_string()));

        // Still present when no tier mentions it at all.
        let empty = ComboTable::build(TierData::default());
        assert!(empty.table.all_types().contains(&"Marathon".to_string()));
    }

    #[test]
    fn duplicate_type_in_tier_is_dropped_and_reported() {
        let data = TierData {
            amazing: tier(&[("RPG", &["Fantasy", "Fantasy", "Ogre"])]),
            ..TierData::default()
        };
        let build = ComboTable::build(data);
        assert_eq!(build.table.amazing_types("RPG"), ["Fantasy", "Ogre"]);
        assert_eq!(
            build.problems,
            vec![Problem::DuplicateTypeInTier {
                tier: Rating::Amazing,
                genre: "RPG".to_string(),
                game_type: "Fantasy".to_string(),
            }]
        );
    }

    #[test]
    fn empty_names_are_dropped_and_reported() {
        let data = TierData {
            amazing: tier(&[("", &["Fantasy"]), ("RPG", &["", "Ogre"])]),
            ..TierData::default()
        };
        let build = ComboTable::build(data);
        assert_eq!(build.table.get_genres_count(), 1);
        assert_eq!(build.table.amazing_types("RPG"), ["Ogre"]);
        assert_eq!(build.problems.len(), 2);
        assert!(build
            .problems
            .contains(&Problem::EmptyGenreName { tier: Rating::Amazing }));
        assert!(build.problems.contains(&Problem::EmptyTypeName {
            tier: Rating::Amazing,
            genre: "RPG".to_string(),
        }));
    }

    #[test]
    fn amazing_types_preserves_source_order() {
        let table = builtin_table();
        assert_eq!(table.amazing_types("RPG"), ["Fantasy", "Mushroom", "Ogre"]);
        assert!(table.amazing_types("Racing").is_empty());
        assert!(table.amazing_types("No Such Genre").is_empty());
    }
}
