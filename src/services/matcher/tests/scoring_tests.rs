use super::*;
use crate::database::models::{Candidate, SourceClass, ALIAS_BLOB_SEPARATOR};
use crate::services::matcher::normalize::{normalize, normalize_joined};

fn candidate(id: i64, name: &str, aliases: &[&str]) -> Candidate {
    Candidate {
        id,
        name: name.to_string(),
        normalized_name: normalize_joined(name),
        alias_blob: aliases.join(&ALIAS_BLOB_SEPARATOR.to_string()),
        price_material: 10.0,
        price_labor: 5.0,
        unit: "ks".to_string(),
        vendor: Some("Vendor".to_string()),
        date_offer: Some("2024-05-01".to_string()),
        source_type: SourceClass::Supplier,
    }
}

fn score(query: &str, cand: &Candidate) -> CandidateScore {
    score_candidate(&normalize(query), &normalize_joined(query), cand)
}

#[test]
fn test_full_overlap_scores_high() {
    let cand = candidate(1, "Kabel CYKY-J 3x1.5", &[]);
    let result = score("kabel cyky 3x1,5", &cand);

    assert_eq!(result.overlap_count, 3);
    assert!(result.composite > 0.9, "composite was {}", result.composite);
    assert!(result.composite <= 1.0);
}

#[test]
fn test_no_overlap_scores_low() {
    let cand = candidate(1, "Sádrokartonová deska bílá", &[]);
    let result = score("bílej papundekl", &cand);

    assert_eq!(result.overlap_count, 0);
    assert!(result.composite < 0.1, "composite was {}", result.composite);
}

#[test]
fn test_learned_alias_lifts_score_to_one() {
    let cand = candidate(1, "Sádrokartonová deska bílá", &["bílej papundekl"]);
    let result = score("bílej papundekl", &cand);

    // Both tokens hit the alias text and the alias is an exact string match.
    assert!(
        (result.composite - 1.0).abs() < 1e-9,
        "composite was {}",
        result.composite
    );
}

#[test]
fn test_alias_similarity_not_diluted_by_other_aliases() {
    let cand = candidate(
        1,
        "Sádrokartonová deska bílá",
        &["gipsova deska", "bílej papundekl", "sdk deska standard"],
    );
    let result = score("bílej papundekl", &cand);
    assert!((result.composite - 1.0).abs() < 1e-9);
}

#[test]
fn test_self_similarity_is_maximal() {
    let cand = candidate(1, "Kabel CYKY-J 3x1.5", &[]);
    let self_score = score(&cand.normalized_name.clone(), &cand).composite;

    for unrelated in ["beton c25", "stožár ocelový", "xyz", "trubka pvc 110"] {
        let other = score(unrelated, &cand).composite;
        assert!(
            self_score >= other,
            "self {self_score} < '{unrelated}' {other}"
        );
    }
    assert!((self_score - 1.0).abs() < 1e-9);
}

#[test]
fn test_ranking_favors_more_token_hits() {
    let narrow = candidate(1, "Kabel AYKY", &[]);
    let wide = candidate(2, "Kabel CYKY-J 3x1.5", &[]);

    let query = "kabel cyky 3x1,5";
    let narrow_score = score(query, &narrow);
    let wide_score = score(query, &wide);
    assert!(wide_score.ranking > narrow_score.ranking);
}

#[test]
fn test_empty_token_list_gives_zero_overlap() {
    let cand = candidate(1, "Kabel CYKY-J 3x1.5", &[]);
    let result = score_candidate(&[], "ab", &cand);
    assert_eq!(result.overlap_count, 0);
    // Only the similarity term remains, weighted at 0.2.
    assert!(result.composite <= 0.2);
}

#[test]
fn test_searchable_text_includes_alias_words() {
    let cand = candidate(1, "Deska", &["bílej papundekl"]);
    assert_eq!(searchable_text(&cand), "deska bílej papundekl");
}
