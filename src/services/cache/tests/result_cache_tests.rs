use super::*;
use crate::database::models::SourceClass;

fn outcome(item_id: i64, score: f64) -> MatchOutcome {
    MatchOutcome {
        item_id,
        item_name: format!("Item {item_id}"),
        score,
        price_material: 10.0,
        price_labor: 0.0,
        unit: "ks".to_string(),
        vendor: None,
        date_offer: None,
        source_type: SourceClass::Supplier,
        alternatives: Vec::new(),
    }
}

#[test]
fn test_put_then_get_returns_stored_result() {
    let cache = ResultCache::default();
    cache.put("kabel cyky", MatchType::Material, 0.2, Some(outcome(1, 0.9)));

    let hit = cache
        .get("kabel cyky", MatchType::Material, 0.2)
        .expect("should hit");
    assert_eq!(hit.unwrap().item_id, 1);
}

#[test]
fn test_negative_results_are_cached() {
    let cache = ResultCache::default();
    cache.put("neexistuje", MatchType::Material, 0.2, None);

    let hit = cache.get("neexistuje", MatchType::Material, 0.2);
    assert_eq!(hit, Some(None));
}

#[test]
fn test_distinct_thresholds_cached_separately() {
    let cache = ResultCache::default();
    cache.put("kabel", MatchType::Material, 0.2, Some(outcome(1, 0.3)));
    cache.put("kabel", MatchType::Material, 0.4, None);

    assert!(cache
        .get("kabel", MatchType::Material, 0.2)
        .unwrap()
        .is_some());
    assert!(cache
        .get("kabel", MatchType::Material, 0.4)
        .unwrap()
        .is_none());
}

#[test]
fn test_match_types_cached_separately() {
    let cache = ResultCache::default();
    cache.put("kabel", MatchType::Material, 0.2, Some(outcome(1, 0.9)));

    assert!(cache.get("kabel", MatchType::Labor, 0.2).is_none());
}

#[test]
fn test_expired_entry_is_a_miss_and_evicted() {
    let cache = ResultCache::new(Duration::from_millis(0), 16);
    cache.put("kabel", MatchType::Material, 0.2, Some(outcome(1, 0.9)));

    // TTL of zero: expired immediately.
    assert!(cache.get("kabel", MatchType::Material, 0.2).is_none());
    assert_eq!(cache.len(), 0, "expired entry not evicted");
}

#[test]
fn test_invalidate_single_query_spares_others() {
    let cache = ResultCache::default();
    cache.put("kabel", MatchType::Material, 0.2, Some(outcome(1, 0.9)));
    cache.put("kabel", MatchType::Labor, 0.4, None);
    cache.put("deska", MatchType::Material, 0.2, Some(outcome(2, 0.8)));

    cache.invalidate(Some("kabel"));

    // All entries for "kabel" gone, across types and thresholds.
    assert!(cache.get("kabel", MatchType::Material, 0.2).is_none());
    assert!(cache.get("kabel", MatchType::Labor, 0.4).is_none());
    assert!(cache.get("deska", MatchType::Material, 0.2).is_some());
}

#[test]
fn test_invalidate_all_clears_everything() {
    let cache = ResultCache::default();
    cache.put("kabel", MatchType::Material, 0.2, Some(outcome(1, 0.9)));
    cache.put("deska", MatchType::Material, 0.2, None);

    cache.invalidate(None);
    assert!(cache.is_empty());
}

#[test]
fn test_capacity_bound_evicts_oldest() {
    let cache = ResultCache::new(Duration::from_secs(3600), 2);
    cache.put("a11", MatchType::Material, 0.2, None);
    cache.put("b22", MatchType::Material, 0.2, None);
    cache.put("c33", MatchType::Material, 0.2, None);

    assert_eq!(cache.len(), 2);
    assert!(cache.get("a11", MatchType::Material, 0.2).is_none());
    assert!(cache.get("c33", MatchType::Material, 0.2).is_some());
}
