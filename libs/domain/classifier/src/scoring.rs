// [libs/domain/classifier/src/scoring.rs]
/*!
 * =================================================================
 * APARATO: KEYWORD-DICTIONARY SCORING (ESTRATO L5)
 * RESPONSABILIDAD: PUNTUACIÓN PURA SOBRE TEXTO CONCATENADO
 * =================================================================
 */

use std::collections::BTreeMap;

/// `category -> [keyword, ...]` lookup table, fixed per-deployment
/// (`spec.md` §4.11: "a configured mapping").
pub type CategoryDictionary = BTreeMap<String, Vec<String>>;

/// Counts keyword occurrences per category in `text` (already lowercased),
/// then normalizes by the total count across all categories so the
/// confidences sum to 1.0 (or are all zero when nothing matched).
pub fn score_categories(text: &str, dictionary: &CategoryDictionary) -> BTreeMap<String, f64> {
    let raw_scores: BTreeMap<String, u32> = dictionary
        .iter()
        .map(|(category, keywords)| {
            let count = keywords.iter().filter(|kw| text.contains(kw.as_str())).count() as u32;
            (category.clone(), count)
        })
        .collect();

    let total: u32 = raw_scores.values().sum();
    if total == 0 {
        return raw_scores.into_keys().map(|category| (category, 0.0)).collect();
    }

    raw_scores
        .into_iter()
        .map(|(category, count)| (category, count as f64 / total as f64))
        .collect()
}

/// Picks the argmax category; below `accept_threshold` the site is
/// reported `"unknown"` rather than a weakly-supported label.
pub fn pick_label(confidences: &BTreeMap<String, f64>, accept_threshold: f64) -> (String, f64) {
    let best = confidences
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal));

    match best {
        Some((category, confidence)) if *confidence >= accept_threshold => (category.clone(), *confidence),
        Some((_, confidence)) => ("unknown".to_string(), *confidence),
        None => ("unknown".to_string(), 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> CategoryDictionary {
        BTreeMap::from([
            ("drugs".to_string(), vec!["cocaine".to_string(), "mdma".to_string()]),
            ("fraud".to_string(), vec!["carding".to_string(), "fullz".to_string()]),
        ])
    }

    #[test]
    fn empty_text_scores_nothing_and_picks_unknown() {
        let scores = score_categories("", &dictionary());
        let (label, confidence) = pick_label(&scores, 0.5);
        assert_eq!(label, "unknown");
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn dominant_category_wins_above_threshold() {
        let scores = score_categories("selling cocaine and mdma here", &dictionary());
        let (label, confidence) = pick_label(&scores, 0.5);
        assert_eq!(label, "drugs");
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn below_threshold_falls_back_to_unknown() {
        let scores = score_categories("cocaine and carding both mentioned", &dictionary());
        let (label, _) = pick_label(&scores, 0.9);
        assert_eq!(label, "unknown");
    }
}
