//! Service detector. Scores free text against catalog keywords.

use crate::domain::catalog::Catalog;
use crate::domain::entities::{Detection, DetectionConfidence, ServiceCategoryId};

/// Returns the best-scoring category, or the fallback when nothing matches.
pub fn detect(catalog: &Catalog, text: &str) -> ServiceCategoryId {
    analyze(catalog, text).category
}

/// Scores every category and reports how confident the pick is.
///
/// Score = total count of non-overlapping, case-insensitive keyword occurrences.
/// Ties resolve to the category that comes first in catalog order.
pub fn analyze(catalog: &Catalog, text: &str) -> Detection {
    let normalized = text.to_lowercase();

    let scored: Vec<(ServiceCategoryId, usize, Vec<String>)> = catalog
        .iter()
        .map(|category| {
            let mut score = 0;
            let mut matched = Vec::new();
            for kw in category.keywords {
                let hits = normalized.matches(kw).count();
                if hits > 0 {
                    score += hits;
                    matched.push((*kw).to_string());
                }
            }
            (category.id, score, matched)
        })
        .collect();

    let mut best = 0;
    for (idx, (_, score, _)) in scored.iter().enumerate() {
        if *score > scored[best].1 {
            best = idx;
        }
    }

    let (category, score, matched_keywords) = scored[best].clone();
    if score == 0 {
        return Detection {
            category: ServiceCategoryId::FALLBACK,
            score: 0,
            matched_keywords: Vec::new(),
            runner_up: None,
            confidence: DetectionConfidence::None,
        };
    }

    // Highest-scoring other category, first in catalog order on ties.
    let mut runner_up: Option<(ServiceCategoryId, usize)> = None;
    for (idx, (id, s, _)) in scored.iter().enumerate() {
        if idx == best || *s == 0 {
            continue;
        }
        if runner_up.is_none_or(|(_, r)| *s > r) {
            runner_up = Some((*id, *s));
        }
    }

    let confidence = match runner_up {
        Some((_, s)) if s == score => DetectionConfidence::Ambiguous,
        _ => DetectionConfidence::Clear,
    };

    Detection {
        category,
        score,
        matched_keywords,
        runner_up: runner_up.map(|(id, _)| id),
        confidence,
    }
}
