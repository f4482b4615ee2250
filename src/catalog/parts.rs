//! Part inference for items that carry no slot field
//!
//! Items are grouped by `(type, set_id)`. Within a group whose size matches
//! the type's expected part list, every item gets a distinct part chosen by
//! the assignment with the highest total keyword score. Groups are at most
//! five items, so the search over all bijections stays tiny.

use std::cmp::Reverse;

use ahash::AHashMap;

use crate::catalog::model::{Item, RawItem};
use crate::core::types::{ItemType, Part};

/// Awarded when the part's own name appears in the item name
pub const LABEL_SCORE: u32 = 10;
/// Awarded for each part keyword found in the item name
pub const KEYWORD_SCORE: u32 = 3;

/// Score how strongly an item name points at a part
pub fn score_part(name: &str, part: Part) -> u32 {
    let name = name.to_lowercase();
    let mut score = 0;

    if name.contains(part.label()) {
        score += LABEL_SCORE;
    }

    let hits = part
        .keywords()
        .iter()
        .filter(|kw| !kw.is_empty() && name.contains(&kw.to_lowercase()))
        .count() as u32;

    score + hits * KEYWORD_SCORE
}

/// Infer parts for every raw item, group by group
///
/// Groups are processed in order of first appearance and keep their
/// internal order, so the output is a permutation-stable regrouping of the
/// input with the same length.
pub fn derive_items_with_parts(raw_items: Vec<RawItem>) -> Vec<Item> {
    let mut groups: Vec<Vec<RawItem>> = Vec::new();
    let mut index: AHashMap<(ItemType, String), usize> = AHashMap::new();

    for item in raw_items {
        let key = (item.item_type, item.set_id.clone());
        match index.get(&key) {
            Some(&i) => groups[i].push(item),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![item]);
            }
        }
    }

    groups.into_iter().flat_map(assign_parts_for_group).collect()
}

/// Assign parts within one `(type, set_id)` group
pub fn assign_parts_for_group(group: Vec<RawItem>) -> Vec<Item> {
    let Some(first) = group.first() else {
        return Vec::new();
    };

    let item_type = first.item_type;
    let expected = item_type.expected_parts();

    if expected.len() != group.len() {
        tracing::warn!(
            set_id = %first.set_id,
            item_type = ?item_type,
            size = group.len(),
            expected = expected.len(),
            "group size does not match expected parts, using fallback part"
        );
        return group
            .into_iter()
            .map(|raw| Item::new(raw, Part::FALLBACK))
            .collect();
    }

    let scores: Vec<Vec<u32>> = group
        .iter()
        .map(|raw| expected.iter().map(|&p| score_part(&raw.name, p)).collect())
        .collect();

    let assignment = best_assignment(&scores).unwrap_or_else(|| (0..group.len()).collect());

    group
        .into_iter()
        .zip(assignment)
        .map(|(raw, part_idx)| {
            let part = expected.get(part_idx).copied().unwrap_or(expected[0]);
            Item::new(raw, part)
        })
        .collect()
}

#[derive(Debug, Clone)]
struct Assignment {
    total: u32,
    /// `parts[item] = part index`
    parts: Vec<usize>,
}

struct Search<'a> {
    scores: &'a [Vec<u32>],
    /// Items visited strongest-first
    order: Vec<usize>,
    /// Per item, part indices in descending score order
    ranked: Vec<Vec<usize>>,
}

/// Highest-total bijection of items onto parts for a square score matrix
///
/// Ties keep the first assignment found, where search order is items by
/// descending best score and, per item, parts by descending score.
fn best_assignment(scores: &[Vec<u32>]) -> Option<Vec<usize>> {
    let n = scores.len();
    if n == 0 || scores.iter().any(|row| row.len() != n) {
        return None;
    }

    let max_of = |row: &Vec<u32>| row.iter().copied().max().unwrap_or(0);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| Reverse(max_of(&scores[i])));

    let ranked = scores
        .iter()
        .map(|row| {
            let mut parts: Vec<usize> = (0..n).collect();
            parts.sort_by_key(|&p| Reverse(row[p]));
            parts
        })
        .collect();

    let search = Search { scores, order, ranked };
    search.run(0, 0, Vec::new(), None).map(|a| a.parts)
}

impl Search<'_> {
    fn run(&self, used: u32, total: u32, picks: Vec<usize>, best: Option<Assignment>) -> Option<Assignment> {
        let depth = picks.len();
        if depth == self.order.len() {
            return match best {
                Some(best) if best.total >= total => Some(best),
                _ => Some(Assignment {
                    total,
                    parts: self.by_item(&picks),
                }),
            };
        }

        let item = self.order[depth];
        self.ranked[item]
            .iter()
            .filter(|&&p| used & (1 << p) == 0)
            .fold(best, |best, &p| {
                let next: Vec<usize> = picks.iter().copied().chain(std::iter::once(p)).collect();
                self.run(used | (1 << p), total + self.scores[item][p], next, best)
            })
    }

    /// Convert picks in visit order into a per-item vector
    fn by_item(&self, picks: &[usize]) -> Vec<usize> {
        let mut parts = vec![0; picks.len()];
        for (depth, &part) in picks.iter().enumerate() {
            parts[self.order[depth]] = part;
        }
        parts
    }
}
