//! Sum numeric effect lines across many sources
//!
//! Same-named stats are summed, with percent and flat values kept under
//! separate keys. Lines that carry no recognisable number are preserved in
//! their original order and rendered after the numeric summary.

use std::fmt;

use ahash::AHashMap;
use serde::Serialize;

use crate::effects::parser::{classify_line, EffectLine};

/// Aggregation key: a stat name plus whether it is a percentage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StatKey {
    pub name: String,
    pub percent: bool,
}

impl StatKey {
    pub fn new(name: &str, percent: bool) -> Self {
        Self {
            name: name.trim().to_string(),
            percent,
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.percent {
            write!(f, "{}(%)", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatTotal {
    pub key: StatKey,
    pub value: i64,
}

impl fmt::Display for StatTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} +{}{}",
            self.key.name,
            group_thousands(self.value),
            if self.key.percent { "%" } else { "" }
        )
    }
}

/// Running aggregate over any number of effect blocks
#[derive(Debug, Clone, Default)]
pub struct EffectSummary {
    /// In first-seen order
    stats: Vec<StatTotal>,
    index: AHashMap<StatKey, usize>,
    others: Vec<String>,
}

impl EffectSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one multi-line effect block
    pub fn add_text(&mut self, text: &str) {
        for line in text.lines() {
            match classify_line(line) {
                None | Some(EffectLine::SetHeader(_)) => {}
                Some(EffectLine::Stat { name, value, percent }) => self.add_stat(name, value, percent),
                Some(EffectLine::Other(line)) => self.others.push(line.to_string()),
            }
        }
    }

    /// Add to a running total; totals saturate at the `i64` bounds
    pub fn add_stat(&mut self, name: &str, value: i64, percent: bool) {
        let key = StatKey::new(name, percent);
        match self.index.get(&key) {
            Some(&i) => self.stats[i].value = self.stats[i].value.saturating_add(value),
            None => {
                self.index.insert(key.clone(), self.stats.len());
                self.stats.push(StatTotal { key, value });
            }
        }
    }

    pub fn stats(&self) -> &[StatTotal] {
        &self.stats
    }

    pub fn others(&self) -> &[String] {
        &self.others
    }

    pub fn get(&self, name: &str, percent: bool) -> Option<i64> {
        self.index
            .get(&StatKey::new(name, percent))
            .map(|&i| self.stats[i].value)
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty() && self.others.is_empty()
    }

    /// Summary lines, a blank separator when both parts exist, then the rest
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self.stats.iter().map(ToString::to_string).collect();
        if !lines.is_empty() && !self.others.is_empty() {
            lines.push(String::new());
        }
        lines.extend(self.others.iter().cloned());
        lines.join("\n")
    }
}

/// Aggregate effect blocks in order
pub fn aggregate_effects<'a, I>(blocks: I) -> EffectSummary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut summary = EffectSummary::new();
    for block in blocks {
        summary.add_text(block);
    }
    summary
}

/// Format with `,` thousands separators (ko-KR style)
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_flat_values_sum() {
        let summary = aggregate_effects(["항마력 +1,000", "항마력 +500"]);
        assert_eq!(summary.render(), "항마력 +1,500");
    }

    #[test]
    fn test_increase_lines_sum_as_percent() {
        let summary = aggregate_effects(["화상 데미지 10% 증가", "화상 데미지 5% 증가"]);
        assert_eq!(summary.render(), "화상 데미지 +15%");
    }

    #[test]
    fn test_percent_and_flat_stay_apart() {
        let summary = aggregate_effects(["힘 +100\n힘 +5%", "힘 +20"]);
        assert_eq!(summary.get("힘", false), Some(120));
        assert_eq!(summary.get("힘", true), Some(5));
        assert_eq!(summary.render(), "힘 +120\n힘 +5%");
    }

    #[test]
    fn test_headers_dropped_and_others_kept_in_order() {
        let summary = aggregate_effects([
            "[3]세트효과\n항마력 +300\n공격 시 화상 부여",
            "[5]세트효과\n스킬 범위 증가\n항마력 +200",
        ]);
        assert_eq!(
            summary.render(),
            "항마력 +500\n\n공격 시 화상 부여\n스킬 범위 증가"
        );
    }

    #[test]
    fn test_only_others_has_no_separator() {
        let summary = aggregate_effects(["적중 시 경직"]);
        assert_eq!(summary.render(), "적중 시 경직");
        assert!(aggregate_effects(Vec::<&str>::new()).is_empty());
    }

    #[test]
    fn test_huge_totals_saturate() {
        let summary = aggregate_effects(["힘 +9,000,000,000,000,000,000", "힘 +9,000,000,000,000,000,000"]);
        assert_eq!(summary.get("힘", false), Some(i64::MAX));
    }

    #[test]
    fn test_unparsable_number_kept_verbatim() {
        let summary = aggregate_effects(["힘 +99,999,999,999,999,999,999", "힘 +10"]);
        assert_eq!(summary.get("힘", false), Some(10));
        assert_eq!(summary.render(), "힘 +10\n\n힘 +99,999,999,999,999,999,999");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(10427000), "10,427,000");
        assert_eq!(group_thousands(-12345), "-12,345");
    }

    #[test]
    fn test_stat_key_display() {
        assert_eq!(StatKey::new(" 힘 ", true).to_string(), "힘(%)");
        assert_eq!(StatKey::new("힘", false).to_string(), "힘");
    }

    proptest! {
        #[test]
        fn prop_aggregation_is_idempotent(
            entries in proptest::collection::vec((0usize..4, 0i64..100_000, any::<bool>()), 0..12)
        ) {
            const NAMES: [&str; 4] = ["항마력", "힘", "화상 데미지", "모든 타입 피해"];
            let text: Vec<String> = entries
                .iter()
                .map(|&(n, v, pct)| format!("{} +{}{}", NAMES[n], group_thousands(v), if pct { "%" } else { "" }))
                .collect();
            let first = aggregate_effects(text.iter().map(String::as_str));
            let rendered = first.render();
            let second = aggregate_effects([rendered.as_str()]);
            prop_assert_eq!(first.stats(), second.stats());
        }
    }
}
