//! Effect aggregation integration tests

use gearsmith::effects::{aggregate_effects, classify_line, extract_segment, EffectLine};

#[test]
fn test_flat_and_increase_scenario() {
    let summary = aggregate_effects([
        "항마력 +1,000",
        "항마력 +500",
        "화상 데미지 10% 증가",
        "화상 데미지 5% 증가",
    ]);
    assert_eq!(summary.render(), "항마력 +1,500\n화상 데미지 +15%");
}

#[test]
fn test_mixed_blocks_keep_narrative_after_numbers() {
    let weapon = "물리 공격력 +1,200\n공격 시 3% 확률로 번개 소환\n힘 +50";
    let set = "[3]세트효과\n힘 +100\n스킬 쿨타임 회복 속도 증가\n[5]세트효과\n물리 공격력 +300";
    let summary = aggregate_effects([weapon, set]);

    assert_eq!(
        summary.render(),
        "물리 공격력 +1,500\n힘 +150\n\n공격 시 3% 확률로 번개 소환\n스킬 쿨타임 회복 속도 증가"
    );
}

#[test]
fn test_rendered_output_reaggregates_to_same_values() {
    let first = aggregate_effects(["항마력 +1,000\n힘 +5%", "항마력 +2,345\n힘 +7%\n설명 문구"]);
    let rendered = first.render();
    let second = aggregate_effects([rendered.as_str()]);
    assert_eq!(first.stats(), second.stats());
    assert_eq!(second.get("항마력", false), Some(3_345));
    assert_eq!(second.get("힘", true), Some(12));
}

#[test]
fn test_segment_feeds_aggregation() {
    let text = "[3]세트효과\n항마력 +200\n[5]세트효과\n항마력 +800";
    let three = extract_segment(text, 3).unwrap();
    assert_eq!(classify_line(&three), Some(EffectLine::Stat { name: "항마력", value: 200, percent: false }));
    assert_eq!(aggregate_effects([three.as_str()]).get("항마력", false), Some(200));
}
