//! Core type definitions used throughout the codebase
//!
//! Item types, equipment parts and the twelve loadout slots. The Korean
//! labels are the exact strings used by the game data files.

use serde::{Deserialize, Serialize};

/// Coarse item category as tagged in `item.json`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "방어구")]
    Armor,
    #[serde(rename = "악세사리")]
    Accessory,
    #[serde(rename = "특수장비")]
    Special,
    /// Any tag the data files use that we don't know about
    #[serde(other)]
    Other,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [ItemType::Armor, ItemType::Accessory, ItemType::Special];

    pub fn label(self) -> &'static str {
        match self {
            ItemType::Armor => "방어구",
            ItemType::Accessory => "악세사리",
            ItemType::Special => "특수장비",
            ItemType::Other => "",
        }
    }

    /// The exact set of parts a full group of this type covers, in canonical order
    pub fn expected_parts(self) -> &'static [Part] {
        match self {
            ItemType::Armor => &[
                Part::HeadShoulder,
                Part::Top,
                Part::Bottom,
                Part::Belt,
                Part::Shoes,
            ],
            ItemType::Accessory => &[Part::Bracelet, Part::Necklace, Part::Ring],
            ItemType::Special => &[Part::Earring, Part::Support, Part::MagicStone],
            ItemType::Other => &[],
        }
    }
}

impl Default for ItemType {
    fn default() -> Self {
        Self::Other
    }
}

/// Equipment part an item occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Part {
    #[serde(rename = "머리어깨")]
    HeadShoulder,
    #[serde(rename = "상의")]
    Top,
    #[serde(rename = "바지")]
    Bottom,
    #[serde(rename = "벨트")]
    Belt,
    #[serde(rename = "신발")]
    Shoes,
    #[serde(rename = "팔찌")]
    Bracelet,
    #[serde(rename = "목걸이")]
    Necklace,
    #[serde(rename = "반지")]
    Ring,
    #[serde(rename = "귀걸이")]
    Earring,
    #[serde(rename = "보조장비")]
    Support,
    #[serde(rename = "마법석")]
    MagicStone,
}

impl Part {
    pub const ALL: [Part; 11] = [
        Part::HeadShoulder,
        Part::Top,
        Part::Bottom,
        Part::Belt,
        Part::Shoes,
        Part::Bracelet,
        Part::Necklace,
        Part::Ring,
        Part::Earring,
        Part::Support,
        Part::MagicStone,
    ];

    /// Part assigned to every item of a group whose size doesn't match its type
    pub const FALLBACK: Part = Part::Top;

    /// Korean part name as it appears inside item names
    pub fn label(self) -> &'static str {
        match self {
            Part::HeadShoulder => "머리어깨",
            Part::Top => "상의",
            Part::Bottom => "바지",
            Part::Belt => "벨트",
            Part::Shoes => "신발",
            Part::Bracelet => "팔찌",
            Part::Necklace => "목걸이",
            Part::Ring => "반지",
            Part::Earring => "귀걸이",
            Part::Support => "보조장비",
            Part::MagicStone => "마법석",
        }
    }

    /// Name fragments that hint at this part
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Part::HeadShoulder => &[
                "머리어깨", "헤드기어", "고글", "헬름", "헬멧", "햇", "모자", "캡", "마스크", "두건",
                "후드", "머리", "뿔", "장식",
            ],
            Part::Top => &["상의", "자켓", "자킷", "재킷", "코트", "아머", "메일", "플레이트 메일"],
            Part::Bottom => &["하의", "바지", "반바지", "팬츠", "스커트", "레깅스", "각반"],
            Part::Belt => &["벨트", "허리", "코일"],
            Part::Shoes => &["신발", "부츠", "슈즈", "사바톤", "그리브"],
            Part::Bracelet => &["팔찌", "브레이슬릿"],
            Part::Necklace => &["목걸이", "네크리스", "펜던트"],
            Part::Ring => &["반지", "링"],
            Part::Earring => &["귀걸이", "이어링"],
            Part::Support => &["보조장비"],
            Part::MagicStone => &["마법석"],
        }
    }

    /// Loadout slot that holds items of this part
    pub fn slot(self) -> SlotId {
        match self {
            Part::HeadShoulder => SlotId::HeadShoulder,
            Part::Top => SlotId::Top,
            Part::Bottom => SlotId::Bottom,
            Part::Belt => SlotId::Belt,
            Part::Shoes => SlotId::Shoes,
            Part::Bracelet => SlotId::Bracelet,
            Part::Necklace => SlotId::Necklace,
            Part::Ring => SlotId::Ring,
            Part::Earring => SlotId::Earring,
            Part::Support => SlotId::Support,
            Part::MagicStone => SlotId::MagicStone,
        }
    }
}

/// One of the twelve loadout slots, declared in canonical emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotId {
    HeadShoulder,
    Top,
    Bottom,
    Belt,
    Shoes,
    Bracelet,
    Necklace,
    Ring,
    Earring,
    Support,
    MagicStone,
    Weapon,
}

impl SlotId {
    pub const ALL: [SlotId; 12] = [
        SlotId::HeadShoulder,
        SlotId::Top,
        SlotId::Bottom,
        SlotId::Belt,
        SlotId::Shoes,
        SlotId::Bracelet,
        SlotId::Necklace,
        SlotId::Ring,
        SlotId::Earring,
        SlotId::Support,
        SlotId::MagicStone,
        SlotId::Weapon,
    ];

    pub fn def(self) -> SlotDef {
        let (label, part) = match self {
            SlotId::HeadShoulder => ("머리어깨", Some(Part::HeadShoulder)),
            SlotId::Top => ("상의", Some(Part::Top)),
            SlotId::Bottom => ("하의", Some(Part::Bottom)),
            SlotId::Belt => ("벨트", Some(Part::Belt)),
            SlotId::Shoes => ("신발", Some(Part::Shoes)),
            SlotId::Bracelet => ("팔찌", Some(Part::Bracelet)),
            SlotId::Necklace => ("목걸이", Some(Part::Necklace)),
            SlotId::Ring => ("반지", Some(Part::Ring)),
            SlotId::Earring => ("귀걸이", Some(Part::Earring)),
            SlotId::Support => ("보조장비", Some(Part::Support)),
            SlotId::MagicStone => ("마법석", Some(Part::MagicStone)),
            SlotId::Weapon => ("무기", None),
        };
        SlotDef { id: self, label, part }
    }

    pub fn is_weapon(self) -> bool {
        self == SlotId::Weapon
    }
}

/// Static description of a slot. The weapon slot has no part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotDef {
    pub id: SlotId,
    pub label: &'static str,
    pub part: Option<Part>,
}
