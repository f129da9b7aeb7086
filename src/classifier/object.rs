/// 遊戲物件的靜態識別屬性
use serde::{Deserialize, Serialize};
use vek::Vec3;

/// 物件種類，數值與宿主一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    #[default]
    None,
    Player,
    BattleNpc,
    EventNpc,
    Treasure,
    Aetheryte,
    GatheringPoint,
    EventObj,
    MountType,
    Companion,
    Retainer,
    Area,
    Housing,
    Cutscene,
    CardStand,
    Ornament,
}

impl ObjectKind {
    /// 從宿主數值轉換，未知數值視為 None
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => ObjectKind::Player,
            2 => ObjectKind::BattleNpc,
            3 => ObjectKind::EventNpc,
            4 => ObjectKind::Treasure,
            5 => ObjectKind::Aetheryte,
            6 => ObjectKind::GatheringPoint,
            7 => ObjectKind::EventObj,
            8 => ObjectKind::MountType,
            9 => ObjectKind::Companion,
            10 => ObjectKind::Retainer,
            11 => ObjectKind::Area,
            12 => ObjectKind::Housing,
            13 => ObjectKind::Cutscene,
            14 => ObjectKind::CardStand,
            15 => ObjectKind::Ornament,
            _ => ObjectKind::None,
        }
    }
}

/// 戰鬥 NPC 子種類
pub mod battle_npc_sub_kind {
    pub const PET: u8 = 2;
    pub const CHOCOBO: u8 = 3;
}

/// 被追蹤的遊戲物件
#[derive(Debug, Clone, PartialEq)]
pub struct GameObject {
    pub id: u32,
    pub base_id: u32,
    pub object_kind: ObjectKind,
    pub sub_kind: u8,
    pub position: Vec3<f32>,
}

impl GameObject {
    pub fn new(id: u32, base_id: u32, object_kind: ObjectKind, position: Vec3<f32>) -> Self {
        Self { id, base_id, object_kind, sub_kind: 0, position }
    }

    pub fn with_sub_kind(mut self, sub_kind: u8) -> Self {
        self.sub_kind = sub_kind;
        self
    }
}
