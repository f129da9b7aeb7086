/// 實體分類
///
/// 依物件的靜態識別屬性判斷語意類別（陷阱、寶箱、狩獵怪等），決定要繪製什麼
pub mod notorious;
pub mod object;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use vek::Vec3;

pub use notorious::{HuntRank, NotoriousMonsterRow, RankTables};
pub use object::{battle_npc_sub_kind, GameObject, ObjectKind};

/// 實體類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    None,
    Trap,
    AccursedHoard,
    SilverCoffer,
    HuntRankS,
    HuntRankA,
    HuntRankB,
    EurekaNotorious,
    FateNotorious,
    Pet,
    Chocobo,
    /// 沒有特殊規則時的預設類別
    Normal(ObjectKind),
}

impl EntityClass {
    /// 深層迷宮物件（陷阱、寶箱）
    pub fn is_dungeon_object(&self) -> bool {
        matches!(
            self,
            EntityClass::Trap | EntityClass::AccursedHoard | EntityClass::SilverCoffer
        )
    }

    /// 狩獵或知名怪物
    pub fn is_hunt(&self) -> bool {
        matches!(
            self,
            EntityClass::HuntRankS
                | EntityClass::HuntRankA
                | EntityClass::HuntRankB
                | EntityClass::EurekaNotorious
                | EntityClass::FateNotorious
        )
    }
}

impl From<HuntRank> for EntityClass {
    fn from(rank: HuntRank) -> Self {
        match rank {
            HuntRank::S => EntityClass::HuntRankS,
            HuntRank::A => EntityClass::HuntRankA,
            HuntRank::B => EntityClass::HuntRankB,
        }
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityClass::None => write!(f, "None"),
            EntityClass::Trap => write!(f, "Trap"),
            EntityClass::AccursedHoard => write!(f, "AccursedHoard"),
            EntityClass::SilverCoffer => write!(f, "SilverCoffer"),
            EntityClass::HuntRankS => write!(f, "Hunt S"),
            EntityClass::HuntRankA => write!(f, "Hunt A"),
            EntityClass::HuntRankB => write!(f, "Hunt B"),
            EntityClass::EurekaNotorious => write!(f, "Eureka NM"),
            EntityClass::FateNotorious => write!(f, "Fate NM"),
            EntityClass::Pet => write!(f, "Pet"),
            EntityClass::Chocobo => write!(f, "Chocobo"),
            EntityClass::Normal(kind) => write!(f, "{:?}", kind),
        }
    }
}

/// 陷阱判定；6388 在零座標時是未放置的佔位物件
pub fn is_trap(base_id: u32, position: Vec3<f32>) -> bool {
    match base_id {
        6388 => position != Vec3::zero(),
        2007182..=2007186 => true,
        2009504 => true,
        _ => false,
    }
}

pub fn is_accursed_hoard(base_id: u32) -> bool {
    base_id == 2007542 || base_id == 2007543
}

pub fn is_silver_coffer(base_id: u32) -> bool {
    base_id == 2007357
}

/// 實體分類器
///
/// 持有建構時交入的唯讀等級表，可在多個讀者間共享
#[derive(Debug, Clone)]
pub struct EntityClassifier {
    ranks: Arc<RankTables>,
}

impl EntityClassifier {
    pub fn new(ranks: Arc<RankTables>) -> Self {
        Self { ranks }
    }

    /// 分類物件，未匹配任何規則時落到 Normal
    pub fn classify(&self, obj: &GameObject) -> EntityClass {
        if is_trap(obj.base_id, obj.position) {
            return EntityClass::Trap;
        }
        if is_accursed_hoard(obj.base_id) {
            return EntityClass::AccursedHoard;
        }
        if is_silver_coffer(obj.base_id) {
            return EntityClass::SilverCoffer;
        }

        match obj.object_kind {
            ObjectKind::None => EntityClass::None,
            ObjectKind::BattleNpc => self.classify_battle_npc(obj),
            kind => EntityClass::Normal(kind),
        }
    }

    fn classify_battle_npc(&self, obj: &GameObject) -> EntityClass {
        if let Some(rank) = self.ranks.hunt_rank(obj.base_id) {
            return rank.into();
        }
        if self.ranks.is_eureka(obj.base_id) {
            return EntityClass::EurekaNotorious;
        }
        if self.ranks.is_fate(obj.base_id) {
            return EntityClass::FateNotorious;
        }
        match obj.sub_kind {
            battle_npc_sub_kind::PET => EntityClass::Pet,
            battle_npc_sub_kind::CHOCOBO => EntityClass::Chocobo,
            _ => EntityClass::Normal(ObjectKind::BattleNpc),
        }
    }
}

impl Default for EntityClassifier {
    fn default() -> Self {
        Self::new(Arc::new(RankTables::builtin()))
    }
}
