/// 深層迷宮物件記錄
///
/// 記錄每個區域中見過的陷阱與寶箱位置，物件離開物件表後仍交給標記管線繪製。
/// 記錄以區域、基礎 ID 與位置去重，數量只隨不同物件增長
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use vek::Vec3;

use crate::classifier::{EntityClass, GameObject, ObjectKind};

/// 迷宮物件種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeepDungeonType {
    Trap,
    AccursedHoard,
}

impl DeepDungeonType {
    pub fn from_class(class: EntityClass) -> Option<Self> {
        match class {
            EntityClass::Trap => Some(DeepDungeonType::Trap),
            EntityClass::AccursedHoard => Some(DeepDungeonType::AccursedHoard),
            _ => None,
        }
    }
}

/// 已記錄的迷宮物件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeepDungeonObject {
    pub location: [f32; 3],
    pub territory: u16,
    pub base: u32,
    pub instance_id: u32,
    pub kind: DeepDungeonType,
}

impl DeepDungeonObject {
    pub fn location(&self) -> Vec3<f32> {
        Vec3::from(self.location)
    }

    /// 轉回可分類的物件，ID 沿用記錄時的實例 ID
    pub fn to_object(&self) -> GameObject {
        GameObject::new(self.instance_id, self.base, ObjectKind::EventObj, self.location())
    }

    /// 位置以 0.1 單位取整後的鍵，用於去重
    fn key(&self) -> (u16, u32, [i32; 3]) {
        let q = |v: f32| (v * 10.0).round() as i32;
        (
            self.territory,
            self.base,
            [q(self.location[0]), q(self.location[1]), q(self.location[2])],
        )
    }
}

impl fmt::Display for DeepDungeonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}, {}, {}, {:X}, <{}, {}, {}>",
            self.kind,
            self.territory,
            self.base,
            self.instance_id,
            self.location[0],
            self.location[1],
            self.location[2]
        )
    }
}

/// 迷宮物件記錄器
#[derive(Debug, Default)]
pub struct DungeonRecorder {
    objects: HashMap<u16, Vec<DeepDungeonObject>>,
    seen: HashSet<(u16, u32, [i32; 3])>,
}

impl DungeonRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記錄物件；非迷宮類別或重複位置時返回 false
    pub fn record(&mut self, territory: u16, obj: &GameObject, class: EntityClass) -> bool {
        let Some(kind) = DeepDungeonType::from_class(class) else {
            return false;
        };

        let entry = DeepDungeonObject {
            location: obj.position.into_array(),
            territory,
            base: obj.base_id,
            instance_id: obj.id,
            kind,
        };
        if !self.seen.insert(entry.key()) {
            return false;
        }

        log::debug!("記錄迷宮物件: {}", entry);
        self.objects.entry(territory).or_default().push(entry);
        true
    }

    /// 指定區域的已記錄物件
    pub fn in_territory(&self, territory: u16) -> &[DeepDungeonObject] {
        self.objects.get(&territory).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 指定區域中已記錄、但不在當前物件表裡的物件
    pub fn remembered(&self, territory: u16, present: &[GameObject]) -> Vec<GameObject> {
        let present: HashSet<u32> = present.iter().map(|obj| obj.id).collect();
        self.in_territory(territory)
            .iter()
            .filter(|obj| !present.contains(&obj.instance_id))
            .map(DeepDungeonObject::to_object)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
