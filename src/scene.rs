/// 場景檔案
///
/// 描述模擬用的相機、玩家位置與實體列表
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use vek::Vec3;

use crate::classifier::{GameObject, ObjectKind};

/// 場景相機
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneCamera {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    /// 繞目標旋轉速度（弧度/秒）
    pub orbit_speed: f32,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self {
            eye: [0.0, 15.0, 40.0],
            target: [0.0, 0.0, 0.0],
            orbit_speed: 0.25,
        }
    }
}

/// 場景實體
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntity {
    pub id: u32,
    pub base_id: u32,
    #[serde(default)]
    pub kind: ObjectKind,
    #[serde(default)]
    pub sub_kind: u8,
    pub position: [f32; 3],
    /// 每秒位移
    #[serde(default)]
    pub velocity: [f32; 3],
}

impl SceneEntity {
    pub fn to_object(&self) -> GameObject {
        GameObject::new(self.id, self.base_id, self.kind, Vec3::from(self.position))
            .with_sub_kind(self.sub_kind)
    }

    /// 依速度推進
    pub fn advance(&mut self, dt: f32) {
        for (p, v) in self.position.iter_mut().zip(self.velocity) {
            *p += v * dt;
        }
    }
}

/// 模擬場景
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// 區域 ID
    #[serde(default)]
    pub territory: u16,
    #[serde(default)]
    pub player: [f32; 3],
    #[serde(default)]
    pub camera: SceneCamera,
    #[serde(default)]
    pub entities: Vec<SceneEntity>,
}

/// 隨機場景使用的基礎 ID（陷阱、寶箱、知名怪物與一般怪物）
const RANDOM_BASES: [(u32, ObjectKind); 6] = [
    (2007182, ObjectKind::EventObj),
    (2007543, ObjectKind::EventObj),
    (2007357, ObjectKind::Treasure),
    (7184, ObjectKind::BattleNpc),
    (882, ObjectKind::BattleNpc),
    (9000, ObjectKind::BattleNpc),
];

impl Scene {
    /// 從 TOML 檔案載入
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("無法讀取場景檔案: {}", path.display()))?;
        let scene: Scene = toml::from_str(&content)
            .with_context(|| format!("無法解析場景檔案: {}", path.display()))?;

        log::info!("已載入場景: {} ({} 個實體)", path.display(), scene.entities.len());
        Ok(scene)
    }

    /// 以隨機實體補充場景
    pub fn populate_random<R: Rng>(&mut self, rng: &mut R, count: usize, extent: f32) {
        let extent = extent.abs().max(1.0);
        let next_id = self.entities.iter().map(|e| e.id).max().map_or(1, |id| id + 1);

        for i in 0..count {
            let (base_id, kind) = RANDOM_BASES[rng.random_range(0..RANDOM_BASES.len())];
            let position = [
                rng.random_range(-extent..extent),
                0.0,
                rng.random_range(-extent..extent),
            ];
            let velocity = if kind == ObjectKind::BattleNpc {
                [rng.random_range(-2.0..2.0), 0.0, rng.random_range(-2.0..2.0)]
            } else {
                [0.0; 3]
            };
            self.entities.push(SceneEntity {
                id: next_id + i as u32,
                base_id,
                kind,
                sub_kind: 0,
                position,
                velocity,
            });
        }
        log::debug!("已加入 {} 個隨機實體", count);
    }

    pub fn objects(&self) -> Vec<GameObject> {
        self.entities.iter().map(SceneEntity::to_object).collect()
    }

    pub fn player_position(&self) -> Vec3<f32> {
        Vec3::from(self.player)
    }

    pub fn advance(&mut self, dt: f32) {
        for entity in &mut self.entities {
            entity.advance(dt);
        }
    }
}
