/// 2D 小地圖投影
use vek::{Vec2, Vec3};

use crate::vector_math::{rotate_around, to_vec2, zoom};

/// 以玩家為中心的小地圖
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapProjector {
    /// 小地圖中心（螢幕像素）
    pub center: Vec2<f32>,
    /// 每世界單位的像素數
    pub scale: f32,
    /// 旋轉角（弧度），通常為相機水平朝向
    pub rotation: f32,
    /// 顯示半徑（像素）
    pub radius: f32,
}

impl MinimapProjector {
    pub fn new(center: Vec2<f32>, scale: f32, radius: f32) -> Self {
        Self { center, scale, rotation: 0.0, radius }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// 將實體位置放到小地圖，超出半徑時返回 None
    pub fn place(&self, player: Vec3<f32>, entity: Vec3<f32>) -> Option<Vec2<f32>> {
        let offset = to_vec2(entity) - to_vec2(player);
        let scaled = zoom(self.center + offset, self.scale, self.center);
        let pos = rotate_around(scaled, self.rotation, self.center);

        if (pos - self.center).magnitude() > self.radius {
            return None;
        }
        Some(pos)
    }
}
