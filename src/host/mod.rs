/// 渲染宿主介面
///
/// 將原生的世界→螢幕轉換、投影矩陣與視口大小抽象成能力介面，
/// 讓幾何邏輯不依賴實際的渲染器即可測試
pub mod simulated;

use vek::{Vec2, Vec3};

pub use simulated::SimulatedCamera;

/// 投影矩陣第四欄（列向量慣例），用於計算裁剪空間 W
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionCoefficients {
    pub m14: f32,
    pub m24: f32,
    pub m34: f32,
    pub m44: f32,
}

impl ProjectionCoefficients {
    /// 深度固定為 1 的係數
    pub const IDENTITY_W: Self = Self { m14: 0.0, m24: 0.0, m34: 0.0, m44: 1.0 };

    pub const fn new(m14: f32, m24: f32, m34: f32, m44: f32) -> Self {
        Self { m14, m24, m34, m44 }
    }

    /// 計算世界座標的裁剪空間 W
    #[inline]
    pub fn clip_w(&self, world: Vec3<f32>) -> f32 {
        world.x * self.m14 + world.y * self.m24 + world.z * self.m34 + self.m44
    }
}

/// 視口矩形（像素）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    /// 左上角
    pub pos: Vec2<f32>,
    /// 寬高
    pub size: Vec2<f32>,
}

impl ViewportRect {
    pub fn new(pos: Vec2<f32>, size: Vec2<f32>) -> Self {
        Self { pos, size }
    }

    /// 從原點開始的視口
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::zero(), Vec2::new(width, height))
    }

    /// 幾何中心
    pub fn center(&self) -> Vec2<f32> {
        self.pos + self.size * 0.5
    }

    /// 向內縮小後的矩形，返回 (左上, 右下)
    pub fn inset(&self, half_extent: Vec2<f32>) -> (Vec2<f32>, Vec2<f32>) {
        (self.pos + half_extent, self.pos + self.size - half_extent)
    }
}

/// 渲染宿主能力
///
/// 每幀由外部渲染子系統刷新，核心只讀取
pub trait RenderHost {
    /// 原生世界→螢幕轉換，返回螢幕座標以及轉換是否成功
    fn world_to_screen(&self, world: Vec3<f32>) -> (Vec2<f32>, bool);

    /// 當前相機的投影係數
    fn projection_coefficients(&self) -> ProjectionCoefficients;

    /// 當前視口
    fn viewport(&self) -> ViewportRect;
}

impl<T: RenderHost + ?Sized> RenderHost for &T {
    fn world_to_screen(&self, world: Vec3<f32>) -> (Vec2<f32>, bool) {
        (**self).world_to_screen(world)
    }

    fn projection_coefficients(&self) -> ProjectionCoefficients {
        (**self).projection_coefficients()
    }

    fn viewport(&self) -> ViewportRect {
        (**self).viewport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_center_and_inset() {
        let vp = ViewportRect::new(Vec2::new(100.0, 50.0), Vec2::new(1000.0, 800.0));
        assert_eq!(vp.center(), Vec2::new(600.0, 450.0));
        let (min, max) = vp.inset(Vec2::new(10.0, 20.0));
        assert_eq!(min, Vec2::new(110.0, 70.0));
        assert_eq!(max, Vec2::new(1090.0, 830.0));
    }

    #[test]
    fn test_clip_w() {
        let c = ProjectionCoefficients::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(c.clip_w(Vec3::new(1.0, 1.0, 1.0)), 10.0);
        assert_eq!(ProjectionCoefficients::IDENTITY_W.clip_w(Vec3::new(5.0, 0.0, 0.0)), 1.0);
    }
}
