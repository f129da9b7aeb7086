/// 世界→螢幕投影
use vek::{Vec2, Vec3};

use crate::host::{ProjectionCoefficients, RenderHost, ViewportRect};

/// 單點投影結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// 螢幕座標（原生轉換失敗時仍保留原生結果）
    pub screen: Vec2<f32>,
    /// 裁剪空間 W
    pub depth: f32,
    /// 是否落在（含容差的）視口內
    pub visible: bool,
}

/// 可見性容差
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tolerance {
    pub x: f32,
    pub y: f32,
}

impl Tolerance {
    pub const NONE: Tolerance = Tolerance { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 單幀投影上下文
///
/// 每幀從宿主抓取一次投影係數與視口，之後同一幀內的投影都使用這份快照
pub struct FrameContext<H: RenderHost> {
    host: H,
    coefficients: ProjectionCoefficients,
    viewport: ViewportRect,
}

impl<H: RenderHost> FrameContext<H> {
    /// 抓取當前幀的快照
    pub fn capture(host: H) -> Self {
        let coefficients = host.projection_coefficients();
        let viewport = host.viewport();
        Self { host, coefficients, viewport }
    }

    pub fn viewport(&self) -> ViewportRect {
        self.viewport
    }

    /// 投影到以視口左上角為基準的螢幕空間
    pub fn project(&self, world: Vec3<f32>) -> Projection {
        self.project_with(world, None, Tolerance::NONE)
    }

    /// 指定基準點與容差的投影
    ///
    /// 原生轉換失敗時 `visible` 為 false，不會返回錯誤
    pub fn project_with(
        &self,
        world: Vec3<f32>,
        pivot: Option<Vec2<f32>>,
        tolerance: Tolerance,
    ) -> Projection {
        let pivot = pivot.unwrap_or(self.viewport.pos);
        let depth = self.coefficients.clip_w(world);
        let (screen, success) = self.host.world_to_screen(world);

        let size = self.viewport.size;
        let visible = success
            && screen.x >= pivot.x - tolerance.x
            && screen.x <= pivot.x + size.x + tolerance.x
            && screen.y >= pivot.y - tolerance.y
            && screen.y <= pivot.y + size.y + tolerance.y;

        if !success {
            log::trace!("原生投影失敗: {:?} -> {:?}", world, screen);
        }

        Projection { screen, depth, visible }
    }
}
