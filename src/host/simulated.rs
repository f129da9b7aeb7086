/// 模擬相機宿主
///
/// 以右手座標透視相機實作 RenderHost，用於命令行模擬與測試
use vek::{Mat4, Vec2, Vec3, Vec4};

use super::{ProjectionCoefficients, RenderHost, ViewportRect};
use crate::vector_math;

/// 視為在相機平面上的 W 閾值
const MIN_CLIP_W: f32 = 1e-4;

/// 透視相機
#[derive(Debug, Clone)]
pub struct SimulatedCamera {
    pub eye: Vec3<f32>,
    pub target: Vec3<f32>,
    pub up: Vec3<f32>,
    /// 垂直視角（度）
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub viewport: ViewportRect,
}

impl SimulatedCamera {
    /// 創建看向目標的相機
    pub fn new(eye: Vec3<f32>, target: Vec3<f32>, viewport: ViewportRect) -> Self {
        Self {
            eye,
            target,
            up: Vec3::unit_y(),
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            viewport,
        }
    }

    /// 世界→裁剪空間矩陣（行向量慣例）
    pub fn view_projection(&self) -> Mat4<f32> {
        let aspect = if self.viewport.size.y > 0.0 {
            (self.viewport.size.x / self.viewport.size.y).max(f32::EPSILON)
        } else {
            1.0
        };
        let fov = self.fov_y_degrees.clamp(1.0, 179.0).to_radians();
        let near = self.near.max(MIN_CLIP_W);
        let far = self.far.max(near + 1.0);

        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let projection = Mat4::perspective_rh_zo(fov, aspect, near, far);
        projection * view
    }

    /// 繞目標沿水平面旋轉相機位置
    pub fn orbit(&mut self, radians: f32) {
        let eye = vector_math::rotate_around(
            vector_math::to_vec2(self.eye),
            radians,
            vector_math::to_vec2(self.target),
        );
        self.eye = Vec3::new(eye.x, self.eye.y, eye.y);
    }

    /// 相機水平朝向（弧度），作為小地圖旋轉角
    pub fn heading(&self) -> f32 {
        let forward = vector_math::to_vec2(self.target - self.eye);
        if vector_math::is_zero(forward.magnitude()) {
            return 0.0;
        }
        forward.x.atan2(forward.y)
    }
}

impl RenderHost for SimulatedCamera {
    fn world_to_screen(&self, world: Vec3<f32>) -> (Vec2<f32>, bool) {
        let clip = self.view_projection() * Vec4::new(world.x, world.y, world.z, 1.0);

        // 相機後方的點仍透過 |w| 投影，讓方向保持可用
        let success = clip.w > MIN_CLIP_W;
        let w = clip.w.abs().max(MIN_CLIP_W);
        let ndc = Vec2::new(clip.x / w, clip.y / w);

        let vp = self.viewport;
        let screen = Vec2::new(
            vp.pos.x + (ndc.x + 1.0) * 0.5 * vp.size.x,
            vp.pos.y + (1.0 - ndc.y) * 0.5 * vp.size.y,
        );
        (screen, success && screen.x.is_finite() && screen.y.is_finite())
    }

    fn projection_coefficients(&self) -> ProjectionCoefficients {
        let m = self.view_projection().into_row_array();
        ProjectionCoefficients::new(m[12], m[13], m[14], m[15])
    }

    fn viewport(&self) -> ViewportRect {
        self.viewport
    }
}
