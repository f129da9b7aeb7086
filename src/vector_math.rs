/// 向量數學基礎
///
/// 投影、邊界夾取與小地圖共用的 2D/3D 向量工具，全部為純函數
use vek::{Vec2, Vec3};

/// 視為零的閾值
pub const ZERO_EPSILON: f32 = 1e-6;

/// 判斷浮點數是否接近零
#[inline]
pub fn is_zero(v: f32) -> bool {
    v.abs() < ZERO_EPSILON
}

/// 取水平面 (X, Z) 作為 2D 向量
#[inline]
pub fn to_vec2(v: Vec3<f32>) -> Vec2<f32> {
    Vec2::new(v.x, v.z)
}

/// 正規化 2D 向量
///
/// 長度接近零時原樣返回，呼叫端需容忍非單位長度的結果
#[inline]
pub fn normalize(v: Vec2<f32>) -> Vec2<f32> {
    let len = v.magnitude();
    if is_zero(len) {
        return v;
    }
    v * (1.0 / len)
}

/// 以原點為中心縮放
#[inline]
pub fn zoom(v: Vec2<f32>, factor: f32, origin: Vec2<f32>) -> Vec2<f32> {
    origin + (v - origin) * factor
}

/// 依角度（弧度）旋轉
#[inline]
pub fn rotate(v: Vec2<f32>, radians: f32) -> Vec2<f32> {
    let (sin, cos) = radians.sin_cos();
    rotate_by(v, Vec2::new(sin, cos))
}

/// 依方向向量 (sin, cos) 旋轉，方向向量不需預先正規化
#[inline]
pub fn rotate_by(v: Vec2<f32>, direction: Vec2<f32>) -> Vec2<f32> {
    let d = normalize(direction);
    Vec2::new(d.y * v.x + d.x * v.y, d.y * v.y - d.x * v.x)
}

/// 繞指定原點旋轉
#[inline]
pub fn rotate_around(v: Vec2<f32>, radians: f32, origin: Vec2<f32>) -> Vec2<f32> {
    origin + rotate(v - origin, radians)
}

/// 3D 歐氏距離，結果非有限值時返回 0
#[inline]
pub fn distance(a: Vec3<f32>, b: Vec3<f32>) -> f32 {
    finite_or_zero((a - b).magnitude())
}

/// 水平面 (X, Z) 距離，結果非有限值時返回 0
#[inline]
pub fn distance_2d(a: Vec3<f32>, b: Vec3<f32>) -> f32 {
    finite_or_zero(Vec2::new(a.x - b.x, a.z - b.z).magnitude())
}

/// 2D 叉積（行列式）
#[inline]
pub fn cross(a: Vec2<f32>, b: Vec2<f32>) -> f32 {
    a.x * b.y - a.y * b.x
}

#[inline]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}
