/// 邊界夾取
///
/// 將視口外的標記釘在內縮矩形邊緣上，方向為視口中心指向目標
use vek::Vec2;

use crate::host::ViewportRect;

/// 夾取結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampedMarker {
    /// 內縮矩形邊上的位置，未找到時為零向量
    pub position: Vec2<f32>,
    pub found: bool,
}

impl ClampedMarker {
    pub const NOT_FOUND: ClampedMarker = ClampedMarker {
        position: Vec2 { x: 0.0, y: 0.0 },
        found: false,
    };

    pub fn into_option(self) -> Option<Vec2<f32>> {
        self.found.then_some(self.position)
    }
}

/// 計算從視口中心到 `screen` 的線段與內縮矩形的交點
///
/// 邊的檢查順序為上、右、下、左，返回第一個有效交點。
/// 矩形退化（中心不在內縮矩形內）或目標已在內縮矩形內時返回未找到
pub fn clamp_to_border(
    viewport: ViewportRect,
    screen: Vec2<f32>,
    half_extent: Vec2<f32>,
) -> ClampedMarker {
    let center = viewport.center();
    let (min, max) = viewport.inset(half_extent);

    if !(min.x < center.x && center.x < max.x && min.y < center.y && center.y < max.y) {
        log::trace!("內縮矩形退化: {:?}, 半尺寸 {:?}", viewport, half_extent);
        return ClampedMarker::NOT_FOUND;
    }
    if min.x < screen.x && screen.x < max.x && min.y < screen.y && screen.y < max.y {
        log::trace!("目標位於內縮矩形內: {:?}", screen);
        return ClampedMarker::NOT_FOUND;
    }

    let top_left = min;
    let top_right = Vec2::new(max.x, min.y);
    let bottom_right = max;
    let bottom_left = Vec2::new(min.x, max.y);

    let edges = [
        (top_left, top_right),
        (top_right, bottom_right),
        (bottom_right, bottom_left),
        (bottom_left, top_left),
    ];

    edges
        .iter()
        .find_map(|&(a, b)| segment_intersection(a, b, center, screen))
        .map(|position| ClampedMarker { position, found: true })
        .unwrap_or(ClampedMarker::NOT_FOUND)
}

/// 2D 線段相交
///
/// a1→a2 與 b1→b2 兩線段的交點；平行或共線時返回 None
///
/// 以 f64 求解，極遠的目標座標也不會讓行列式溢位
pub fn segment_intersection(
    a1: Vec2<f32>,
    a2: Vec2<f32>,
    b1: Vec2<f32>,
    b2: Vec2<f32>,
) -> Option<Vec2<f32>> {
    let (a1, a2, b1, b2) = (widen(a1), widen(a2), widen(b1), widen(b2));
    let r = a2 - a1;
    let s = b2 - b1;

    let rxs = cross64(r, s);
    if !rxs.is_finite() || rxs.abs() < f32::EPSILON as f64 {
        return None;
    }

    let q = b1 - a1;
    let t = cross64(q, s) / rxs;
    let u = cross64(q, r) / rxs;

    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }

    let p = a1 + r * t;
    Some(Vec2::new(p.x as f32, p.y as f32))
}

#[inline]
fn widen(v: Vec2<f32>) -> Vec2<f64> {
    Vec2::new(v.x as f64, v.y as f64)
}

#[inline]
fn cross64(a: Vec2<f64>, b: Vec2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn viewport() -> ViewportRect {
        ViewportRect::from_size(1000.0, 800.0)
    }

    fn on_inset_edge(p: Vec2<f32>, min: Vec2<f32>, max: Vec2<f32>, eps: f32) -> bool {
        let within_x = p.x >= min.x - eps && p.x <= max.x + eps;
        let within_y = p.y >= min.y - eps && p.y <= max.y + eps;
        let on_vertical = (p.x - min.x).abs() <= eps || (p.x - max.x).abs() <= eps;
        let on_horizontal = (p.y - min.y).abs() <= eps || (p.y - max.y).abs() <= eps;
        within_x && within_y && (on_vertical || on_horizontal)
    }

    #[test]
    fn test_left_of_viewport_clamps_to_left_edge() {
        let m = clamp_to_border(viewport(), Vec2::new(-50.0, 400.0), Vec2::new(10.0, 10.0));
        assert!(m.found);
        assert!((m.position.x - 10.0).abs() < 1e-3);
        assert!((m.position.y - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_above_viewport_clamps_to_top_edge() {
        let m = clamp_to_border(viewport(), Vec2::new(500.0, -300.0), Vec2::new(10.0, 10.0));
        assert!(m.found);
        assert!((m.position.x - 500.0).abs() < 1e-3);
        assert!((m.position.y - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_diagonal_target() {
        // 中心 (500, 400) 指向 (1500, 1000)，斜率 0.6，先碰到右邊
        let m = clamp_to_border(viewport(), Vec2::new(1500.0, 1000.0), Vec2::new(10.0, 10.0));
        assert!(m.found);
        assert!((m.position.x - 990.0).abs() < 1e-3);
        assert!((m.position.y - 694.0).abs() < 1e-2);

        // 斜率 0.8 時越過右下角，改由下邊相交
        let m = clamp_to_border(viewport(), Vec2::new(1500.0, 1200.0), Vec2::new(10.0, 10.0));
        assert!(m.found);
        assert!((m.position.x - 987.5).abs() < 1e-2);
        assert!((m.position.y - 790.0).abs() < 1e-3);
    }

    #[test]
    fn test_center_target_not_found() {
        let vp = viewport();
        let m = clamp_to_border(vp, vp.center(), Vec2::new(10.0, 10.0));
        assert!(!m.found);
        assert_eq!(m.position, Vec2::zero());
        assert_eq!(m.into_option(), None);
    }

    #[test]
    fn test_degenerate_inset_not_found() {
        let m = clamp_to_border(viewport(), Vec2::new(-50.0, 400.0), Vec2::new(500.0, 10.0));
        assert!(!m.found);
    }

    #[test]
    fn test_offset_viewport() {
        let vp = ViewportRect::new(Vec2::new(200.0, 100.0), Vec2::new(1000.0, 800.0));
        let m = clamp_to_border(vp, Vec2::new(700.0, 2000.0), Vec2::new(16.0, 16.0));
        assert!(m.found);
        assert!((m.position.x - 700.0).abs() < 1e-3);
        assert!((m.position.y - 884.0).abs() < 1e-3);
    }

    #[test]
    fn test_resize_between_calls() {
        let target = Vec2::new(-50.0, 400.0);
        let half = Vec2::new(10.0, 10.0);
        let first = clamp_to_border(viewport(), target, half);
        let second = clamp_to_border(ViewportRect::from_size(2000.0, 800.0), target, half);
        assert!(first.found && second.found);
        assert!((second.position.x - 10.0).abs() < 1e-3);
        assert!((second.position.y - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_extreme_targets_still_clamp() {
        let vp = viewport();
        let half = Vec2::new(10.0, 10.0);
        let (min, max) = vp.inset(half);

        let m = clamp_to_border(vp, Vec2::new(1e30, 1.0), half);
        assert!(m.found);
        assert!((m.position.x - 990.0).abs() < 1e-3);

        for target in [
            Vec2::new(f32::MAX, f32::MAX),
            Vec2::new(-f32::MAX, f32::MAX),
            Vec2::new(f32::MAX, -f32::MAX),
            Vec2::new(-f32::MAX, 400.0),
        ] {
            let m = clamp_to_border(vp, target, half);
            assert!(m.found, "{:?}", target);
            assert!(on_inset_edge(m.position, min, max, 1e-2), "{:?} -> {:?}", target, m.position);
        }

        // 中心 (500, 400) 沿 (1, 1) 方向，在下邊 y = 790 相交
        let m = clamp_to_border(vp, Vec2::new(f32::MAX, f32::MAX), half);
        assert!((m.position.x - 890.0).abs() < 1e-2);
        assert!((m.position.y - 790.0).abs() < 1e-3);
    }

    #[test]
    fn test_parallel_segments() {
        let hit = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(10.0, 1.0),
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn test_segments_crossing() {
        let hit = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        );
        let p = hit.unwrap();
        assert!((p.x - 5.0).abs() < 1e-5 && (p.y - 5.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn clamped_point_lies_on_inset_edge(
            x in -5000.0f32..6000.0,
            y in -5000.0f32..6000.0,
            hx in 0.0f32..100.0,
            hy in 0.0f32..100.0,
        ) {
            let vp = viewport();
            let half = Vec2::new(hx, hy);
            let (min, max) = vp.inset(half);
            let target = Vec2::new(x, y);
            let outside = x < min.x || x > max.x || y < min.y || y > max.y;
            prop_assume!(outside);

            let m = clamp_to_border(vp, target, half);
            prop_assert!(m.found);
            prop_assert!(on_inset_edge(m.position, min, max, 1e-2));
        }
    }
}
