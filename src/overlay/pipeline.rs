/// 每幀標記計算
///
/// 分類 → 依開關過濾 → 投影 → 視口外時夾取到邊緣，輸出給繪製子系統的標記
use serde::Serialize;
use vek::{Vec2, Vec3};

use super::border_clamp::clamp_to_border;
use super::projection::FrameContext;
use crate::classifier::{EntityClass, EntityClassifier, GameObject};
use crate::config::OverlayConfig;
use crate::host::RenderHost;
use crate::vector_math;

/// 標記擺放方式
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// 目標在視口內
    OnScreen { position: [f32; 2] },
    /// 目標在視口外，釘在邊緣；direction 為中心指向目標的單位向量
    Pinned { position: [f32; 2], direction: [f32; 2] },
}

impl Placement {
    pub fn position(&self) -> Vec2<f32> {
        match self {
            Placement::OnScreen { position } | Placement::Pinned { position, .. } => {
                Vec2::from(*position)
            }
        }
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, Placement::Pinned { .. })
    }
}

/// 單一實體的標記
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: u32,
    pub class: EntityClass,
    pub placement: Placement,
    pub depth: f32,
    /// 與玩家的水平距離
    pub distance: f32,
}

/// 每幀統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub total: usize,
    pub filtered: usize,
    pub on_screen: usize,
    pub pinned: usize,
    pub dropped: usize,
}

/// 標記管線
pub struct MarkerPipeline {
    classifier: EntityClassifier,
    config: OverlayConfig,
}

impl MarkerPipeline {
    pub fn new(classifier: EntityClassifier, config: OverlayConfig) -> Self {
        Self { classifier, config }
    }

    pub fn classifier(&self) -> &EntityClassifier {
        &self.classifier
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: OverlayConfig) {
        self.config = config;
    }

    /// 計算一幀的標記，依深度由遠到近排序
    pub fn run<H: RenderHost>(
        &self,
        host: H,
        player: Vec3<f32>,
        objects: &[GameObject],
    ) -> (Vec<Marker>, FrameStats) {
        let frame = FrameContext::capture(host);
        let mut stats = FrameStats { total: objects.len(), ..FrameStats::default() };
        let mut markers = Vec::with_capacity(objects.len());

        for obj in objects {
            let class = self.classifier.classify(obj);
            if !self.config.should_draw(class) {
                stats.filtered += 1;
                continue;
            }

            match self.place(&frame, obj.position) {
                Some((placement, depth)) => {
                    if placement.is_pinned() {
                        stats.pinned += 1;
                    } else {
                        stats.on_screen += 1;
                    }
                    markers.push(Marker {
                        id: obj.id,
                        class,
                        placement,
                        depth,
                        distance: vector_math::distance_2d(player, obj.position),
                    });
                }
                None => stats.dropped += 1,
            }
        }

        // 穩定排序，同深度保持輸入順序
        markers.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        log::trace!("標記幀統計: {:?}", stats);
        (markers, stats)
    }

    /// 單點的擺放方式
    pub fn place<H: RenderHost>(
        &self,
        frame: &FrameContext<H>,
        world: Vec3<f32>,
    ) -> Option<(Placement, f32)> {
        let projection = frame.project_with(world, None, self.config.tolerance());
        if projection.visible {
            let placement = Placement::OnScreen { position: projection.screen.into_array() };
            return Some((placement, projection.depth));
        }
        if !self.config.show_offscreen {
            return None;
        }

        let viewport = frame.viewport();
        let clamped = clamp_to_border(viewport, projection.screen, self.config.half_extent())
            .into_option()?;
        let direction = vector_math::normalize(projection.screen - viewport.center());
        let placement = Placement::Pinned {
            position: clamped.into_array(),
            direction: direction.into_array(),
        };
        Some((placement, projection.depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ObjectKind;
    use crate::host::{ProjectionCoefficients, ViewportRect};

    /// 以世界 (x, z) 直接作為螢幕座標、W = z 的宿主
    struct FlatHost;

    impl RenderHost for FlatHost {
        fn world_to_screen(&self, world: Vec3<f32>) -> (Vec2<f32>, bool) {
            (Vec2::new(world.x, world.z), true)
        }

        fn projection_coefficients(&self) -> ProjectionCoefficients {
            ProjectionCoefficients::new(0.0, 0.0, 1.0, 0.0)
        }

        fn viewport(&self) -> ViewportRect {
            ViewportRect::from_size(1000.0, 800.0)
        }
    }

    fn trap(id: u32, x: f32, z: f32) -> GameObject {
        GameObject::new(id, 2007182, ObjectKind::EventObj, Vec3::new(x, 0.0, z))
    }

    fn pipeline() -> MarkerPipeline {
        let mut config = OverlayConfig::default();
        config.marker_half_extent = [10.0, 10.0];
        MarkerPipeline::new(EntityClassifier::default(), config)
    }

    #[test]
    fn test_on_screen_and_pinned() {
        let objects = [trap(1, 500.0, 300.0), trap(2, -50.0, 400.0)];
        let (markers, stats) = pipeline().run(&FlatHost, Vec3::new(500.0, 0.0, 400.0), &objects);

        assert_eq!(stats.on_screen, 1);
        assert_eq!(stats.pinned, 1);
        assert_eq!(markers.len(), 2);

        let pinned = markers.iter().find(|m| m.id == 2).unwrap();
        let pos = pinned.placement.position();
        assert!(pinned.placement.is_pinned());
        assert!((pos.x - 10.0).abs() < 1e-3 && (pos.y - 400.0).abs() < 1e-3);
        if let Placement::Pinned { direction, .. } = pinned.placement {
            assert!((direction[0] + 1.0).abs() < 1e-5);
        }
        assert!((pinned.distance - 550.0).abs() < 1e-3);
    }

    #[test]
    fn test_sorted_far_to_near() {
        let objects = [trap(1, 100.0, 100.0), trap(2, 100.0, 700.0), trap(3, 100.0, 400.0)];
        let (markers, _) = pipeline().run(&FlatHost, Vec3::zero(), &objects);
        let ids: Vec<u32> = markers.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_filtered_classes() {
        let player = GameObject::new(7, 1, ObjectKind::Player, Vec3::new(10.0, 0.0, 10.0));
        let (markers, stats) = pipeline().run(&FlatHost, Vec3::zero(), &[player]);
        assert!(markers.is_empty());
        assert_eq!(stats.filtered, 1);
    }

    #[test]
    fn test_offscreen_disabled_drops() {
        let mut p = pipeline();
        let mut config = p.config().clone();
        config.show_offscreen = false;
        p.set_config(config);

        let (markers, stats) = p.run(&FlatHost, Vec3::zero(), &[trap(1, -50.0, 400.0)]);
        assert!(markers.is_empty());
        assert_eq!(stats.dropped, 1);
    }

    #[test]
    fn test_center_offscreen_target_dropped() {
        // 容差為負時中心點也視為不可見，夾取找不到交點
        let mut p = pipeline();
        let mut config = p.config().clone();
        config.tolerance_x = -600.0;
        p.set_config(config);

        let (markers, stats) = p.run(&FlatHost, Vec3::zero(), &[trap(1, 500.0, 400.0)]);
        assert!(markers.is_empty());
        assert_eq!(stats.dropped, 1);
    }
}
