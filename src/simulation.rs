/// 幀循環模擬
///
/// 以模擬相機推進場景並逐幀執行標記管線，定期在背景儲存配置
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use tokio::task::JoinHandle;
use vek::{Vec2, Vec3};

use crate::config::AppConfig;
use crate::deep_dungeon::DungeonRecorder;
use crate::host::{SimulatedCamera, ViewportRect};
use crate::overlay::{FrameStats, Marker, MarkerPipeline, MinimapProjector};
use crate::scene::Scene;

/// 模擬選項
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub frames: u64,
    /// 依幀率等待，關閉時盡快執行
    pub realtime: bool,
    /// 背景儲存的目標路徑
    pub config_path: Option<PathBuf>,
}

/// 模擬結果
#[derive(Debug, Default)]
pub struct SimulationReport {
    pub frames: u64,
    pub totals: FrameStats,
    pub minimap_hits: usize,
    pub recorded_objects: usize,
    pub saves: usize,
    /// 最後一幀的標記
    pub last_markers: Vec<Marker>,
}

/// 場景模擬器
pub struct Simulator {
    config: Arc<AppConfig>,
    pipeline: MarkerPipeline,
    camera: SimulatedCamera,
    scene: Scene,
    recorder: DungeonRecorder,
}

impl Simulator {
    pub fn new(config: AppConfig, pipeline: MarkerPipeline, scene: Scene) -> Self {
        let sim = &config.simulation;
        let viewport = ViewportRect::from_size(sim.viewport_width, sim.viewport_height);
        let mut camera = SimulatedCamera::new(
            Vec3::from(scene.camera.eye),
            Vec3::from(scene.camera.target),
            viewport,
        );
        camera.fov_y_degrees = sim.fov_y_degrees;
        camera.near = sim.near;
        camera.far = sim.far;

        Self {
            config: Arc::new(config),
            pipeline,
            camera,
            scene,
            recorder: DungeonRecorder::new(),
        }
    }

    pub fn recorder(&self) -> &DungeonRecorder {
        &self.recorder
    }

    /// 執行單幀
    pub fn step(&mut self, dt: f32) -> (Vec<Marker>, FrameStats, usize) {
        self.scene.advance(dt);
        self.camera.orbit(self.scene.camera.orbit_speed * dt);

        let player = self.scene.player_position();
        let mut objects = self.scene.objects();

        let classifier = self.pipeline.classifier();
        for obj in &objects {
            self.recorder.record(self.scene.territory, obj, classifier.classify(obj));
        }
        // 已離開物件表的陷阱與寶箱仍以記錄位置繪製
        let remembered = self.recorder.remembered(self.scene.territory, &objects);
        objects.extend(remembered);

        let (markers, stats) = self.pipeline.run(&self.camera, player, &objects);

        let minimap_hits = if self.config.overlay.overlay_2d_enabled {
            let overlay = &self.config.overlay;
            let vp = self.camera.viewport;
            let center = vp.pos + Vec2::new(overlay.minimap_radius, overlay.minimap_radius);
            let minimap = MinimapProjector::new(center, overlay.minimap_scale, overlay.minimap_radius)
                .with_rotation(self.camera.heading());
            objects
                .iter()
                .filter_map(|obj| minimap.place(player, obj.position))
                .count()
        } else {
            0
        };

        (markers, stats, minimap_hits)
    }

    /// 執行幀循環
    pub async fn run(&mut self, options: SimulationOptions) -> SimulationReport {
        let frame_rate = self.config.simulation.frame_rate.max(1);
        let dt = 1.0 / frame_rate as f32;
        let save_interval = self.config.simulation.save_interval_frames;
        let mut interval = tokio::time::interval(Duration::from_secs_f32(dt));
        let mut pending_saves: Vec<JoinHandle<()>> = Vec::new();
        let mut report = SimulationReport::default();

        info!("開始模擬 {} 幀 ({} fps, {} 個實體)", options.frames, frame_rate, self.scene.entities.len());

        for frame in 1..=options.frames {
            if options.realtime {
                interval.tick().await;
            }

            let (markers, stats, minimap_hits) = self.step(dt);
            report.totals.total += stats.total;
            report.totals.filtered += stats.filtered;
            report.totals.on_screen += stats.on_screen;
            report.totals.pinned += stats.pinned;
            report.totals.dropped += stats.dropped;
            report.minimap_hits += minimap_hits;
            report.frames = frame;

            if frame % frame_rate as u64 == 0 {
                debug!(
                    "第 {} 幀: 視口內 {}, 邊緣 {}, 丟棄 {}",
                    frame, stats.on_screen, stats.pinned, stats.dropped
                );
            }

            if let Some(path) = &options.config_path {
                if save_interval > 0 && frame % save_interval == 0 {
                    pending_saves.retain(|handle| !handle.is_finished());
                    pending_saves.push(spawn_config_save(Arc::clone(&self.config), path.clone()));
                    report.saves += 1;
                }
            }

            report.last_markers = markers;
        }

        // 結束時等待尚未完成的儲存
        for handle in pending_saves {
            if let Err(e) = handle.await {
                warn!("配置儲存任務異常結束: {}", e);
            }
        }

        report.recorded_objects = self.recorder.len();
        info!(
            "模擬完成: {} 幀, 視口內 {}, 邊緣 {}, 記錄迷宮物件 {}",
            report.frames, report.totals.on_screen, report.totals.pinned, report.recorded_objects
        );
        report
    }
}

/// 在背景儲存配置，失敗只記錄警告
fn spawn_config_save(config: Arc<AppConfig>, path: PathBuf) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        match config.save_to_file(&path) {
            Ok(()) => log::trace!("配置已儲存，耗時 {:.3}ms", started.elapsed().as_secs_f64() * 1000.0),
            Err(e) => warn!("儲存配置時發生錯誤: {:#}", e),
        }
    })
}
