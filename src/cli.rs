/// CLI 介面
///
/// 提供投影、夾取、分類與場景模擬的命令行操作
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use log::{info, warn};
use serde_json::json;
use vek::{Vec2, Vec3};

use crate::classifier::{EntityClass, EntityClassifier, GameObject, ObjectKind, RankTables};
use crate::config::AppConfig;
use crate::host::{SimulatedCamera, ViewportRect};
use crate::overlay::{clamp_to_border, FrameContext, Marker, MarkerPipeline, Placement};
use crate::scene::{Scene, SceneCamera};
use crate::simulation::{SimulationOptions, Simulator};

/// radar - 3D 世界標記疊加層工具
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 配置檔案路徑
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// 狩獵等級表 (TOML)
    #[arg(long, global = true)]
    pub ranks: Option<PathBuf>,

    /// 以 JSON 輸出
    #[arg(long, global = true)]
    pub json: bool,

    /// 詳細日誌輸出
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 子命令
#[derive(Subcommand)]
pub enum Commands {
    /// 以模擬相機投影世界座標
    Project {
        #[arg(allow_negative_numbers = true)]
        x: f32,
        #[arg(allow_negative_numbers = true)]
        y: f32,
        #[arg(allow_negative_numbers = true)]
        z: f32,
        /// 水平容差（像素）
        #[arg(long)]
        tolerance_x: Option<f32>,
        /// 垂直容差（像素）
        #[arg(long)]
        tolerance_y: Option<f32>,
    },

    /// 將螢幕座標夾取到視口邊緣
    Clamp {
        #[arg(allow_negative_numbers = true)]
        x: f32,
        #[arg(allow_negative_numbers = true)]
        y: f32,
        /// 視口寬度（預設取自配置）
        #[arg(long)]
        width: Option<f32>,
        /// 視口高度（預設取自配置）
        #[arg(short = 'H', long)]
        height: Option<f32>,
        /// 標記半寬
        #[arg(long)]
        half_x: Option<f32>,
        /// 標記半高
        #[arg(long)]
        half_y: Option<f32>,
    },

    /// 分類單一實體
    Classify {
        /// 基礎 ID
        base_id: u32,
        /// 物件種類數值
        #[arg(short, long, default_value_t = 2)]
        kind: u8,
        /// 子種類數值
        #[arg(short, long, default_value_t = 0)]
        sub_kind: u8,
        /// 位置 (x y z)
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
        position: Option<Vec<f32>>,
    },

    /// 執行場景模擬
    Simulate {
        /// 場景檔案 (TOML)，省略時使用空場景
        scene: Option<PathBuf>,
        /// 模擬幀數
        #[arg(short, long, default_value_t = 600)]
        frames: u64,
        /// 加入隨機實體數量
        #[arg(short, long, default_value_t = 0)]
        random: usize,
        /// 隨機實體分佈範圍（世界單位）
        #[arg(long, default_value_t = 60.0)]
        extent: f32,
        /// 依幀率即時執行
        #[arg(long)]
        realtime: bool,
        /// 定期在背景儲存配置
        #[arg(long)]
        autosave: bool,
    },

    /// 寫出預設配置檔案
    InitConfig {
        /// 覆寫已存在的檔案
        #[arg(long)]
        force: bool,
    },
}

/// CLI 處理器
pub struct CliHandler {
    config: AppConfig,
    ranks: Arc<RankTables>,
    json: bool,
}

impl CliHandler {
    /// 創建 CLI 處理器並載入配置與等級表
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = AppConfig::load(&cli.config);
        let ranks = match &cli.ranks {
            Some(path) => RankTables::from_file(path)?,
            None => RankTables::builtin(),
        };
        Ok(Self {
            config,
            ranks: Arc::new(ranks),
            json: cli.json,
        })
    }

    /// 初始化日誌系統
    pub fn init_logger(verbose: bool) {
        let filter = if verbose { "debug" } else { "info" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
    }

    fn classifier(&self) -> EntityClassifier {
        EntityClassifier::new(Arc::clone(&self.ranks))
    }

    fn camera(&self) -> SimulatedCamera {
        let sim = &self.config.simulation;
        let scene_camera = SceneCamera::default();
        let mut camera = SimulatedCamera::new(
            Vec3::from(scene_camera.eye),
            Vec3::from(scene_camera.target),
            ViewportRect::from_size(sim.viewport_width, sim.viewport_height),
        );
        camera.fov_y_degrees = sim.fov_y_degrees;
        camera.near = sim.near;
        camera.far = sim.far;
        camera
    }

    /// 處理 CLI 命令
    pub async fn handle_command(&mut self, cli: Cli) -> Result<()> {
        match cli.command {
            Commands::Project { x, y, z, tolerance_x, tolerance_y } => {
                self.cmd_project(Vec3::new(x, y, z), tolerance_x, tolerance_y)
            },
            Commands::Clamp { x, y, width, height, half_x, half_y } => {
                self.cmd_clamp(Vec2::new(x, y), width, height, half_x, half_y)
            },
            Commands::Classify { base_id, kind, sub_kind, position } => {
                self.cmd_classify(base_id, kind, sub_kind, position)
            },
            Commands::Simulate { scene, frames, random, extent, realtime, autosave } => {
                let config_path = autosave.then(|| cli.config.clone());
                self.cmd_simulate(scene, frames, random, extent, realtime, config_path).await
            },
            Commands::InitConfig { force } => {
                self.cmd_init_config(&cli.config, force)
            },
        }
    }

    /// 投影命令
    fn cmd_project(&self, world: Vec3<f32>, tolerance_x: Option<f32>, tolerance_y: Option<f32>) -> Result<()> {
        let camera = self.camera();
        let frame = FrameContext::capture(&camera);
        let mut tolerance = self.config.overlay.tolerance();
        tolerance.x = tolerance_x.unwrap_or(tolerance.x);
        tolerance.y = tolerance_y.unwrap_or(tolerance.y);

        let projection = frame.project_with(world, None, tolerance);
        let clamped = (!projection.visible)
            .then(|| clamp_to_border(frame.viewport(), projection.screen, self.config.overlay.half_extent()));

        if self.json {
            let value = json!({
                "screen": projection.screen.into_array(),
                "depth": projection.depth,
                "visible": projection.visible,
                "clamped": clamped.and_then(|c| c.into_option()).map(|p| p.into_array()),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        println!("{} ({:.2}, {:.2})", "螢幕座標:".bold(), projection.screen.x, projection.screen.y);
        println!("{} {:.4}", "深度:".bold(), projection.depth);
        if projection.visible {
            println!("{} {}", "可見:".bold(), "是".green());
        } else {
            println!("{} {}", "可見:".bold(), "否".red());
            match clamped.and_then(|c| c.into_option()) {
                Some(p) => println!("{} ({:.2}, {:.2})", "邊緣位置:".bold(), p.x, p.y),
                None => println!("{}", "無法夾取到邊緣".yellow()),
            }
        }
        Ok(())
    }

    /// 夾取命令
    fn cmd_clamp(
        &self,
        screen: Vec2<f32>,
        width: Option<f32>,
        height: Option<f32>,
        half_x: Option<f32>,
        half_y: Option<f32>,
    ) -> Result<()> {
        let sim = &self.config.simulation;
        let width = width.unwrap_or(sim.viewport_width);
        let height = height.unwrap_or(sim.viewport_height);
        if !(width > 0.0 && height > 0.0) {
            anyhow::bail!("視口大小必須為正數: {}x{}", width, height);
        }

        let default_half = self.config.overlay.half_extent();
        let half = Vec2::new(half_x.unwrap_or(default_half.x), half_y.unwrap_or(default_half.y));
        let clamped = clamp_to_border(ViewportRect::from_size(width, height), screen, half);

        if self.json {
            let value = json!({
                "position": clamped.position.into_array(),
                "found": clamped.found,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else if clamped.found {
            println!("{} ({:.2}, {:.2})", "邊緣位置:".bold(), clamped.position.x, clamped.position.y);
        } else {
            println!("{}", "沒有交點（目標在內縮矩形內或位於中心）".yellow());
        }
        Ok(())
    }

    /// 分類命令
    fn cmd_classify(&self, base_id: u32, kind: u8, sub_kind: u8, position: Option<Vec<f32>>) -> Result<()> {
        let position = match position.as_deref() {
            Some([x, y, z]) => Vec3::new(*x, *y, *z),
            Some(other) => anyhow::bail!("位置需要 3 個數值，收到 {}", other.len()),
            None => Vec3::zero(),
        };
        let obj = GameObject::new(0, base_id, ObjectKind::from_raw(kind), position).with_sub_kind(sub_kind);
        let class = self.classifier().classify(&obj);

        if self.json {
            let value = json!({ "base_id": base_id, "class": class });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            println!("{} -> {}", base_id, paint_class(class));
        }
        Ok(())
    }

    /// 模擬命令
    async fn cmd_simulate(
        &self,
        scene_path: Option<PathBuf>,
        frames: u64,
        random: usize,
        extent: f32,
        realtime: bool,
        config_path: Option<PathBuf>,
    ) -> Result<()> {
        let mut scene = match scene_path {
            Some(path) => Scene::from_file(path)?,
            None => Scene::default(),
        };
        if random > 0 {
            scene.populate_random(&mut rand::rng(), random, extent);
        }
        if scene.entities.is_empty() {
            warn!("場景沒有任何實體");
        }

        let pipeline = MarkerPipeline::new(self.classifier(), self.config.overlay.clone());
        let mut simulator = Simulator::new(self.config.clone(), pipeline, scene);
        let report = simulator
            .run(SimulationOptions { frames, realtime, config_path })
            .await;

        if self.json {
            let value = json!({
                "frames": report.frames,
                "on_screen": report.totals.on_screen,
                "pinned": report.totals.pinned,
                "dropped": report.totals.dropped,
                "filtered": report.totals.filtered,
                "minimap_hits": report.minimap_hits,
                "recorded_objects": report.recorded_objects,
                "saves": report.saves,
                "last_markers": report.last_markers,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        println!("{}", format!("=== 模擬結果 ({} 幀) ===", report.frames).bold());
        println!("視口內: {}  邊緣: {}  丟棄: {}  過濾: {}",
            report.totals.on_screen, report.totals.pinned, report.totals.dropped, report.totals.filtered);
        println!("小地圖命中: {}  記錄迷宮物件: {}", report.minimap_hits, report.recorded_objects);
        for marker in &report.last_markers {
            print_marker(marker);
        }
        Ok(())
    }

    /// 寫出預設配置
    fn cmd_init_config(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            anyhow::bail!("配置檔案已存在: {} (使用 --force 覆寫)", path.display());
        }
        AppConfig::default().save_to_file(path)?;
        info!("已寫出預設配置: {}", path.display());
        Ok(())
    }
}

fn paint_class(class: EntityClass) -> ColoredString {
    let label = class.to_string();
    match class {
        EntityClass::Trap => label.red().bold(),
        EntityClass::AccursedHoard | EntityClass::SilverCoffer => label.yellow().bold(),
        EntityClass::HuntRankS => label.magenta().bold(),
        EntityClass::HuntRankA | EntityClass::HuntRankB => label.magenta(),
        EntityClass::EurekaNotorious | EntityClass::FateNotorious => label.cyan(),
        EntityClass::None => label.dimmed(),
        _ => label.normal(),
    }
}

fn print_marker(marker: &Marker) {
    let pos = marker.placement.position();
    let place = match marker.placement {
        Placement::OnScreen { .. } => "視口內".green(),
        Placement::Pinned { .. } => "邊緣".yellow(),
    };
    println!(
        "  #{:<5} {:<14} {} ({:>7.1}, {:>7.1})  深度 {:>7.2}  距離 {:>6.1}",
        marker.id,
        paint_class(marker.class),
        place,
        pos.x,
        pos.y,
        marker.depth,
        marker.distance
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "radar", "clamp", "-50", "400", "--width", "1000", "-H", "800", "--half-x", "10",
        ])
        .unwrap();
        match cli.command {
            Commands::Clamp { x, y, width, height, half_x, half_y } => {
                assert_eq!((x, y), (-50.0, 400.0));
                assert_eq!(width, Some(1000.0));
                assert_eq!(height, Some(800.0));
                assert_eq!(half_x, Some(10.0));
                assert_eq!(half_y, None);
            }
            _ => panic!("應解析為 clamp"),
        }
    }

    #[test]
    fn test_project_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["radar", "project", "-5", "0", "-2.5", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Project { x, y, z, .. } => assert_eq!((x, y, z), (-5.0, 0.0, -2.5)),
            _ => panic!("應解析為 project"),
        }
    }

    #[test]
    fn test_classify_negative_position() {
        let cli = Cli::try_parse_from(["radar", "classify", "6388", "--position", "-1", "0", "3"]).unwrap();
        match cli.command {
            Commands::Classify { base_id, position, .. } => {
                assert_eq!(base_id, 6388);
                assert_eq!(position, Some(vec![-1.0, 0.0, 3.0]));
            }
            _ => panic!("應解析為 classify"),
        }
    }
}
