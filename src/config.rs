/// 配置檔案處理
use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::{Result, Context};
use vek::Vec2;

use crate::classifier::EntityClass;
use crate::overlay::Tolerance;

/// 應用程序配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub overlay: OverlayConfig,
    pub simulation: SimulationConfig,
}

/// 疊加層配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// 3D 疊加層總開關
    pub overlay_3d_enabled: bool,
    /// 2D 小地圖
    pub overlay_2d_enabled: bool,
    /// 顯示狩獵與知名怪物
    pub hunt_view: bool,
    /// 顯示深層迷宮陷阱與寶箱
    pub custom_object_view: bool,
    /// 顯示沒有特殊類別的物件
    pub show_normal_objects: bool,
    /// 視口外的標記是否釘在邊緣
    pub show_offscreen: bool,
    /// 標記半尺寸（像素）
    pub marker_half_extent: [f32; 2],
    /// 可見性容差（像素），避免邊緣閃爍
    pub tolerance_x: f32,
    pub tolerance_y: f32,
    /// 小地圖每世界單位的像素數
    pub minimap_scale: f32,
    /// 小地圖半徑（像素）
    pub minimap_radius: f32,
}

/// 模擬宿主配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// 垂直視角（度）
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub frame_rate: u32,
    /// 每隔多少幀在背景儲存配置，0 表示不儲存
    pub save_interval_frames: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            overlay: OverlayConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            overlay_3d_enabled: true,
            overlay_2d_enabled: true,
            hunt_view: true,
            custom_object_view: true,
            show_normal_objects: false,
            show_offscreen: true,
            marker_half_extent: [16.0, 16.0],
            tolerance_x: 0.0,
            tolerance_y: 0.0,
            minimap_scale: 2.0,
            minimap_radius: 150.0,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1920.0,
            viewport_height: 1080.0,
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            frame_rate: 60,
            save_interval_frames: 3600,
        }
    }
}

impl OverlayConfig {
    pub fn half_extent(&self) -> Vec2<f32> {
        Vec2::from(self.marker_half_extent)
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.tolerance_x, self.tolerance_y)
    }

    /// 依開關決定該類別是否繪製
    pub fn should_draw(&self, class: EntityClass) -> bool {
        if !self.overlay_3d_enabled {
            return false;
        }
        match class {
            EntityClass::None => false,
            c if c.is_hunt() => self.hunt_view,
            c if c.is_dungeon_object() => self.custom_object_view,
            _ => self.show_normal_objects,
        }
    }
}

impl AppConfig {
    /// 從檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("無法讀取配置檔案: {}", path.display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("無法解析配置檔案: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// 載入配置 (優先使用檔案，否則使用預設值)
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("已載入配置檔案: {}", path.display());
                config
            },
            Err(e) => {
                log::warn!("無法載入配置檔案，使用預設值: {:#}", e);
                Self::default()
            }
        }
    }

    /// 儲存配置到檔案
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .context("無法序列化配置")?;

        std::fs::write(path, content)
            .with_context(|| format!("無法寫入配置檔案: {}", path.display()))?;

        Ok(())
    }

    /// 檢查數值範圍
    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if !(sim.viewport_width > 0.0 && sim.viewport_height > 0.0) {
            anyhow::bail!("視口大小必須為正數: {}x{}", sim.viewport_width, sim.viewport_height);
        }
        if sim.frame_rate == 0 {
            anyhow::bail!("幀率不可為 0");
        }
        let [hx, hy] = self.overlay.marker_half_extent;
        if hx < 0.0 || hy < 0.0 {
            anyhow::bail!("標記半尺寸不可為負數: {:?}", self.overlay.marker_half_extent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ObjectKind;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("radar_{}_{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("config_roundtrip");
        let mut config = AppConfig::default();
        config.overlay.hunt_view = false;
        config.overlay.marker_half_extent = [8.0, 12.0];
        config.simulation.frame_rate = 30;

        config.save_to_file(&path).unwrap();
        let loaded = AppConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = toml::from_str("[overlay]\nshow_normal_objects = true\n").unwrap();
        assert!(config.overlay.show_normal_objects);
        assert_eq!(config.overlay.marker_half_extent, [16.0, 16.0]);
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = AppConfig::load("/nonexistent/radar.toml");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_invalid_viewport_rejected() {
        let path = temp_path("config_invalid");
        std::fs::write(&path, "[simulation]\nviewport_width = 0.0\n").unwrap();
        let result = AppConfig::from_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_should_draw() {
        let mut overlay = OverlayConfig::default();
        assert!(overlay.should_draw(EntityClass::HuntRankA));
        assert!(overlay.should_draw(EntityClass::Trap));
        assert!(!overlay.should_draw(EntityClass::Normal(ObjectKind::Player)));
        assert!(!overlay.should_draw(EntityClass::None));

        overlay.hunt_view = false;
        assert!(!overlay.should_draw(EntityClass::FateNotorious));

        overlay.show_normal_objects = true;
        assert!(overlay.should_draw(EntityClass::Pet));

        overlay.overlay_3d_enabled = false;
        assert!(!overlay.should_draw(EntityClass::Trap));
    }
}
