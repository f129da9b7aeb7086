/// 疊加層幾何
///
/// 世界座標投影、邊界夾取、小地圖與每幀標記管線

pub mod border_clamp;
pub mod minimap;
pub mod pipeline;
pub mod projection;

pub use border_clamp::{clamp_to_border, ClampedMarker};
pub use minimap::MinimapProjector;
pub use pipeline::{FrameStats, Marker, MarkerPipeline, Placement};
pub use projection::{FrameContext, Projection, Tolerance};
