pub mod analysis;

pub use analysis::{AnalysisInput, AnalysisResult, ImageMime, IndicatorStatus, KeyIndicator};
