mod detector;
mod letterbox;
mod nms;
mod yolo;

pub use detector::{Detector, ModelDetection, ModelInput};
pub use letterbox::Letterbox;
pub use metadata::InputMode;
pub use nms::non_max_suppression;
pub use yolo::YoloDetector;
