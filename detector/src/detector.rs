use std::path::Path;

use anyhow::Result;
use common::BoundingBox;
use image::DynamicImage;
use metadata::InputMode;

/// 模型检测结果
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDetection {
    pub class_id: usize,
    pub class_name: String,
    pub bbox: BoundingBox,
    pub confidence: f32,
}

/// 模型输入
#[derive(Debug, Clone, Copy)]
pub enum ModelInput<'a> {
    Image(&'a DynamicImage), // 解码后的图像
    File(&'a Path),          // 图像文件路径
}

/// 字符检测接口
///
/// 实现需保证可在多个线程间共享, 内部不支持并发推理时需自行串行化
pub trait Detector: Send + Sync {
    /// 模型需要的输入方式
    fn input_mode(&self) -> InputMode {
        InputMode::Memory
    }

    /// 检测图片中的车牌字符
    ///
    /// # 参数
    ///
    /// * `input` - 待检测的图片
    fn detect(&self, input: ModelInput<'_>) -> Result<Vec<ModelDetection>>;
}
