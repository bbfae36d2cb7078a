use std::{
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
};

use anyhow::{Result, anyhow};
use common::BoundingBox;
use detector::{Detector, InputMode, ModelDetection, ModelInput};
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::{error::RecognizeError, temp_image::TempImage};

/// 单个字符的检测结果
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub class_label: String,
    pub bounding_box: BoundingBox,
    pub confidence: f32,
}

impl RawDetection {
    pub fn new(class_label: impl Into<String>, bounding_box: BoundingBox, confidence: f32) -> Self {
        Self {
            class_label: class_label.into(),
            bounding_box,
            confidence,
        }
    }

    /// 转换模型输出, 坐标非有限值或置信度越界时视为不可用
    ///
    /// # 参数
    ///
    /// * `detection` - 模型检测结果
    fn from_model(detection: ModelDetection) -> Result<Self> {
        if !detection.bbox.is_finite() {
            return Err(anyhow!(
                "类别 '{}' 的检测框坐标无效: {:?}",
                detection.class_name,
                detection.bbox
            ));
        }
        if !(0.0..=1.0).contains(&detection.confidence) {
            return Err(anyhow!(
                "类别 '{}' 的置信度越界: {}",
                detection.class_name,
                detection.confidence
            ));
        }
        Ok(Self::new(
            detection.class_name,
            detection.bbox,
            detection.confidence,
        ))
    }
}

/// 检测器适配器
///
/// 负责图片解码、临时文件的生命周期以及检测结果的校验
pub struct DetectorAdapter<'a> {
    detector: &'a dyn Detector,
    temp_dir: PathBuf,
}

impl<'a> DetectorAdapter<'a> {
    /// 创建适配器
    ///
    /// # 参数
    ///
    /// * `detector` - 字符检测器
    /// * `temp_dir` - 临时文件目录, 仅在检测器需要文件输入时使用
    pub fn new(detector: &'a dyn Detector, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            detector,
            temp_dir: temp_dir.into(),
        }
    }

    /// 解码图片数据
    ///
    /// # 参数
    ///
    /// * `bytes` - 图片数据
    pub fn decode(&self, bytes: &[u8]) -> Result<(DynamicImage, ImageFormat), RecognizeError> {
        let format = image::guess_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;
        debug!(
            "图片解码成功: {:?} {}x{}",
            format,
            image.width(),
            image.height()
        );
        Ok((image, format))
    }

    /// 检测图片中的车牌字符
    ///
    /// # 参数
    ///
    /// * `bytes` - 图片数据
    pub fn detect(&self, bytes: &[u8]) -> Result<Vec<RawDetection>, RecognizeError> {
        let (image, format) = self.decode(bytes)?;
        self.detect_decoded(bytes, &image, format)
    }

    /// 对已解码的图片执行检测
    ///
    /// # 参数
    ///
    /// * `bytes` - 原始图片数据, 写入临时文件时使用
    /// * `image` - 解码后的图片
    /// * `format` - 图片格式
    pub fn detect_decoded(
        &self,
        bytes: &[u8],
        image: &DynamicImage,
        format: ImageFormat,
    ) -> Result<Vec<RawDetection>, RecognizeError> {
        let detections = match self.detector.input_mode() {
            InputMode::Memory => self.run(ModelInput::Image(image)),
            InputMode::File => {
                let extension = format.extensions_str().first().copied().unwrap_or("img");
                let temp = TempImage::create(&self.temp_dir, bytes, extension)
                    .map_err(RecognizeError::Inference)?;
                self.run(ModelInput::File(temp.path()))
            }
        }?;

        detections
            .into_iter()
            .map(RawDetection::from_model)
            .collect::<Result<Vec<_>>>()
            .map_err(RecognizeError::Inference)
    }

    /// 调用检测器, 检测器 panic 时转换为推理错误
    fn run(&self, input: ModelInput<'_>) -> Result<Vec<ModelDetection>, RecognizeError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.detector.detect(input)))
            .unwrap_or_else(|_| Err(anyhow!("检测器异常终止")))
            .map_err(RecognizeError::Inference)
    }
}
