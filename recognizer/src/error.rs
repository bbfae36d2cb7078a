use serde::Serialize;
use thiserror::Error;

/// 识别失败原因
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,   // 图片数据为空
    InvalidImage,   // 图片无法解码
    InferenceError, // 模型推理失败
}

#[derive(Error, Debug)]
pub enum RecognizeError {
    #[error("图片数据为空")]
    InvalidInput,
    #[error("图片无法解码: {0}")]
    InvalidImage(#[from] image::ImageError),
    #[error("车牌字符检测失败: {0:#}")]
    Inference(anyhow::Error),
}

impl RecognizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecognizeError::InvalidInput => ErrorKind::InvalidInput,
            RecognizeError::InvalidImage(_) => ErrorKind::InvalidImage,
            RecognizeError::Inference(_) => ErrorKind::InferenceError,
        }
    }
}
