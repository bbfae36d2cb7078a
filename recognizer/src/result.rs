use serde::Serialize;

use crate::error::{ErrorKind, RecognizeError};

/// 车牌识别结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionResult {
    Success { text: String },
    Failure { reason: ErrorKind, message: String },
}

impl RecognitionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RecognitionResult::Success { .. })
    }

    /// 识别出的车牌文本, 失败时为 `None`
    pub fn text(&self) -> Option<&str> {
        match self {
            RecognitionResult::Success { text } => Some(text),
            RecognitionResult::Failure { .. } => None,
        }
    }

    /// 失败原因, 成功时为 `None`
    pub fn reason(&self) -> Option<ErrorKind> {
        match self {
            RecognitionResult::Success { .. } => None,
            RecognitionResult::Failure { reason, .. } => Some(*reason),
        }
    }
}

impl From<RecognizeError> for RecognitionResult {
    fn from(error: RecognizeError) -> Self {
        RecognitionResult::Failure {
            reason: error.kind(),
            message: error.to_string(),
        }
    }
}

/// 对外响应
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PlateResponse {
    pub success: bool,
    pub car_number: Option<String>,
    pub error: Option<String>,
}

impl From<RecognitionResult> for PlateResponse {
    fn from(result: RecognitionResult) -> Self {
        match result {
            RecognitionResult::Success { text } => Self {
                success: true,
                car_number: Some(text),
                error: None,
            },
            RecognitionResult::Failure { message, .. } => Self {
                success: false,
                car_number: None,
                error: Some(message),
            },
        }
    }
}
