use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 字符排序方向
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadingOrder {
    #[default]
    #[schemars(title = "从左到右")]
    LeftToRight,
    #[schemars(title = "从右到左")]
    RightToLeft,
}

/// 模型输入方式
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// 直接传入解码后的图像
    #[default]
    #[schemars(title = "内存")]
    Memory,
    /// 先写入临时文件再传入文件路径
    #[schemars(title = "临时文件")]
    File,
}

/// 检测模型配置
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone)]
pub struct ModelConfig {
    #[schemars(title = "ONNX 模型路径")]
    pub path: PathBuf,
    #[schemars(title = "模型输入边长")]
    pub input_size: u32,
    #[schemars(title = "置信度阈值")]
    pub confidence_threshold: f32,
    #[schemars(title = "非极大值抑制交并比阈值")]
    pub iou_threshold: f32,
    #[schemars(title = "推理线程数")]
    pub intra_threads: usize,
    #[schemars(title = "模型类别标签(按类别序号排列)")]
    pub class_names: Vec<String>,
}

/// 识别配置
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone)]
pub struct RecognizerConfig {
    #[schemars(title = "检测模型")]
    pub model: ModelConfig,
    #[schemars(title = "模型输入方式")]
    #[serde(default)]
    pub input_mode: InputMode,
    #[schemars(title = "临时文件目录(默认系统临时目录)")]
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
    #[schemars(title = "字符排序方向")]
    #[serde(default)]
    pub reading_order: ReadingOrder,
    #[schemars(title = "未识别到字符时返回的文本")]
    pub no_text: String,
}

impl RecognizerConfig {
    /// 加载内置默认配置
    pub fn builtin() -> Result<Self> {
        Ok(serde_yaml::from_str(include_str!("../config.yaml"))?)
    }

    /// 通过文件名加载配置
    ///
    /// # 参数
    ///
    /// * `config_file` - 配置文件名
    pub fn load(config_file: impl AsRef<Path>) -> Result<Self> {
        let config_file = config_file.as_ref();
        let config_data = fs::read(config_file).context("读取配置文件失败")?;
        let config = serde_yaml::from_slice::<Self>(config_data.as_slice())
            .context("解析配置文件失败, 请检查格式是否正确")?;
        debug!("已加载配置文件 {}", config_file.display());
        Ok(config)
    }

    /// 加载配置文件, 文件不存在时使用内置默认配置
    ///
    /// # 参数
    ///
    /// * `config_file` - 配置文件名
    pub fn load_or_builtin(config_file: impl AsRef<Path>) -> Result<Self> {
        let config_file = config_file.as_ref();
        if config_file.exists() {
            return Self::load(config_file);
        }
        debug!("配置文件 {} 不存在, 使用内置配置", config_file.display());
        Self::builtin()
    }

    /// 临时文件目录
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SYMBOL_TABLE;

    #[test]
    fn test_builtin_config() -> Result<()> {
        let config = RecognizerConfig::builtin()?;
        assert_eq!(config.model.input_size, 640);
        assert_eq!(config.input_mode, InputMode::Memory);
        assert_eq!(config.reading_order, ReadingOrder::LeftToRight);
        assert!(!config.no_text.is_empty());
        assert_eq!(config.temp_dir(), std::env::temp_dir());
        Ok(())
    }

    #[test]
    fn test_builtin_classes_are_known_symbols() -> Result<()> {
        let config = RecognizerConfig::builtin()?;
        assert_eq!(config.model.class_names.len(), SYMBOL_TABLE.len());
        for name in config.model.class_names.iter() {
            assert!(SYMBOL_TABLE.contains(name), "未收录的类别: {}", name);
        }
        Ok(())
    }

    #[test]
    fn test_parse_optional_fields() -> Result<()> {
        let yaml = r#"
model:
  path: plate.onnx
  input_size: 320
  confidence_threshold: 0.5
  iou_threshold: 0.5
  intra_threads: 1
  class_names: ["0", "1"]
input_mode: file
temp_dir: /tmp/plates
reading_order: right_to_left
no_text: none
"#;
        let config: RecognizerConfig = serde_yaml::from_str(yaml)?;
        assert_eq!(config.input_mode, InputMode::File);
        assert_eq!(config.reading_order, ReadingOrder::RightToLeft);
        assert_eq!(config.temp_dir(), PathBuf::from("/tmp/plates"));
        assert_eq!(config.model.class_names, vec!["0", "1"]);
        Ok(())
    }

    #[test]
    fn test_load_missing_file_falls_back() -> Result<()> {
        let config = RecognizerConfig::load_or_builtin("does-not-exist.yaml")?;
        assert_eq!(config.model.input_size, 640);
        Ok(())
    }
}
