use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use metadata::ReadingOrder;
use tracing::Level;

/// 车牌识别: 从车辆照片中识别车牌号码
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// 待识别的图片文件
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// 图片文件内容为 base64 编码文本
    #[arg(long, default_value_t = false)]
    pub base64: bool,

    /// 配置文件路径, 不存在时使用内置配置
    #[arg(short, long, default_value = "carplate.yaml")]
    pub config_file: PathBuf,

    /// 检测模型路径, 覆盖配置文件中的设置
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// 字符排序方向, 覆盖配置文件中的设置
    #[arg(long, value_enum)]
    pub reading_order: Option<ReadingOrderArg>,

    /// 日志等级 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: Option<Level>,

    /// 日志文件路径
    #[arg(long, default_value = "carplate.log")]
    pub log_file: String,

    /// 追加日志到文件
    #[arg(long, default_value_t = false)]
    pub append_log: bool,
}

/// 字符排序方向
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingOrderArg {
    LeftToRight,
    RightToLeft,
}

impl From<ReadingOrderArg> for ReadingOrder {
    fn from(arg: ReadingOrderArg) -> Self {
        match arg {
            ReadingOrderArg::LeftToRight => ReadingOrder::LeftToRight,
            ReadingOrderArg::RightToLeft => ReadingOrder::RightToLeft,
        }
    }
}

impl Args {
    /// 创建命令行参数解析器
    pub fn new() -> Self {
        Self::parse()
    }
}
