use anyhow::Result;
use detector::YoloDetector;
use metadata::{RecognizerConfig, SYMBOL_TABLE};
use recognizer::{ErrorKind, PlateResponse, RecognitionResult, Recognizer};
use tracing::{error, info};

use crate::{args::Args, input::load_image_bytes, log::init_log};

mod args;
mod error;
mod input;
mod log;

/// 程序入口, 返回是否全部识别成功
fn application() -> Result<bool> {
    let args = Args::new();

    init_log(&args)?;

    let mut config = RecognizerConfig::load_or_builtin(&args.config_file)?;
    if let Some(model) = &args.model {
        config.model.path = model.clone();
    }
    if let Some(reading_order) = args.reading_order {
        config.reading_order = reading_order.into();
    }

    // 检测模型只加载一次
    let detector = YoloDetector::new(&config.model, config.input_mode)?;
    let recognizer = Recognizer::from_config(&detector, &SYMBOL_TABLE, &config);

    let mut all_success = true;
    for path in args.images.iter() {
        info!("开始识别 {}", path.display());
        let result = match load_image_bytes(path, args.base64) {
            Ok(bytes) => recognizer.recognize(&bytes),
            Err(e) => RecognitionResult::Failure {
                reason: ErrorKind::InvalidInput,
                message: e.to_string(),
            },
        };
        all_success &= result.is_success();

        let response = PlateResponse::from(result);
        println!("{}", serde_json::to_string(&response)?);
    }
    Ok(all_success)
}

fn main() {
    match application() {
        Ok(true) => info!("程序已执行完毕"),
        Ok(false) => {
            error!("部分图片识别失败");
            std::process::exit(1);
        }
        Err(e) => {
            error!("程序存在异常: {:#}", e);
            eprintln!("程序存在异常: {:#}", e);
            std::process::exit(1);
        }
    }
}
