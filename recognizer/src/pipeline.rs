use std::{fmt, path::PathBuf, time::Instant};

use detector::Detector;
use metadata::{ReadingOrder, RecognizerConfig, SymbolTable};
use tracing::{debug, info, warn};

use crate::{
    adapter::DetectorAdapter, assembly::Assembler, error::RecognizeError,
    result::RecognitionResult,
};

/// 识别阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Decoding,
    Detecting,
    Assembling,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Decoding => "解码",
            Stage::Detecting => "检测",
            Stage::Assembling => "拼接",
            Stage::Done => "完成",
        };
        f.write_str(name)
    }
}

/// 车牌识别器
///
/// 每次调用相互独立, 可在多个线程中共享同一实例
pub struct Recognizer<'a> {
    adapter: DetectorAdapter<'a>,
    assembler: Assembler<'a>,
}

impl<'a> Recognizer<'a> {
    /// 创建识别器
    ///
    /// # 参数
    ///
    /// * `detector` - 字符检测器
    /// * `symbols` - 字符映射表
    /// * `reading_order` - 字符排序方向
    /// * `no_text` - 未识别到字符时返回的文本
    /// * `temp_dir` - 临时文件目录
    pub fn new(
        detector: &'a dyn Detector,
        symbols: &'a SymbolTable,
        reading_order: ReadingOrder,
        no_text: impl Into<String>,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            adapter: DetectorAdapter::new(detector, temp_dir),
            assembler: Assembler::new(symbols, reading_order, no_text),
        }
    }

    /// 通过配置创建识别器
    ///
    /// # 参数
    ///
    /// * `detector` - 字符检测器
    /// * `symbols` - 字符映射表
    /// * `config` - 识别配置
    pub fn from_config(
        detector: &'a dyn Detector,
        symbols: &'a SymbolTable,
        config: &RecognizerConfig,
    ) -> Self {
        Self::new(
            detector,
            symbols,
            config.reading_order,
            config.no_text.clone(),
            config.temp_dir(),
        )
    }

    /// 识别图片中的车牌号码
    ///
    /// # 参数
    ///
    /// * `image_bytes` - 图片数据
    pub fn recognize(&self, image_bytes: &[u8]) -> RecognitionResult {
        let start = Instant::now();
        match self.run(image_bytes) {
            Ok(text) => {
                info!("车牌识别成功: {}, 耗时 {:?}", text, start.elapsed());
                RecognitionResult::Success { text }
            }
            Err(e) => {
                warn!("车牌识别失败: {}, 耗时 {:?}", e, start.elapsed());
                e.into()
            }
        }
    }

    fn run(&self, image_bytes: &[u8]) -> Result<String, RecognizeError> {
        enter(Stage::Decoding);
        if image_bytes.is_empty() {
            return Err(RecognizeError::InvalidInput);
        }
        let (image, format) = self.adapter.decode(image_bytes)?;

        enter(Stage::Detecting);
        let detections = self.adapter.detect_decoded(image_bytes, &image, format)?;
        debug!("检测到 {} 个字符候选", detections.len());

        enter(Stage::Assembling);
        let text = self.assembler.assemble(&detections);
        if text == self.assembler.no_text() {
            debug!("未找到可映射的车牌字符");
        }

        enter(Stage::Done);
        Ok(text)
    }
}

fn enter(stage: Stage) {
    debug!("车牌识别阶段: {}", stage);
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        io::Cursor,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
    };

    use super::*;
    use crate::error::ErrorKind;
    use anyhow::{Result, anyhow};
    use common::BoundingBox;
    use detector::{InputMode, ModelDetection, ModelInput};
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
    use metadata::SYMBOL_TABLE;

    const NO_TEXT: &str = "无";

    fn encode_png(image: RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    /// 第一个像素的红色通道记录编号
    fn numbered_png(n: u8) -> Vec<u8> {
        encode_png(RgbImage::from_pixel(4, 4, Rgb([n, 0, 0])))
    }

    fn detection(label: &str, anchor_x: f32) -> ModelDetection {
        ModelDetection {
            class_id: 0,
            class_name: label.to_string(),
            bbox: BoundingBox::new(anchor_x - 1.0, 0.0, anchor_x + 1.0, 2.0),
            confidence: 0.8,
        }
    }

    /// 返回固定结果并统计调用次数
    struct CountingDetector {
        detections: Vec<ModelDetection>,
        calls: AtomicUsize,
    }

    impl CountingDetector {
        fn new(detections: Vec<ModelDetection>) -> Self {
            Self {
                detections,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Detector for CountingDetector {
        fn detect(&self, _input: ModelInput<'_>) -> Result<Vec<ModelDetection>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.detections.clone())
        }
    }

    /// 从临时文件读取编号, 以编号个位数作为识别结果, 编号为 7 的倍数时模拟失败
    struct NumberedFileDetector {
        seen: Mutex<HashSet<PathBuf>>,
    }

    impl Detector for NumberedFileDetector {
        fn input_mode(&self) -> InputMode {
            InputMode::File
        }

        fn detect(&self, input: ModelInput<'_>) -> Result<Vec<ModelDetection>> {
            let ModelInput::File(path) = input else {
                return Err(anyhow!("需要文件输入"));
            };
            if !self.seen.lock().unwrap().insert(path.to_path_buf()) {
                return Err(anyhow!("临时文件重名: {}", path.display()));
            }

            let n = image::open(path)?.get_pixel(0, 0).0[0];
            if n % 7 == 0 {
                return Err(anyhow!("模拟推理失败: {}", n));
            }
            Ok(vec![
                detection(&(n % 10).to_string(), 1.0),
                detection("alef", 2.0),
            ])
        }
    }

    #[test]
    fn test_recognize_success() {
        let detector = CountingDetector::new(vec![
            detection("sen", 30.0),
            detection("5", 10.0),
            detection("beh", 20.0),
        ]);
        let recognizer = Recognizer::new(
            &detector,
            &SYMBOL_TABLE,
            ReadingOrder::LeftToRight,
            NO_TEXT,
            std::env::temp_dir(),
        );
        let result = recognizer.recognize(&numbered_png(1));
        assert_eq!(
            result,
            RecognitionResult::Success {
                text: "٥ ب س".to_string()
            }
        );
    }

    #[test]
    fn test_recognize_empty_input() {
        let detector = CountingDetector::new(vec![]);
        let recognizer = Recognizer::new(
            &detector,
            &SYMBOL_TABLE,
            ReadingOrder::LeftToRight,
            NO_TEXT,
            std::env::temp_dir(),
        );
        let result = recognizer.recognize(b"");
        assert_eq!(result.reason(), Some(ErrorKind::InvalidInput));
        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_recognize_invalid_image() {
        let detector = CountingDetector::new(vec![]);
        let recognizer = Recognizer::new(
            &detector,
            &SYMBOL_TABLE,
            ReadingOrder::LeftToRight,
            NO_TEXT,
            std::env::temp_dir(),
        );
        let result = recognizer.recognize(b"\x89PNG broken");
        assert_eq!(result.reason(), Some(ErrorKind::InvalidImage));
        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_recognize_no_text() {
        let detector = CountingDetector::new(vec![detection("plate", 1.0)]);
        let recognizer = Recognizer::new(
            &detector,
            &SYMBOL_TABLE,
            ReadingOrder::LeftToRight,
            NO_TEXT,
            std::env::temp_dir(),
        );
        let result = recognizer.recognize(&numbered_png(1));
        assert_eq!(
            result,
            RecognitionResult::Success {
                text: NO_TEXT.to_string()
            }
        );
        assert_eq!(detector.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_recognize_from_config() -> Result<()> {
        let mut config = RecognizerConfig::builtin()?;
        config.reading_order = ReadingOrder::RightToLeft;

        let detector = CountingDetector::new(vec![detection("1", 10.0), detection("2", 20.0)]);
        let recognizer = Recognizer::from_config(&detector, &SYMBOL_TABLE, &config);
        assert_eq!(recognizer.recognize(&numbered_png(1)).text(), Some("٢ ١"));
        assert_eq!(
            recognizer.recognize(&[]).reason(),
            Some(ErrorKind::InvalidInput)
        );
        Ok(())
    }

    #[test]
    fn test_concurrent_file_input() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let detector = NumberedFileDetector {
            seen: Mutex::new(HashSet::new()),
        };
        let recognizer = Recognizer::new(
            &detector,
            &SYMBOL_TABLE,
            ReadingOrder::LeftToRight,
            NO_TEXT,
            dir.path(),
        );

        let results: Vec<(u8, RecognitionResult)> = thread::scope(|scope| {
            let handles: Vec<_> = (1..=100u8)
                .map(|n| {
                    let recognizer = &recognizer;
                    scope.spawn(move || (n, recognizer.recognize(&numbered_png(n))))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let digits = SYMBOL_TABLE.entries();
        for (n, result) in results {
            if n % 7 == 0 {
                assert_eq!(result.reason(), Some(ErrorKind::InferenceError));
            } else {
                let digit = &digits[(n % 10) as usize].character;
                assert_eq!(result.text(), Some(format!("{} ا", digit).as_str()));
            }
        }

        assert_eq!(detector.seen.lock().unwrap().len(), 100);
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }
}
