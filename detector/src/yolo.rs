use std::{
    path::Path,
    sync::{Mutex, PoisonError},
};

use anyhow::{Context, Result, anyhow, bail};
use common::BoundingBox;
use image::DynamicImage;
use metadata::{InputMode, ModelConfig};
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use tracing::debug;

use crate::{
    detector::{Detector, ModelDetection, ModelInput},
    letterbox::Letterbox,
    nms::non_max_suppression,
};

/// 基于 YOLO 的车牌字符检测实现
///
/// 推理会话由互斥锁保护, 多线程调用时推理串行执行, 预处理与后处理可并行
pub struct YoloDetector {
    session: Mutex<Session>,
    postprocess: Postprocess,
    input_size: u32,
    input_mode: InputMode,
}

/// 模型输出后处理参数
#[derive(Debug, Clone)]
struct Postprocess {
    class_names: Vec<String>,
    confidence_threshold: f32,
    iou_threshold: f32,
}

impl YoloDetector {
    /// 加载检测模型
    ///
    /// # 参数
    ///
    /// * `config` - 模型配置
    /// * `input_mode` - 模型输入方式
    pub fn new(config: &ModelConfig, input_mode: InputMode) -> Result<YoloDetector> {
        Self::check_config(config)?;
        if !config.path.exists() {
            bail!("检测模型文件 {} 不存在", config.path.display());
        }

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.intra_threads)?
            .commit_from_file(&config.path)
            .with_context(|| format!("加载检测模型 {} 失败", config.path.display()))?;

        debug!("YOLO 检测模型加载成功: {}", config.path.display());

        Ok(YoloDetector {
            session: Mutex::new(session),
            postprocess: Postprocess {
                class_names: config.class_names.clone(),
                confidence_threshold: config.confidence_threshold,
                iou_threshold: config.iou_threshold,
            },
            input_size: config.input_size,
            input_mode,
        })
    }

    /// 校验模型配置, 在加载模型前拒绝无法推理的参数
    ///
    /// # 参数
    ///
    /// * `config` - 模型配置
    fn check_config(config: &ModelConfig) -> Result<()> {
        if config.class_names.is_empty() {
            bail!("模型类别标签不能为空");
        }
        if config.input_size == 0 {
            bail!("模型输入边长必须大于 0");
        }
        if !(0.0..=1.0).contains(&config.confidence_threshold) {
            bail!("置信度阈值 {} 不在 [0, 1] 范围内", config.confidence_threshold);
        }
        if !(0.0..=1.0).contains(&config.iou_threshold) {
            bail!("交并比阈值 {} 不在 [0, 1] 范围内", config.iou_threshold);
        }
        Ok(())
    }

    /// 读取图片文件
    ///
    /// # 参数
    ///
    /// * `path` - 图片文件路径
    fn open_image(path: &Path) -> Result<DynamicImage> {
        image::open(path).with_context(|| format!("读取图片文件 {} 失败", path.display()))
    }

    /// 执行推理, 返回输出形状与数据
    ///
    /// # 参数
    ///
    /// * `image` - 输入图像
    fn infer(&self, image: &DynamicImage) -> Result<(Vec<usize>, Vec<f32>, Letterbox)> {
        let (tensor, letterbox) = Letterbox::apply(image, self.input_size);
        let tensor = TensorRef::from_array_view(tensor.view())?;

        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let outputs = session.run(ort::inputs![tensor])?;
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let output_shape = output_shape.iter().map(|&d| d as usize).collect();

        Ok((output_shape, output_data.to_vec(), letterbox))
    }
}

impl Postprocess {
    /// 解析模型输出
    ///
    /// 输出形状为 `[1, 4 + 类别数, 候选框数]`, 前四行为中心点坐标与宽高
    ///
    /// # 参数
    ///
    /// * `output_shape` - 输出形状
    /// * `output_data` - 输出数据
    /// * `letterbox` - 预处理变换参数
    fn decode(
        &self,
        output_shape: &[usize],
        output_data: &[f32],
        letterbox: &Letterbox,
    ) -> Result<Vec<ModelDetection>> {
        if output_shape.len() != 3 || output_shape[0] != 1 {
            return Err(anyhow!("意想不到的输出形状: {:?}", output_shape));
        }

        let num_classes = self.class_names.len();
        let (rows, anchors) = (output_shape[1], output_shape[2]);
        if rows != 4 + num_classes {
            return Err(anyhow!(
                "模型类别数 {} 与配置的类别数 {} 不一致",
                rows.saturating_sub(4),
                num_classes
            ));
        }
        if output_data.len() != rows * anchors {
            return Err(anyhow!("意想不到的输出长度: {}", output_data.len()));
        }

        let output = ndarray::ArrayView2::from_shape((rows, anchors), output_data)
            .map_err(|e| anyhow!("转换输出到数组视图失败: {}", e))?;

        let mut detections = Vec::new();
        for anchor in output.columns() {
            let Some((class_id, &confidence)) = anchor
                .iter()
                .skip(4)
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
            else {
                continue;
            };
            if confidence < self.confidence_threshold {
                continue;
            }

            let bbox = BoundingBox::from_center(anchor[0], anchor[1], anchor[2], anchor[3]);
            detections.push(ModelDetection {
                class_id,
                class_name: self.class_names[class_id].clone(),
                bbox: letterbox.to_source(&bbox),
                confidence,
            });
        }

        let candidates = detections.len();
        let detections = non_max_suppression(detections, self.iou_threshold);
        debug!("候选字符 {} 个, 抑制后保留 {} 个", candidates, detections.len());

        Ok(detections)
    }
}

impl Detector for YoloDetector {
    fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    fn detect(&self, input: ModelInput<'_>) -> Result<Vec<ModelDetection>> {
        let opened;
        let image = match input {
            ModelInput::Image(image) => image,
            ModelInput::File(path) => {
                opened = Self::open_image(path)?;
                &opened
            }
        };

        let (output_shape, output_data, letterbox) = self.infer(image)?;
        self.postprocess.decode(&output_shape, &output_data, &letterbox)
    }
}
