use crate::detector::ModelDetection;

/// 按类别进行非极大值抑制
///
/// 返回结果按置信度从高到低排列
///
/// # 参数
///
/// * `detections` - 检测结果
/// * `iou_threshold` - 交并比阈值, 同类别检测框交并比超过该值时保留置信度更高者
pub fn non_max_suppression(
    mut detections: Vec<ModelDetection>,
    iou_threshold: f32,
) -> Vec<ModelDetection> {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<ModelDetection> = Vec::with_capacity(detections.len());
    for detection in detections {
        let suppressed = kept.iter().any(|k| {
            k.class_id == detection.class_id && k.bbox.iou(&detection.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(detection);
        }
    }
    kept
}
