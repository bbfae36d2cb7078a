use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

//常用结构体

/// 尺寸
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    #[schemars(title = "宽度")]
    pub width: u32,
    #[schemars(title = "高度")]
    pub height: u32,
}

/// 检测框
///
/// 左上角坐标为 `(x_min, y_min)`，右下角坐标为 `(x_max, y_max)`
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    #[schemars(title = "左上角 X 坐标")]
    pub x_min: f32,
    #[schemars(title = "左上角 Y 坐标")]
    pub y_min: f32,
    #[schemars(title = "右下角 X 坐标")]
    pub x_max: f32,
    #[schemars(title = "右下角 Y 坐标")]
    pub y_max: f32,
}

impl BoundingBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// 由中心点和宽高构造检测框
    ///
    /// # 参数
    ///
    /// - `cx` - 中心点 X 坐标
    /// - `cy` - 中心点 Y 坐标
    /// - `width` - 宽度
    /// - `height` - 高度
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(
            cx - width / 2.0,
            cy - height / 2.0,
            cx + width / 2.0,
            cy + height / 2.0,
        )
    }

    /// 水平中点
    pub fn center_x(&self) -> f32 {
        (self.x_min + self.x_max) / 2.0
    }

    pub fn width(&self) -> f32 {
        (self.x_max - self.x_min).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y_max - self.y_min).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// 四个坐标是否均为有限值
    pub fn is_finite(&self) -> bool {
        self.x_min.is_finite()
            && self.y_min.is_finite()
            && self.x_max.is_finite()
            && self.y_max.is_finite()
    }

    /// 计算两个检测框的交并比
    ///
    /// # 参数
    ///
    /// - `other` - 另一个检测框
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let inter = BoundingBox::new(
            self.x_min.max(other.x_min),
            self.y_min.max(other.y_min),
            self.x_max.min(other.x_max),
            self.y_max.min(other.y_max),
        )
        .area();
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            return 0.0;
        }
        inter / union
    }

    /// 将检测框限制在图像范围内
    ///
    /// # 参数
    ///
    /// - `size` - 图像尺寸
    pub fn clamp_to(&self, size: &Size) -> Self {
        let (w, h) = (size.width as f32, size.height as f32);
        Self::new(
            self.x_min.clamp(0.0, w),
            self.y_min.clamp(0.0, h),
            self.x_max.clamp(0.0, w),
            self.y_max.clamp(0.0, h),
        )
    }
}
