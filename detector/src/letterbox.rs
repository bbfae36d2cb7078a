use common::{BoundingBox, Size};
use image::{
    DynamicImage, GenericImageView,
    imageops::{self, FilterType},
};
use ndarray::{Array, Array4};

/// 填充色
const PAD_VALUE: f32 = 114.0 / 255.0;

/// 等比缩放并居中填充的变换参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub source: Size,
}

impl Letterbox {
    /// 计算图像缩放到 `target_size` 正方形时的变换参数
    ///
    /// # 参数
    ///
    /// * `source` - 原图尺寸
    /// * `target_size` - 模型输入边长
    pub fn new(source: Size, target_size: u32) -> Self {
        if source.width == 0 || source.height == 0 {
            return Self {
                scale: 1.0,
                pad_x: 0.0,
                pad_y: 0.0,
                source,
            };
        }

        let scale = (target_size as f32 / source.width as f32)
            .min(target_size as f32 / source.height as f32);
        let (new_w, new_h) = Self::scaled(source, scale);

        Self {
            scale,
            pad_x: ((target_size - new_w) / 2) as f32,
            pad_y: ((target_size - new_h) / 2) as f32,
            source,
        }
    }

    fn scaled(source: Size, scale: f32) -> (u32, u32) {
        let new_w = ((source.width as f32 * scale).round() as u32).max(1);
        let new_h = ((source.height as f32 * scale).round() as u32).max(1);
        (new_w, new_h)
    }

    /// 将模型输入空间中的检测框映射回原图, 并限制在原图范围内
    ///
    /// # 参数
    ///
    /// * `bbox` - 模型输入空间中的检测框
    pub fn to_source(&self, bbox: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            (bbox.x_min - self.pad_x) / self.scale,
            (bbox.y_min - self.pad_y) / self.scale,
            (bbox.x_max - self.pad_x) / self.scale,
            (bbox.y_max - self.pad_y) / self.scale,
        )
        .clamp_to(&self.source)
    }

    /// 将图像转换为 NCHW 张量, 像素值归一化到 [0, 1]
    ///
    /// # 参数
    ///
    /// * `image` - 输入图像
    /// * `target_size` - 模型输入边长
    pub fn apply(image: &DynamicImage, target_size: u32) -> (Array4<f32>, Self) {
        let (width, height) = image.dimensions();
        let letterbox = Self::new(Size { width, height }, target_size);
        let size = target_size as usize;
        let mut input = Array::from_elem((1, 3, size, size), PAD_VALUE);

        if width == 0 || height == 0 {
            return (input, letterbox);
        }

        let (new_w, new_h) = Self::scaled(letterbox.source, letterbox.scale);
        let resized = imageops::resize(&image.to_rgb8(), new_w, new_h, FilterType::Triangle);
        let (offset_x, offset_y) = (letterbox.pad_x as usize, letterbox.pad_y as usize);

        for (x, y, pixel) in resized.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            let (x, y) = (x as usize + offset_x, y as usize + offset_y);

            input[[0, 0, y, x]] = r as f32 / 255.0;
            input[[0, 1, y, x]] = g as f32 / 255.0;
            input[[0, 2, y, x]] = b as f32 / 255.0;
        }
        (input, letterbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_letterbox_wide_image() {
        let letterbox = Letterbox::new(
            Size {
                width: 1280,
                height: 640,
            },
            640,
        );
        assert_eq!(letterbox.scale, 0.5);
        assert_eq!(letterbox.pad_x, 0.0);
        assert_eq!(letterbox.pad_y, 160.0);
    }

    #[test]
    fn test_to_source() {
        let letterbox = Letterbox::new(
            Size {
                width: 1280,
                height: 640,
            },
            640,
        );
        let bbox = BoundingBox::new(100.0, 200.0, 150.0, 260.0);
        assert_eq!(
            letterbox.to_source(&bbox),
            BoundingBox::new(200.0, 80.0, 300.0, 200.0)
        );
    }

    #[test]
    fn test_to_source_clamps() {
        let letterbox = Letterbox::new(
            Size {
                width: 640,
                height: 320,
            },
            640,
        );
        let bbox = BoundingBox::new(-10.0, 100.0, 700.0, 600.0);
        let mapped = letterbox.to_source(&bbox);
        assert_eq!(mapped, BoundingBox::new(0.0, 0.0, 640.0, 320.0));
    }

    #[test]
    fn test_apply_tensor() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 2, Rgb([255, 0, 0])));
        let (tensor, letterbox) = Letterbox::apply(&image, 8);

        assert_eq!(tensor.shape(), &[1, 3, 8, 8]);
        assert_eq!(letterbox.pad_y, 2.0);

        // 填充区域
        assert_eq!(tensor[[0, 0, 0, 0]], PAD_VALUE);
        // 图像区域
        assert_eq!(tensor[[0, 0, 4, 4]], 1.0);
        assert_eq!(tensor[[0, 1, 4, 4]], 0.0);
        assert_eq!(tensor[[0, 2, 4, 4]], 0.0);
    }
}
