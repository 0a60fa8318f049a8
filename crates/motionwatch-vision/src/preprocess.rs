//! 프레임 전처리.
//!
//! 원본 프레임 → 고정 너비 리사이즈 → 그레이스케일 → 고정 크기 커널 가우시안 블러.
//! 상태 없음, 결정적.

use fast_image_resize::{images::Image as FirImage, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use motionwatch_core::error::CoreError;
use motionwatch_core::models::frame::{Frame, PixelFormat, RawFrame};
use tracing::debug;

/// 전처리 결과: 비교용 그레이스케일 + 저장/표시용 컬러
#[derive(Debug, Clone)]
pub struct PreparedFrame {
    /// 블러 적용된 그레이스케일 프레임
    pub gray: Frame,
    /// 리사이즈된 컬러 프레임
    pub color: RgbImage,
}

/// 프레임 전처리기
#[derive(Debug, Clone)]
pub struct FramePreprocessor {
    target_width: u32,
    blur_kernel: u32,
}

impl FramePreprocessor {
    /// 새 전처리기 생성
    ///
    /// `blur_kernel`은 홀수여야 하며 1이면 블러를 생략한다.
    pub fn new(target_width: u32, blur_kernel: u32) -> Self {
        Self {
            target_width,
            blur_kernel,
        }
    }

    /// 원본 프레임 전처리
    pub fn prepare(&self, raw: &RawFrame) -> Result<PreparedFrame, CoreError> {
        raw.validate()?;

        let color = to_rgb(raw)?;
        let color = resize_to_width(&color, self.target_width)?;

        let gray = DynamicImage::ImageRgb8(color.clone()).to_luma8();
        let gray = match gaussian_kernel(self.blur_kernel) {
            Some(kernel) => imageproc::filter::separable_filter_equal(&gray, kernel.as_slice()),
            None => gray,
        };

        debug!(
            "전처리 완료: {}x{} → {}x{}",
            raw.width,
            raw.height,
            gray.width(),
            gray.height()
        );

        Ok(PreparedFrame {
            gray: Frame::new(gray),
            color,
        })
    }
}

/// 커널 크기 → 가우시안 시그마.
///
/// 시그마를 지정하지 않은 고정 커널 블러와 같은 규칙
/// (`0.3 * ((k - 1) * 0.5 - 1) + 0.8`). 커널 1 이하는 블러 없음.
pub fn kernel_sigma(kernel: u32) -> Option<f32> {
    if kernel <= 1 {
        return None;
    }
    Some(0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8)
}

/// 정규화된 1차원 가우시안 커널 (길이 = `kernel`)
pub fn gaussian_kernel(kernel: u32) -> Option<Vec<f32>> {
    let sigma = kernel_sigma(kernel)?;
    let center = (kernel as f32 - 1.0) * 0.5;
    let weights: Vec<f32> = (0..kernel)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    Some(weights.into_iter().map(|w| w / sum).collect())
}

/// 원본 레이아웃 → RGB
fn to_rgb(raw: &RawFrame) -> Result<RgbImage, CoreError> {
    let (w, h) = (raw.width, raw.height);
    let invalid = || CoreError::InvalidFrame(format!("{:?} 버퍼 변환 실패", raw.format));

    let rgb = match raw.format {
        PixelFormat::Rgb8 => RgbImage::from_raw(w, h, raw.data.clone()).ok_or_else(invalid)?,
        PixelFormat::Bgr8 => {
            let data = raw
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect();
            RgbImage::from_raw(w, h, data).ok_or_else(invalid)?
        }
        PixelFormat::Rgba8 => {
            let rgba = RgbaImage::from_raw(w, h, raw.data.clone()).ok_or_else(invalid)?;
            DynamicImage::ImageRgba8(rgba).to_rgb8()
        }
        PixelFormat::Bgra8 => {
            let data = raw
                .data
                .chunks_exact(4)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect();
            RgbImage::from_raw(w, h, data).ok_or_else(invalid)?
        }
        PixelFormat::Gray8 => {
            let gray = GrayImage::from_raw(w, h, raw.data.clone()).ok_or_else(invalid)?;
            DynamicImage::ImageLuma8(gray).to_rgb8()
        }
    };

    Ok(rgb)
}

/// 종횡비 유지 리사이즈 (목표 너비 기준)
fn resize_to_width(image: &RgbImage, target_width: u32) -> Result<RgbImage, CoreError> {
    let (src_w, src_h) = image.dimensions();

    if src_w == target_width {
        return Ok(image.clone());
    }
    if target_width == 0 {
        return Err(CoreError::Internal("목표 너비 0".to_string()));
    }

    let target_height = ((src_h as f64 * target_width as f64 / src_w as f64) as u32).max(1);

    let src_image = FirImage::from_vec_u8(src_w, src_h, image.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| CoreError::Internal(format!("소스 이미지 생성 실패: {e}")))?;

    let mut dst_image = FirImage::new(target_width, target_height, PixelType::U8x3);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));

    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| CoreError::Internal(format!("리사이즈 실패: {e}")))?;

    RgbImage::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| CoreError::Internal("결과 이미지 생성 실패".to_string()))
}
