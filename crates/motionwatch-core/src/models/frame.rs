//! 프레임 모델.
//!
//! 캡처 소스가 전달하는 원본 프레임과 전처리된 그레이스케일 프레임을 정의.

use chrono::{DateTime, Utc};
use image::{GrayImage, RgbImage};

use crate::error::CoreError;

/// 원본 픽셀 레이아웃
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 단일 채널 8비트
    Gray8,
    /// RGB 8비트
    Rgb8,
    /// BGR 8비트 (카메라 드라이버 기본 순서)
    Bgr8,
    /// RGBA 8비트
    Rgba8,
    /// BGRA 8비트
    Bgra8,
}

impl PixelFormat {
    /// 픽셀당 채널 수
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 | Self::Bgra8 => 4,
        }
    }
}

/// 캡처 소스가 전달하는 원본 프레임
///
/// 구조 검증은 [`RawFrame::validate`]에서 수행한다. 생성 자체는 검증하지 않으므로
/// 잘못된 프레임도 파이프라인까지 전달될 수 있다.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// 너비 (픽셀)
    pub width: u32,
    /// 높이 (픽셀)
    pub height: u32,
    /// 픽셀 레이아웃
    pub format: PixelFormat,
    /// 행 우선 픽셀 바이트
    pub data: Vec<u8>,
    /// 캡처 시각
    pub captured_at: DateTime<Utc>,
}

impl RawFrame {
    /// 새 원본 프레임 생성 (캡처 시각 = 현재)
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            data,
            captured_at: Utc::now(),
        }
    }

    /// RGB 이미지에서 생성
    pub fn from_rgb(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(width, height, PixelFormat::Rgb8, image.into_raw())
    }

    /// 그레이스케일 이미지에서 생성
    pub fn from_gray(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(width, height, PixelFormat::Gray8, image.into_raw())
    }

    /// 구조 검증: 크기 0, 바이트 길이 불일치 시 `InvalidFrame`
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::InvalidFrame(format!(
                "빈 프레임: {}x{}",
                self.width, self.height
            )));
        }

        let expected = self.width as usize * self.height as usize * self.format.channels();
        if self.data.len() != expected {
            return Err(CoreError::InvalidFrame(format!(
                "{:?} {}x{} 프레임은 {}바이트여야 하지만 {}바이트",
                self.format,
                self.width,
                self.height,
                expected,
                self.data.len()
            )));
        }

        Ok(())
    }
}

/// 전처리된 그레이스케일 프레임
///
/// 고정 너비로 리사이즈되고 블러가 적용된 단일 채널 강도 격자.
/// 생성 후 변경되지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: GrayImage,
}

impl Frame {
    /// 그레이스케일 이미지를 프레임으로 감싸기
    pub fn new(pixels: GrayImage) -> Self {
        Self { pixels }
    }

    /// 단색 프레임 생성
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self::new(GrayImage::from_pixel(width, height, image::Luma([value])))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// (너비, 높이)
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// 내부 이미지 참조
    pub fn as_image(&self) -> &GrayImage {
        &self.pixels
    }

    /// 행 우선 픽셀 바이트
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}
