//! 움직임 맵 / 영역 모델.

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 이진 맵에서 "설정됨"을 나타내는 픽셀 값
pub const MASK_ON: u8 = 255;

/// 픽셀 단위 이진 움직임 맵
///
/// 내부적으로 0/255 그레이스케일 이미지로 보관한다. 한 사이클 안에서만 사용된다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionMap {
    mask: GrayImage,
}

impl MotionMap {
    /// 0이 아닌 픽셀을 모두 설정된 것으로 간주하여 맵 생성
    pub fn from_mask(mut mask: GrayImage) -> Self {
        for p in mask.iter_mut() {
            if *p != 0 {
                *p = MASK_ON;
            }
        }
        Self { mask }
    }

    /// 빈 맵
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            mask: GrayImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    pub fn height(&self) -> u32 {
        self.mask.height()
    }

    /// (x, y) 픽셀 설정 여부
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        self.mask.get_pixel(x, y)[0] != 0
    }

    /// (x, y) 픽셀 설정
    pub fn set(&mut self, x: u32, y: u32) {
        self.mask.put_pixel(x, y, Luma([MASK_ON]));
    }

    /// 설정된 픽셀 수
    pub fn count(&self) -> usize {
        self.mask.as_raw().iter().filter(|&&p| p != 0).count()
    }

    /// 설정된 픽셀이 하나라도 있는지
    pub fn any(&self) -> bool {
        self.mask.as_raw().iter().any(|&p| p != 0)
    }

    /// 픽셀 단위 OR
    pub fn union(&self, other: &MotionMap) -> Result<MotionMap, CoreError> {
        if self.mask.dimensions() != other.mask.dimensions() {
            return Err(CoreError::InvalidFrame(format!(
                "맵 크기 불일치: {:?} vs {:?}",
                self.mask.dimensions(),
                other.mask.dimensions()
            )));
        }

        let data = self
            .mask
            .as_raw()
            .iter()
            .zip(other.mask.as_raw())
            .map(|(&a, &b)| if a != 0 || b != 0 { MASK_ON } else { 0 })
            .collect();

        GrayImage::from_raw(self.width(), self.height(), data)
            .map(|mask| MotionMap { mask })
            .ok_or_else(|| CoreError::Internal("OR 결과 맵 생성 실패".to_string()))
    }

    /// `other`의 모든 설정 픽셀이 이 맵에도 설정되어 있는지
    pub fn contains(&self, other: &MotionMap) -> bool {
        self.mask.dimensions() == other.mask.dimensions()
            && self
                .mask
                .as_raw()
                .iter()
                .zip(other.mask.as_raw())
                .all(|(&a, &b)| b == 0 || a != 0)
    }

    /// 내부 0/255 이미지 참조
    pub fn as_image(&self) -> &GrayImage {
        &self.mask
    }
}

/// 축 정렬 바운딩 박스
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// 움직임 영역: 움직임 맵의 연결 요소 하나
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionRegion {
    /// 바운딩 박스
    pub bounds: Rect,
    /// 면적 (연결 요소의 픽셀 수)
    pub area: u32,
}
