//! 움직임 신호 추출.
//!
//! 참조/현재 프레임 차분에서 두 채널을 만들어 OR로 융합한다:
//! - 임계값 채널: 차분 이진화 + 팽창 (조각난 차이를 덩어리로 병합)
//! - 엣지 채널: 차분 맵에 대한 Canny (임계값 미만의 희미한 움직임 경계 복원)
//!
//! `imageproc::edges::canny`는 그래디언트 계산 전에 자체 가우시안 블러(σ=1.4)를
//! 적용하므로 엣지 채널은 한 번 더 흐려진 차분 맵에서 계산된다.

use image::GrayImage;
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use motionwatch_core::error::CoreError;
use motionwatch_core::models::frame::Frame;
use motionwatch_core::models::motion::MotionMap;
use tracing::debug;

/// 신호 추출 파라미터
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalParams {
    /// 차분 이진화 임계값 (초과 시 설정)
    pub diff_threshold: u8,
    /// 팽창 반복 횟수 (3x3 정사각 구조 요소)
    pub dilate_iterations: u8,
    /// Canny 하위 임계값
    pub canny_low: f32,
    /// Canny 상위 임계값
    pub canny_high: f32,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            diff_threshold: 20,
            dilate_iterations: 2,
            canny_low: 30.0,
            canny_high: 150.0,
        }
    }
}

/// 한 사이클의 신호 추출 결과
#[derive(Debug, Clone)]
pub struct MotionSignal {
    /// 픽셀 단위 절대 차분
    pub difference: GrayImage,
    /// 팽창된 임계값 채널 (A)
    pub threshold: MotionMap,
    /// 엣지 채널 (B)
    pub edges: MotionMap,
    /// 융합 맵 (A OR B)
    pub fused: MotionMap,
}

/// 움직임 신호 추출기
#[derive(Debug, Clone)]
pub struct MotionSignalExtractor {
    params: SignalParams,
}

impl MotionSignalExtractor {
    pub fn new(params: SignalParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SignalParams {
        &self.params
    }

    /// 참조 프레임과 현재 프레임에서 융합 움직임 맵 추출
    pub fn extract(&self, reference: &Frame, current: &Frame) -> Result<MotionSignal, CoreError> {
        let difference = absolute_difference(reference, current)?;

        let threshold = self.threshold_channel(&difference);
        let edges = self.edge_channel(&difference);
        let fused = threshold.union(&edges)?;

        debug!(
            "신호 추출: 임계값 {}px, 엣지 {}px, 융합 {}px",
            threshold.count(),
            edges.count(),
            fused.count()
        );

        Ok(MotionSignal {
            difference,
            threshold,
            edges,
            fused,
        })
    }

    /// 채널 A: 이진화 후 팽창
    pub fn threshold_channel(&self, difference: &GrayImage) -> MotionMap {
        // 임계값 초과 → 255
        let binary = threshold(difference, self.params.diff_threshold, ThresholdType::Binary);

        // LInf 거리 k 팽창 = 3x3 정사각 요소 k회 팽창
        let dilated = if self.params.dilate_iterations > 0 {
            imageproc::morphology::dilate(&binary, Norm::LInf, self.params.dilate_iterations)
        } else {
            binary
        };

        MotionMap::from_mask(dilated)
    }

    /// 채널 B: 차분 맵에 대한 이중 임계값 엣지 검출
    pub fn edge_channel(&self, difference: &GrayImage) -> MotionMap {
        let edges =
            imageproc::edges::canny(difference, self.params.canny_low, self.params.canny_high);
        MotionMap::from_mask(edges)
    }
}

/// 픽셀 단위 절대 차분
pub fn absolute_difference(reference: &Frame, current: &Frame) -> Result<GrayImage, CoreError> {
    if reference.dimensions() != current.dimensions() {
        return Err(CoreError::InvalidFrame(format!(
            "참조 프레임 크기 불일치: {:?} vs {:?}",
            reference.dimensions(),
            current.dimensions()
        )));
    }

    let (w, h) = current.dimensions();
    let data = reference
        .as_raw()
        .iter()
        .zip(current.as_raw())
        .map(|(&a, &b)| a.abs_diff(b))
        .collect();

    GrayImage::from_raw(w, h, data)
        .ok_or_else(|| CoreError::Internal("차분 이미지 생성 실패".to_string()))
}
