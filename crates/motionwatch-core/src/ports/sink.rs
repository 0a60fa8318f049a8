//! 출력 싱크 포트 (알림, 사진, 디버그 표시).
//!
//! 구현: `motionwatch-storage` (사진 파일, 디버그 덤프), `motionwatch-app` (로그 알림)

use image::RgbImage;

use crate::error::CoreError;
use crate::models::event::{AlertEvent, PhotoRequest};
use crate::models::motion::{MotionMap, MotionRegion};

/// 알림 싱크: 반환값은 로그 외에 사용되지 않는다
pub trait AlertSink: Send {
    fn send_alert(&mut self, event: &AlertEvent) -> Result<(), CoreError>;
}

/// 사진 싱크: 실패해도 파이프라인 상태에 영향 없음
pub trait PhotoSink: Send {
    fn save_photo(&mut self, request: &PhotoRequest) -> Result<(), CoreError>;
}

/// 디버그 표시용 사이클 스냅샷
#[derive(Debug, Clone, Copy)]
pub struct DebugView<'a> {
    /// 사이클 번호
    pub cycle_index: u64,
    /// 표시용 컬러 프레임 (영역 박스 포함)
    pub frame: &'a RgbImage,
    /// 팽창된 임계값 채널
    pub threshold: &'a MotionMap,
    /// 엣지 채널
    pub edges: &'a MotionMap,
    /// 융합 맵
    pub fused: &'a MotionMap,
    /// 검출 영역
    pub regions: &'a [MotionRegion],
}

/// 디버그 표시 싱크 (선택)
///
/// 검출 결과에 영향을 주지 않으며, 드라이버는 여기서 아무것도 읽지 않는다.
pub trait DisplaySink: Send {
    fn show(&mut self, view: DebugView<'_>) -> Result<(), CoreError>;
}
