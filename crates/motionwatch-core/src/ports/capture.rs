//! 캡처 소스 포트.
//!
//! 구현: `motionwatch-vision::capture` (이미지 시퀀스), 테스트용 스크립트 소스

use crate::error::CoreError;
use crate::models::frame::RawFrame;

/// 프레임 캡처 소스
///
/// 드라이버는 사이클마다 정확히 한 번 호출한다. 다음 프레임이 준비될 때까지
/// 블로킹해도 된다 (파이프라인이 카메라보다 앞서 달리지 않도록).
pub trait CaptureSource: Send {
    /// 다음 원본 프레임.
    ///
    /// - `Ok(Some(frame))`: 정상 프레임
    /// - `Ok(None)`: 스트림 종료, 루프를 정상 종료
    /// - `Err(CoreError::InvalidFrame)`: 이번 사이클만 스킵
    /// - `Err(CoreError::CaptureUnavailable)`: 치명적, 루프 종료
    fn next_raw_frame(&mut self) -> Result<Option<RawFrame>, CoreError>;

    /// 캡처 장치 해제. 루프 종료 시 한 번 호출된다.
    fn release(&mut self) {}
}
