//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 코어 파이프라인은 캡처/표시/알림/사진 저장을 이 trait들로만 다루며,
//! 구현은 `motionwatch-vision`, `motionwatch-storage`, `motionwatch-app`에 있다.
//!
//! 사이클 드라이버가 단일 스레드 동기 루프이므로 모든 포트는 동기 trait이다.

pub mod capture;
pub mod clock;
pub mod sink;
