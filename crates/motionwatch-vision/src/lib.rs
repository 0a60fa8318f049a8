//! # motionwatch-vision
//!
//! 움직임 검출 파이프라인 크레이트.
//! 프레임 전처리, 배경 모델, 차분/엣지 신호 융합, 연결 영역 필터,
//! 지속성 디바운스, 사진 쿨다운 게이트, 그리고 이를 묶는 사이클 드라이버를 담당한다.

pub mod annotate;
pub mod background;
pub mod capture;
pub mod detector;
pub mod driver;
pub mod encoder;
pub mod gate;
pub mod persistence;
pub mod preprocess;
pub mod region;
pub mod signal;
