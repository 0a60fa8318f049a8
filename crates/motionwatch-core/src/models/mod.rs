//! motionwatch 도메인 모델.
//!
//! 파이프라인 단계 사이를 오가는 데이터 구조체와 사이클 간 상태 객체를 정의한다.

pub mod event;
pub mod frame;
pub mod motion;
pub mod state;
