//! 배경 참조 프레임.
//!
//! 첫 프레임으로 초기화되고, 일정 사이클마다 현재 프레임으로 통째로 교체된다.
//! 교체는 움직임 여부와 무관하다. 움직임 도중 교체되면 움직이는 대상이
//! 배경에 포함되어 한동안 검출되지 않을 수 있다.

use motionwatch_core::models::frame::Frame;
use tracing::debug;

/// 배경 모델: 참조 프레임 하나를 소유
#[derive(Debug, Clone)]
pub struct BackgroundModel {
    reference: Frame,
    /// 초기화 이후 교체 횟수
    refreshes: u64,
}

impl BackgroundModel {
    /// 첫 프레임으로 초기화
    pub fn initialize(frame: Frame) -> Self {
        debug!("배경 초기화: {}x{}", frame.width(), frame.height());
        Self {
            reference: frame,
            refreshes: 0,
        }
    }

    /// 현재 참조 프레임
    pub fn current(&self) -> &Frame {
        &self.reference
    }

    /// `cycle_index`가 `interval`의 배수이면 참조 프레임 교체.
    ///
    /// 교체했으면 true. `interval`이 0이면 교체하지 않는다.
    pub fn maybe_refresh(&mut self, frame: &Frame, cycle_index: u64, interval: u64) -> bool {
        if interval == 0 || cycle_index % interval != 0 {
            return false;
        }

        self.reference = frame.clone();
        self.refreshes += 1;
        debug!("배경 갱신: 사이클 {cycle_index} (누적 {}회)", self.refreshes);
        true
    }

    /// 초기화 없이 강제 교체 (해상도 변경 등)
    pub fn reset(&mut self, frame: Frame) {
        self.reference = frame;
        self.refreshes += 1;
    }

    /// 교체 횟수
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}
