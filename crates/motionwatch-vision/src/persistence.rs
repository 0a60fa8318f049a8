//! 움직임 지속성 추적 (디바운스).
//!
//! 사이클별 움직임 판정을 받아, 연속 움직임이 임계값에 도달한 사이클마다
//! 알림 트리거를 낸다. 움직임이 없는 사이클은 카운터를 즉시 0으로 되돌린다.

use motionwatch_core::models::state::{PersistencePhase, PersistenceState};
use tracing::debug;

/// 지속성 임계값 도달 트리거
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceTrigger {
    /// 현재 연속 움직임 사이클 수 (≥ 임계값)
    pub consecutive_frames: u32,
}

/// 지속성 추적기
///
/// 상태는 [`PersistenceState`]로 외부에서 소유한다.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceTracker {
    threshold: u32,
}

impl PersistenceTracker {
    /// `threshold`: 알림까지 필요한 연속 움직임 사이클 수 (최소 1로 보정)
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// 이번 사이클 움직임 여부 반영.
    ///
    /// 지속 단계의 모든 사이클에서 `Some`을 반환한다.
    pub fn observe(
        &self,
        state: &mut PersistenceState,
        motion_present: bool,
    ) -> Option<PersistenceTrigger> {
        if !motion_present {
            if state.consecutive_motion_frames > 0 {
                debug!(
                    "움직임 중단: 연속 {}프레임 후 초기화",
                    state.consecutive_motion_frames
                );
            }
            state.consecutive_motion_frames = 0;
            return None;
        }

        state.consecutive_motion_frames = state.consecutive_motion_frames.saturating_add(1);

        if state.consecutive_motion_frames >= self.threshold {
            Some(PersistenceTrigger {
                consecutive_frames: state.consecutive_motion_frames,
            })
        } else {
            debug!(
                "움직임 누적: {}/{}",
                state.consecutive_motion_frames, self.threshold
            );
            None
        }
    }

    /// 현재 단계
    pub fn phase(&self, state: &PersistenceState) -> PersistencePhase {
        state.phase(self.threshold)
    }
}
