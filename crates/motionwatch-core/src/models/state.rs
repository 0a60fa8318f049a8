//! 사이클 간 유지되는 상태 객체.
//!
//! 파이프라인 단계들은 상태를 직접 보유하지 않고, 매 사이클 이 구조체들을
//! `&mut`로 전달받아 갱신한다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 지속성 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersistencePhase {
    /// 연속 움직임 없음
    Idle,
    /// 연속 움직임 누적 중 (임계값 미만)
    Accumulating,
    /// 임계값 이상: 매 사이클 알림
    Persistent,
}

/// 지속성 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceState {
    /// 연속 움직임 사이클 수
    pub consecutive_motion_frames: u32,
    /// 누적 검출(알림) 횟수
    pub total_detections: u64,
}

impl PersistenceState {
    /// 임계값 기준 현재 단계
    pub fn phase(&self, threshold: u32) -> PersistencePhase {
        match self.consecutive_motion_frames {
            0 => PersistencePhase::Idle,
            n if n < threshold => PersistencePhase::Accumulating,
            _ => PersistencePhase::Persistent,
        }
    }
}

/// 사진 쿨다운 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooldownState {
    /// 마지막 사진 저장 시각 (None이면 아직 없음)
    pub last_action: Option<DateTime<Utc>>,
}

impl CooldownState {
    /// 특정 시각부터 쿨다운을 적용한 상태
    pub fn armed_at(now: DateTime<Utc>) -> Self {
        Self {
            last_action: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_boundaries() {
        let mut state = PersistenceState::default();
        assert_eq!(state.phase(3), PersistencePhase::Idle);
        state.consecutive_motion_frames = 2;
        assert_eq!(state.phase(3), PersistencePhase::Accumulating);
        state.consecutive_motion_frames = 3;
        assert_eq!(state.phase(3), PersistencePhase::Persistent);
        state.consecutive_motion_frames = 40;
        assert_eq!(state.phase(3), PersistencePhase::Persistent);
    }

    #[test]
    fn threshold_one_skips_accumulating() {
        let state = PersistenceState {
            consecutive_motion_frames: 1,
            total_detections: 0,
        };
        assert_eq!(state.phase(1), PersistencePhase::Persistent);
    }
}
