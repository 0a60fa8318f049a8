//! 알림/사진 동작 게이트.
//!
//! 지속성 트리거마다 검출 횟수를 올리고 알림을 항상 통과시킨다.
//! 사진은 별도 쿨다운으로 쓰로틀링한다 (알림에는 영향 없음).

use chrono::{DateTime, Duration, Utc};
use motionwatch_core::models::state::{CooldownState, PersistenceState};
use tracing::debug;

use crate::persistence::PersistenceTrigger;

/// 게이트 판단 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    /// 이 알림을 포함한 누적 검출 횟수 (사진 라벨로도 사용)
    pub total_detections: u64,
    /// 사진 저장 허용 여부
    pub photo_permitted: bool,
}

/// 동작 게이트
#[derive(Debug, Clone, Copy)]
pub struct ActionGate {
    cooldown: Duration,
}

impl ActionGate {
    /// 새 게이트 생성
    pub fn new(cooldown: std::time::Duration) -> Self {
        Self {
            cooldown: Duration::from_std(cooldown).unwrap_or(Duration::MAX),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// 쿨다운 체크
    fn is_cooling_down(&self, cooldown: &CooldownState, now: DateTime<Utc>) -> bool {
        match cooldown.last_action {
            Some(last) => now - last < self.cooldown,
            None => false,
        }
    }

    /// 알림 트리거 처리
    pub fn on_alert(
        &self,
        trigger: PersistenceTrigger,
        persistence: &mut PersistenceState,
        cooldown: &mut CooldownState,
        now: DateTime<Utc>,
    ) -> GateDecision {
        persistence.total_detections += 1;
        let total = persistence.total_detections;

        if self.is_cooling_down(cooldown, now) {
            debug!(
                "사진 쓰로틀: 검출 #{total} (연속 {}프레임)",
                trigger.consecutive_frames
            );
            return GateDecision {
                total_detections: total,
                photo_permitted: false,
            };
        }

        cooldown.last_action = Some(now);
        debug!("사진 승인: 검출 #{total}");

        GateDecision {
            total_detections: total,
            photo_permitted: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn trigger() -> PersistenceTrigger {
        PersistenceTrigger {
            consecutive_frames: 3,
        }
    }

    #[test]
    fn cooldown_gates_photo_not_alert() {
        let gate = ActionGate::new(std::time::Duration::from_secs(10));
        let mut persistence = PersistenceState::default();
        let mut cooldown = CooldownState::default();

        let first = gate.on_alert(trigger(), &mut persistence, &mut cooldown, at(0));
        let second = gate.on_alert(trigger(), &mut persistence, &mut cooldown, at(3));
        let third = gate.on_alert(trigger(), &mut persistence, &mut cooldown, at(11));

        assert!(first.photo_permitted);
        assert!(!second.photo_permitted);
        assert!(third.photo_permitted);
        assert_eq!(
            [first, second, third].map(|d| d.total_detections),
            [1, 2, 3]
        );
        assert_eq!(cooldown.last_action, Some(at(11)));
    }

    #[test]
    fn cooldown_boundary_is_inclusive() {
        let gate = ActionGate::new(std::time::Duration::from_secs(10));
        let mut persistence = PersistenceState::default();
        let mut cooldown = CooldownState::default();

        gate.on_alert(trigger(), &mut persistence, &mut cooldown, at(0));
        let exact = gate.on_alert(trigger(), &mut persistence, &mut cooldown, at(10));
        assert!(exact.photo_permitted);
    }

    #[test]
    fn suppressed_photo_does_not_reset_timer() {
        let gate = ActionGate::new(std::time::Duration::from_secs(10));
        let mut persistence = PersistenceState::default();
        let mut cooldown = CooldownState::default();

        gate.on_alert(trigger(), &mut persistence, &mut cooldown, at(0));
        gate.on_alert(trigger(), &mut persistence, &mut cooldown, at(9));
        assert_eq!(cooldown.last_action, Some(at(0)));
    }

    #[test]
    fn armed_cooldown_blocks_early_photo() {
        let gate = ActionGate::new(std::time::Duration::from_secs(10));
        let mut persistence = PersistenceState::default();
        let mut cooldown = CooldownState::armed_at(at(0));

        let early = gate.on_alert(trigger(), &mut persistence, &mut cooldown, at(4));
        assert!(!early.photo_permitted);
        assert_eq!(early.total_detections, 1);
    }

    #[test]
    fn zero_cooldown_always_permits() {
        let gate = ActionGate::new(std::time::Duration::ZERO);
        let mut persistence = PersistenceState::default();
        let mut cooldown = CooldownState::default();

        for i in 0..5 {
            let d = gate.on_alert(trigger(), &mut persistence, &mut cooldown, at(i));
            assert!(d.photo_permitted);
        }
    }
}
