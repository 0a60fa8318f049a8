//! 로그 알림 싱크.
//!
//! 알림을 콘솔 로그로 내보낸다.

use motionwatch_core::error::CoreError;
use motionwatch_core::models::event::AlertEvent;
use motionwatch_core::ports::sink::AlertSink;
use tracing::info;

/// 로그 기반 알림 싱크
#[derive(Debug, Default)]
pub struct LogAlertSink {
    sent: u64,
}

impl LogAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 전송한 알림 수
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl AlertSink for LogAlertSink {
    fn send_alert(&mut self, event: &AlertEvent) -> Result<(), CoreError> {
        self.sent += 1;
        info!(
            total_detections = event.total_detections,
            consecutive_frames = event.consecutive_frames,
            cycle = event.cycle_index,
            regions = event.region_count,
            "움직임 감지, 알림 전송 (누적 {}회)",
            event.total_detections
        );
        Ok(())
    }
}
