//! 사이클 드라이버.
//!
//! 캡처 → 검출 → 싱크 디스패치를 엄격히 순차 실행하는 단일 스레드 루프.
//! 종료 플래그는 사이클 경계에서만 확인하며, 루프가 어떤 이유로 끝나든
//! 캡처 소스를 해제한다.

use std::fmt;
use std::sync::Arc;

use motionwatch_core::error::CoreError;
use motionwatch_core::ports::capture::CaptureSource;
use motionwatch_core::ports::clock::Clock;
use motionwatch_core::ports::sink::{AlertSink, DebugView, DisplaySink, PhotoSink};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::detector::{CycleOutcome, CycleReport, DetectorState, MotionDetector};

/// 드라이버 설정
#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    /// 읽을 최대 프레임 수 (None = 무제한)
    pub max_frames: Option<u64>,
}

/// 루프 종료 사유
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// 캡처 소스 스트림 종료
    EndOfStream,
    /// 외부 종료 신호
    Shutdown,
    /// 프레임 수 제한 도달
    FrameLimit,
    /// 캡처 장치 사용 불가 (치명적)
    CaptureUnavailable(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfStream => write!(f, "스트림 종료"),
            Self::Shutdown => write!(f, "종료 신호"),
            Self::FrameLimit => write!(f, "프레임 제한"),
            Self::CaptureUnavailable(reason) => write!(f, "캡처 불가: {reason}"),
        }
    }
}

/// 실행 요약
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// 캡처 소스에서 받은 프레임 수 (스킵 포함)
    pub frames_read: u64,
    /// 분석 완료 사이클 수
    pub cycles: u64,
    /// 스킵된 프레임 수
    pub skipped_frames: u64,
    /// 발생한 알림 수
    pub alerts: u64,
    /// 저장된 사진 수
    pub photos_saved: u64,
    /// 싱크 실패 수 (알림/사진/표시)
    pub sink_failures: u64,
    /// 누적 검출 횟수
    pub total_detections: u64,
    /// 종료 사유
    pub stop_reason: StopReason,
}

#[derive(Debug, Default)]
struct Counters {
    frames_read: u64,
    skipped_frames: u64,
    alerts: u64,
    photos_saved: u64,
    sink_failures: u64,
}

/// 사이클 드라이버
pub struct CycleDriver {
    config: DriverConfig,
    detector: MotionDetector,
    state: DetectorState,
    capture: Box<dyn CaptureSource>,
    alert_sink: Box<dyn AlertSink>,
    photo_sink: Box<dyn PhotoSink>,
    display_sink: Option<Box<dyn DisplaySink>>,
    clock: Arc<dyn Clock>,
    shutdown_rx: watch::Receiver<bool>,
}

impl CycleDriver {
    /// 새 드라이버 생성
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: DriverConfig,
        detector: MotionDetector,
        state: DetectorState,
        capture: Box<dyn CaptureSource>,
        alert_sink: Box<dyn AlertSink>,
        photo_sink: Box<dyn PhotoSink>,
        clock: Arc<dyn Clock>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            detector,
            state,
            capture,
            alert_sink,
            photo_sink,
            display_sink: None,
            clock,
            shutdown_rx,
        }
    }

    /// 디버그 표시 싱크 설정
    pub fn with_display(mut self, sink: Box<dyn DisplaySink>) -> Self {
        self.display_sink = Some(sink);
        self
    }

    /// 현재 검출 상태
    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    /// 종료 조건까지 루프 실행
    pub fn run(&mut self) -> RunSummary {
        info!(
            "사이클 드라이버 시작 (최대 프레임: {:?})",
            self.config.max_frames
        );

        let mut counters = Counters::default();
        let stop_reason = self.run_loop(&mut counters);

        self.capture.release();

        let summary = RunSummary {
            frames_read: counters.frames_read,
            cycles: self.state.cycle_index,
            skipped_frames: counters.skipped_frames,
            alerts: counters.alerts,
            photos_saved: counters.photos_saved,
            sink_failures: counters.sink_failures,
            total_detections: self.state.persistence.total_detections,
            stop_reason,
        };

        info!(
            "사이클 드라이버 종료 ({}): 사이클 {}, 스킵 {}, 알림 {}, 사진 {}",
            summary.stop_reason,
            summary.cycles,
            summary.skipped_frames,
            summary.alerts,
            summary.photos_saved
        );

        summary
    }

    fn run_loop(&mut self, counters: &mut Counters) -> StopReason {
        loop {
            if *self.shutdown_rx.borrow() {
                info!("종료 신호 감지: 루프 종료");
                return StopReason::Shutdown;
            }

            if let Some(max) = self.config.max_frames {
                if counters.frames_read >= max {
                    info!("프레임 제한 도달: {max}");
                    return StopReason::FrameLimit;
                }
            }

            let raw = match self.capture.next_raw_frame() {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    info!("캡처 스트림 종료");
                    return StopReason::EndOfStream;
                }
                Err(CoreError::CaptureUnavailable(reason)) => {
                    error!("캡처 장치 사용 불가: {reason}");
                    return StopReason::CaptureUnavailable(reason);
                }
                Err(e) => {
                    counters.frames_read += 1;
                    counters.skipped_frames += 1;
                    warn!("프레임 스킵 (캡처): {e}");
                    continue;
                }
            };
            counters.frames_read += 1;

            let now = self.clock.now();
            match self.detector.process(&mut self.state, &raw, now) {
                Ok(CycleOutcome::BackgroundSeeded) => {
                    info!("배경 초기화 완료 ({}x{})", raw.width, raw.height);
                }
                Ok(CycleOutcome::BackgroundReset) => {
                    counters.skipped_frames += 1;
                }
                Ok(CycleOutcome::Analyzed(report)) => {
                    self.dispatch(&report, counters);
                }
                Err(e) => {
                    counters.skipped_frames += 1;
                    warn!("프레임 스킵 (처리): {e}");
                }
            }
        }
    }

    /// 싱크 디스패치: 실패는 기록만 하고 상태에 반영하지 않는다
    fn dispatch(&mut self, report: &CycleReport, counters: &mut Counters) {
        if let Some(display) = self.display_sink.as_mut() {
            let view = DebugView {
                cycle_index: report.cycle_index,
                frame: &report.display_frame,
                threshold: &report.signal.threshold,
                edges: &report.signal.edges,
                fused: &report.signal.fused,
                regions: &report.regions.regions,
            };
            if let Err(e) = display.show(view) {
                counters.sink_failures += 1;
                warn!("디버그 표시 실패: {e}");
            }
        }

        if let Some(alert) = &report.alert {
            counters.alerts += 1;
            if let Err(e) = self.alert_sink.send_alert(alert) {
                counters.sink_failures += 1;
                warn!("알림 전송 실패: {e}");
            }
        }

        if let Some(photo) = &report.photo {
            match self.photo_sink.save_photo(photo) {
                Ok(()) => {
                    counters.photos_saved += 1;
                    debug!("사진 저장: 라벨 {}", photo.label);
                }
                Err(e) => {
                    counters.sink_failures += 1;
                    warn!("사진 저장 실패: {e}");
                }
            }
        }
    }
}
