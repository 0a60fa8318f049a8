//! 사이클 단위 움직임 검출기.
//!
//! 전처리 → 신호 추출(배경 참조) → 영역 필터 → 지속성 → 동작 게이트 →
//! 배경 갱신 순서로 한 사이클을 처리한다. 사이클 간 상태는 [`DetectorState`]가
//! 소유하며 호출자가 `&mut`로 넘긴다.

use chrono::{DateTime, Utc};
use image::RgbImage;
use motionwatch_core::config::{ActionConfig, DetectionConfig};
use motionwatch_core::error::CoreError;
use motionwatch_core::models::event::{AlertEvent, PhotoRequest};
use motionwatch_core::models::frame::RawFrame;
use motionwatch_core::models::state::{CooldownState, PersistencePhase, PersistenceState};
use tracing::{debug, warn};

use crate::annotate;
use crate::background::BackgroundModel;
use crate::gate::ActionGate;
use crate::persistence::PersistenceTracker;
use crate::preprocess::FramePreprocessor;
use crate::region::{RegionFilter, RegionSet};
use crate::signal::{MotionSignal, MotionSignalExtractor, SignalParams};

/// 사이클 간 유지되는 검출 상태
#[derive(Debug, Clone, Default)]
pub struct DetectorState {
    /// 배경 모델 (첫 프레임 전에는 None)
    pub background: Option<BackgroundModel>,
    /// 지속성 상태
    pub persistence: PersistenceState,
    /// 사진 쿨다운 상태
    pub cooldown: CooldownState,
    /// 분석 완료된 사이클 수 (배경 초기화 프레임 제외)
    pub cycle_index: u64,
}

impl DetectorState {
    /// 시작 시점부터 사진 쿨다운을 적용한 상태
    pub fn armed_at(now: DateTime<Utc>) -> Self {
        Self {
            cooldown: CooldownState::armed_at(now),
            ..Self::default()
        }
    }
}

/// 분석 사이클 결과
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// 사이클 번호 (1부터)
    pub cycle_index: u64,
    /// 신호 추출 중간 결과
    pub signal: MotionSignal,
    /// 영역 필터 결과
    pub regions: RegionSet,
    /// 표시용 프레임 (영역 박스 포함 가능)
    pub display_frame: RgbImage,
    /// 처리 후 지속성 단계
    pub phase: PersistencePhase,
    /// 알림 (지속 단계인 사이클마다)
    pub alert: Option<AlertEvent>,
    /// 사진 요청 (쿨다운 통과 시)
    pub photo: Option<PhotoRequest>,
    /// 이번 사이클에 배경이 갱신되었는지
    pub background_refreshed: bool,
}

impl CycleReport {
    /// 이번 사이클 움직임 판정
    pub fn motion_present(&self) -> bool {
        self.regions.any_region_present()
    }
}

/// 사이클 처리 결과
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// 첫 프레임: 배경 초기화만 수행
    BackgroundSeeded,
    /// 해상도 변경: 배경을 새 프레임으로 교체하고 판정 생략
    BackgroundReset,
    /// 정상 분석
    Analyzed(Box<CycleReport>),
}

/// 움직임 검출기: 파이프라인 단계 묶음 (상태 없음)
#[derive(Debug, Clone)]
pub struct MotionDetector {
    preprocessor: FramePreprocessor,
    extractor: MotionSignalExtractor,
    region_filter: RegionFilter,
    tracker: PersistenceTracker,
    gate: ActionGate,
    refresh_interval: u64,
    annotate_regions: bool,
}

impl MotionDetector {
    /// 설정에서 검출기 생성
    pub fn from_config(detection: &DetectionConfig, action: &ActionConfig) -> Self {
        Self {
            preprocessor: FramePreprocessor::new(detection.frame_width, detection.blur_kernel),
            extractor: MotionSignalExtractor::new(SignalParams {
                diff_threshold: detection.diff_threshold,
                dilate_iterations: detection.dilate_iterations,
                canny_low: detection.canny_low,
                canny_high: detection.canny_high,
            }),
            region_filter: RegionFilter::new(detection.min_region_area),
            tracker: PersistenceTracker::new(detection.persistence_frames),
            gate: ActionGate::new(std::time::Duration::from_millis(action.photo_cooldown_ms)),
            refresh_interval: detection.background_refresh_interval,
            annotate_regions: action.annotate_regions,
        }
    }

    pub fn tracker(&self) -> &PersistenceTracker {
        &self.tracker
    }

    /// 한 사이클 처리.
    ///
    /// 전처리 실패(`InvalidFrame`) 시 상태를 전혀 변경하지 않고 에러를 반환한다.
    pub fn process(
        &self,
        state: &mut DetectorState,
        raw: &RawFrame,
        now: DateTime<Utc>,
    ) -> Result<CycleOutcome, CoreError> {
        let prepared = self.preprocessor.prepare(raw)?;

        let background = match state.background.as_mut() {
            Some(background) => background,
            None => {
                state.background = Some(BackgroundModel::initialize(prepared.gray));
                return Ok(CycleOutcome::BackgroundSeeded);
            }
        };

        if background.current().dimensions() != prepared.gray.dimensions() {
            warn!(
                "프레임 크기 변경 {:?} → {:?}, 배경 재설정",
                background.current().dimensions(),
                prepared.gray.dimensions()
            );
            background.reset(prepared.gray);
            return Ok(CycleOutcome::BackgroundReset);
        }

        let signal = self.extractor.extract(background.current(), &prepared.gray)?;
        let regions = self.region_filter.filter(&signal.fused);
        let motion_present = regions.any_region_present();

        state.cycle_index += 1;
        let cycle_index = state.cycle_index;

        let display_frame = if self.annotate_regions && motion_present {
            annotate::annotate_regions(&prepared.color, &regions.regions)
        } else {
            prepared.color
        };

        let mut alert = None;
        let mut photo = None;

        if let Some(trigger) = self.tracker.observe(&mut state.persistence, motion_present) {
            let decision =
                self.gate
                    .on_alert(trigger, &mut state.persistence, &mut state.cooldown, now);

            alert = Some(AlertEvent {
                total_detections: decision.total_detections,
                consecutive_frames: trigger.consecutive_frames,
                cycle_index,
                region_count: regions.regions.len(),
                timestamp: now,
            });

            if decision.photo_permitted {
                photo = Some(PhotoRequest {
                    label: decision.total_detections,
                    frame: display_frame.clone(),
                    regions: regions.regions.clone(),
                    timestamp: now,
                });
            }
        }

        let background_refreshed =
            background.maybe_refresh(&prepared.gray, cycle_index, self.refresh_interval);

        let phase = self.tracker.phase(&state.persistence);
        debug!(
            "사이클 {cycle_index}: 영역 {}개, 단계 {:?}, 알림 {}, 사진 {}",
            regions.regions.len(),
            phase,
            alert.is_some(),
            photo.is_some()
        );

        Ok(CycleOutcome::Analyzed(Box::new(CycleReport {
            cycle_index,
            signal,
            regions,
            display_frame,
            phase,
            alert,
            photo,
            background_refreshed,
        })))
    }
}
