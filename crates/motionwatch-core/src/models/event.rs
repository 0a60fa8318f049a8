//! 알림/사진 이벤트 모델.

use chrono::{DateTime, Utc};
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::models::motion::MotionRegion;

/// 알림 이벤트: 지속성 임계값을 넘은 사이클마다 하나씩 발생
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// 이 알림을 포함한 누적 검출 횟수
    pub total_detections: u64,
    /// 현재 연속 움직임 사이클 수
    pub consecutive_frames: u32,
    /// 사이클 번호 (1부터)
    pub cycle_index: u64,
    /// 이번 사이클에서 검출된 영역 수
    pub region_count: usize,
    /// 발생 시각
    pub timestamp: DateTime<Utc>,
}

/// 사진 저장 요청: 쿨다운을 통과한 알림에서만 발생
#[derive(Debug, Clone)]
pub struct PhotoRequest {
    /// 식별 라벨 (누적 검출 횟수)
    pub label: u64,
    /// 저장할 프레임 (리사이즈된 컬러, 영역 표시 포함 가능)
    pub frame: RgbImage,
    /// 검출된 영역
    pub regions: Vec<MotionRegion>,
    /// 요청 시각
    pub timestamp: DateTime<Utc>,
}
