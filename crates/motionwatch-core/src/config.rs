//! 애플리케이션 설정 구조체.
//!
//! 캡처 소스, 검출 파라미터, 사진 쿨다운, 저장소, 디버그 출력 설정을 정의한다.
//! 모든 값은 시작 시 고정되며 런타임에 변경되지 않는다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 캡처 소스 설정
    #[serde(default)]
    pub capture: CaptureConfig,
    /// 움직임 검출 파라미터
    #[serde(default)]
    pub detection: DetectionConfig,
    /// 알림/사진 동작 설정
    #[serde(default)]
    pub action: ActionConfig,
    /// 사진 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 디버그 출력 설정
    #[serde(default)]
    pub debug: DebugConfig,
}

// ============================================================
// 캡처 설정
// ============================================================

/// 캡처 소스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// 프레임 이미지 디렉토리 (None이면 CLI 인자 필수)
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
    /// 첫 프레임 전 카메라 워밍업 대기 (밀리초)
    #[serde(default = "default_warmup_ms")]
    pub warmup_ms: u64,
    /// 프레임 간 간격 (밀리초, 0이면 대기 없음)
    #[serde(default)]
    pub frame_interval_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source_dir: None,
            warmup_ms: default_warmup_ms(),
            frame_interval_ms: 0,
        }
    }
}

// ============================================================
// 검출 설정
// ============================================================

/// 움직임 검출 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// 리사이즈 목표 너비 (픽셀)
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    /// 가우시안 블러 커널 크기 (홀수)
    #[serde(default = "default_blur_kernel")]
    pub blur_kernel: u32,
    /// Canny 하위 임계값
    #[serde(default = "default_canny_low")]
    pub canny_low: f32,
    /// Canny 상위 임계값
    #[serde(default = "default_canny_high")]
    pub canny_high: f32,
    /// 차분 이진화 임계값 (0-255)
    #[serde(default = "default_diff_threshold")]
    pub diff_threshold: u8,
    /// 팽창 반복 횟수
    #[serde(default = "default_dilate_iterations")]
    pub dilate_iterations: u8,
    /// 최소 영역 면적 (픽셀 수)
    #[serde(default = "default_min_region_area")]
    pub min_region_area: u32,
    /// 알림 전 연속 움직임 프레임 수
    #[serde(default = "default_persistence_frames")]
    pub persistence_frames: u32,
    /// 배경 프레임 갱신 주기 (사이클 수)
    #[serde(default = "default_background_refresh_interval")]
    pub background_refresh_interval: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            frame_width: default_frame_width(),
            blur_kernel: default_blur_kernel(),
            canny_low: default_canny_low(),
            canny_high: default_canny_high(),
            diff_threshold: default_diff_threshold(),
            dilate_iterations: default_dilate_iterations(),
            min_region_area: default_min_region_area(),
            persistence_frames: default_persistence_frames(),
            background_refresh_interval: default_background_refresh_interval(),
        }
    }
}

// ============================================================
// 동작 설정
// ============================================================

/// 알림/사진 동작 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    /// 사진 저장 간 최소 간격 (밀리초)
    #[serde(default = "default_photo_cooldown_ms")]
    pub photo_cooldown_ms: u64,
    /// 시작 시점부터 쿨다운 적용 (true면 시작 직후 쿨다운 동안 사진 없음)
    #[serde(default)]
    pub arm_cooldown_on_start: bool,
    /// 사진에 검출 영역 박스 표시
    #[serde(default = "default_true")]
    pub annotate_regions: bool,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            photo_cooldown_ms: default_photo_cooldown_ms(),
            arm_cooldown_on_start: false,
            annotate_regions: true,
        }
    }
}

// ============================================================
// 저장소 설정
// ============================================================

/// 사진 인코딩 포맷
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl PhotoFormat {
    /// 파일 확장자
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

/// 사진 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 사진 저장 디렉토리
    #[serde(default = "default_photo_dir")]
    pub photo_dir: PathBuf,
    /// 사진 포맷
    #[serde(default)]
    pub photo_format: PhotoFormat,
    /// JPEG/WebP 품질 (1-100)
    #[serde(default = "default_photo_quality")]
    pub photo_quality: u8,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            photo_dir: default_photo_dir(),
            photo_format: PhotoFormat::Jpeg,
            photo_quality: default_photo_quality(),
        }
    }
}

// ============================================================
// 디버그 설정
// ============================================================

/// 디버그 출력 설정: 중간 맵 이미지 덤프
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// 덤프 디렉토리 (None이면 비활성화)
    #[serde(default)]
    pub dump_dir: Option<PathBuf>,
    /// N 사이클마다 덤프
    #[serde(default = "default_dump_every")]
    pub dump_every: u64,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            dump_dir: None,
            dump_every: default_dump_every(),
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            capture: CaptureConfig::default(),
            detection: DetectionConfig::default(),
            action: ActionConfig::default(),
            storage: StorageConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// 워밍업 대기 시간을 Duration으로 반환
    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.capture.warmup_ms)
    }

    /// 프레임 간격을 Duration으로 반환
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.capture.frame_interval_ms)
    }

    /// 사진 쿨다운을 Duration으로 반환
    pub fn photo_cooldown(&self) -> Duration {
        Duration::from_millis(self.action.photo_cooldown_ms)
    }

    /// 설정값 유효성 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let d = &self.detection;

        if d.frame_width == 0 {
            return Err(CoreError::validation("detection.frame_width", "0보다 커야 함"));
        }
        if d.blur_kernel == 0 || d.blur_kernel % 2 == 0 {
            return Err(CoreError::validation(
                "detection.blur_kernel",
                format!("양의 홀수여야 함 (현재 {})", d.blur_kernel),
            ));
        }
        if !(d.canny_low >= 0.0 && d.canny_low <= d.canny_high) {
            return Err(CoreError::validation(
                "detection.canny_low",
                format!(
                    "0 이상이고 canny_high({}) 이하여야 함 (현재 {})",
                    d.canny_high, d.canny_low
                ),
            ));
        }
        if d.persistence_frames == 0 {
            return Err(CoreError::validation(
                "detection.persistence_frames",
                "1 이상이어야 함",
            ));
        }
        if d.background_refresh_interval == 0 {
            return Err(CoreError::validation(
                "detection.background_refresh_interval",
                "1 이상이어야 함",
            ));
        }
        if !(1..=100).contains(&self.storage.photo_quality) {
            return Err(CoreError::validation(
                "storage.photo_quality",
                format!("1-100 범위여야 함 (현재 {})", self.storage.photo_quality),
            ));
        }
        if self.debug.dump_every == 0 {
            return Err(CoreError::validation("debug.dump_every", "1 이상이어야 함"));
        }

        Ok(())
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

fn default_warmup_ms() -> u64 {
    2_000
}
fn default_frame_width() -> u32 {
    500
}
fn default_blur_kernel() -> u32 {
    11
}
fn default_canny_low() -> f32 {
    30.0
}
fn default_canny_high() -> f32 {
    150.0
}
fn default_diff_threshold() -> u8 {
    20
}
fn default_dilate_iterations() -> u8 {
    2
}
fn default_min_region_area() -> u32 {
    500
}
fn default_persistence_frames() -> u32 {
    3
}
fn default_background_refresh_interval() -> u64 {
    50
}
fn default_photo_cooldown_ms() -> u64 {
    10_000
}
fn default_photo_dir() -> PathBuf {
    PathBuf::from("captured_movement")
}
fn default_photo_quality() -> u8 {
    90
}
fn default_dump_every() -> u64 {
    1
}
