//! # motionwatch-app
//!
//! motionwatch 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, 라이프사이클 관리, 사이클 드라이버 실행.

mod alert;
mod lifecycle;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use motionwatch_core::config::AppConfig;
use motionwatch_core::config_manager::ConfigManager;
use motionwatch_core::error::CoreError;
use motionwatch_core::ports::clock::{Clock, SystemClock};
use motionwatch_storage::debug_dump::DebugDumpSink;
use motionwatch_storage::photo_storage::PhotoFileStorage;
use motionwatch_vision::capture::ImageSequenceSource;
use motionwatch_vision::detector::{DetectorState, MotionDetector};
use motionwatch_vision::driver::{CycleDriver, DriverConfig, StopReason};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::alert::LogAlertSink;
use crate::lifecycle::LifecycleManager;

/// 움직임 감지 파이프라인
///
/// 프레임 시퀀스에서 지속적인 움직임을 검출해 알림을 내고 사진을 저장한다.
#[derive(Parser, Debug)]
#[command(name = "motionwatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 프레임 이미지 디렉토리
    #[arg(long, short = 's')]
    source: Option<PathBuf>,

    /// 사진 저장 디렉토리
    #[arg(long)]
    photo_dir: Option<PathBuf>,

    /// 디버그 맵 덤프 디렉토리
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 프레임 간 간격 (밀리초)
    #[arg(long)]
    frame_interval_ms: Option<u64>,

    /// 워밍업 대기 (밀리초)
    #[arg(long)]
    warmup_ms: Option<u64>,

    /// 처리할 최대 프레임 수
    #[arg(long)]
    max_frames: Option<u64>,
}

/// CLI 인자로 설정 덮어쓰기
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(source) = &args.source {
        config.capture.source_dir = Some(source.clone());
    }
    if let Some(dir) = &args.photo_dir {
        config.storage.photo_dir = dir.clone();
    }
    if let Some(dir) = &args.debug_dir {
        config.debug.dump_dir = Some(dir.clone());
    }
    if let Some(ms) = args.frame_interval_ms {
        config.capture.frame_interval_ms = ms;
    }
    if let Some(ms) = args.warmup_ms {
        config.capture.warmup_ms = ms;
    }
}

/// 설정 로드: 명시 경로는 실패 시 에러, 기본 경로는 실패 시 기본값
fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            let manager = ConfigManager::with_path(path.clone())
                .with_context(|| format!("설정 로드 실패: {}", path.display()))?;
            info!("설정 파일: {}", manager.config_path().display());
            Ok(manager.get())
        }
        None => match ConfigManager::new() {
            Ok(manager) => {
                info!("설정 파일: {}", manager.config_path().display());
                Ok(manager.get())
            }
            Err(e) => {
                warn!("설정 관리자 초기화 실패, 기본 설정 사용: {e}");
                Ok(AppConfig::default_config())
            }
        },
    }
}

/// 캡처 소스 열기
fn open_capture(config: &AppConfig) -> Result<ImageSequenceSource, CoreError> {
    let dir = config.capture.source_dir.as_ref().ok_or_else(|| {
        CoreError::CaptureUnavailable(
            "프레임 소스가 지정되지 않음 (--source 또는 capture.source_dir)".to_string(),
        )
    })?;
    ImageSequenceSource::open(dir, config.frame_interval())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "motionwatch={},motionwatch_app={},motionwatch_core={},motionwatch_vision={},motionwatch_storage={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("motionwatch 시작");

    let mut config = load_config(args.config.as_ref())?;
    apply_overrides(&mut config, &args);
    config.validate().context("설정 검증 실패")?;

    let capture = match open_capture(&config) {
        Ok(capture) => capture,
        Err(e) => {
            error!("캡처 장치를 열 수 없음: {e}");
            return Ok(());
        }
    };

    let photo_sink = PhotoFileStorage::from_config(&config.storage)?;
    let display_sink = DebugDumpSink::from_config(&config.debug)?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let detector = MotionDetector::from_config(&config.detection, &config.action);

    let lifecycle = LifecycleManager::new();

    if !config.warmup().is_zero() {
        info!("카메라 워밍업 {}ms", config.capture.warmup_ms);
        tokio::select! {
            _ = tokio::time::sleep(config.warmup()) => {}
            signal = lifecycle.wait_for_signal() => {
                signal.context("시그널 핸들러 등록 실패")?;
                info!("워밍업 중 종료");
                return Ok(());
            }
        }
    }

    let state = if config.action.arm_cooldown_on_start {
        DetectorState::armed_at(clock.now())
    } else {
        DetectorState::default()
    };

    let mut driver = CycleDriver::new(
        DriverConfig {
            max_frames: args.max_frames,
        },
        detector,
        state,
        Box::new(capture),
        Box::new(LogAlertSink::new()),
        Box::new(photo_sink),
        clock,
        lifecycle.subscribe(),
    );
    if let Some(sink) = display_sink {
        driver = driver.with_display(Box::new(sink));
    }

    info!("움직임 감시 실행 중 (Ctrl+C로 종료)");

    let mut handle = tokio::task::spawn_blocking(move || driver.run());

    let summary = tokio::select! {
        joined = &mut handle => joined.context("사이클 드라이버 비정상 종료")?,
        signal = lifecycle.wait_for_signal() => {
            if let Err(e) = signal {
                error!("시그널 핸들러 등록 실패: {e}");
            }
            lifecycle.shutdown();
            handle.await.context("사이클 드라이버 비정상 종료")?
        }
    };

    match &summary.stop_reason {
        StopReason::CaptureUnavailable(reason) => {
            error!("캡처 장치 연결 끊김: {reason}");
        }
        reason => info!("종료 사유: {reason}"),
    }
    info!(
        "실행 요약: 프레임 {}, 사이클 {}, 스킵 {}, 알림 {}, 누적 검출 {}, 사진 {}, 싱크 실패 {}",
        summary.frames_read,
        summary.cycles,
        summary.skipped_frames,
        summary.alerts,
        summary.total_detections,
        summary.photos_saved,
        summary.sink_failures
    );

    info!("motionwatch 종료");
    Ok(())
}
