//! 스토리지 통합 테스트.
//!
//! 디스크 프레임 시퀀스 → 드라이버 → 사진 파일 / 디버그 덤프 전체 흐름.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use image::{Rgb, RgbImage};
use motionwatch_core::config::{AppConfig, PhotoFormat};
use motionwatch_core::error::CoreError;
use motionwatch_core::models::event::AlertEvent;
use motionwatch_core::ports::clock::ManualClock;
use motionwatch_core::ports::sink::AlertSink;
use motionwatch_storage::debug_dump::DebugDumpSink;
use motionwatch_storage::photo_storage::PhotoFileStorage;
use motionwatch_vision::capture::ImageSequenceSource;
use motionwatch_vision::detector::{DetectorState, MotionDetector};
use motionwatch_vision::driver::{CycleDriver, DriverConfig, StopReason};
use tokio::sync::watch;

struct NullAlerts;

impl AlertSink for NullAlerts {
    fn send_alert(&mut self, _event: &AlertEvent) -> Result<(), CoreError> {
        Ok(())
    }
}

/// 프레임 시퀀스 작성: 배경 1장 + 물체 `moving`장
fn write_sequence(dir: &Path, moving: u32) {
    std::fs::create_dir_all(dir).unwrap();
    RgbImage::from_pixel(320, 240, Rgb([50, 50, 50]))
        .save(dir.join("frame_0000.png"))
        .unwrap();
    for i in 1..=moving {
        let mut img = RgbImage::from_pixel(320, 240, Rgb([50, 50, 50]));
        for y in 80..160 {
            for x in 100..180 {
                img.put_pixel(x, y, Rgb([240, 240, 240]));
            }
        }
        img.save(dir.join(format!("frame_{i:04}.png"))).unwrap();
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn small_frame_config() -> AppConfig {
    let mut config = AppConfig::default_config();
    config.detection.frame_width = 320;
    config
}

/// 디스크 시퀀스 → 사진 1장 저장 (PNG)
#[test]
fn sequence_on_disk_saves_photo() {
    let tmp = tempfile::tempdir().unwrap();
    let frames = tmp.path().join("frames");
    let photos = tmp.path().join("captured_movement");
    write_sequence(&frames, 4);

    let config = small_frame_config();
    let (_tx, rx) = watch::channel(false);
    let mut driver = CycleDriver::new(
        DriverConfig::default(),
        MotionDetector::from_config(&config.detection, &config.action),
        DetectorState::default(),
        Box::new(ImageSequenceSource::open(&frames, StdDuration::ZERO).unwrap()),
        Box::new(NullAlerts),
        Box::new(PhotoFileStorage::new(photos.clone(), PhotoFormat::Png, 90).unwrap()),
        Arc::new(ManualClock::with_step(Utc::now(), Duration::seconds(1))),
        rx,
    );

    let summary = driver.run();
    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(summary.cycles, 4);
    assert_eq!(summary.alerts, 2);
    assert_eq!(summary.photos_saved, 1);

    let names = file_names(&photos);
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("motion_1_"));
    assert!(names[0].ends_with(".png"));

    // 저장된 사진에 영역 박스(초록)가 그려져 있음
    let saved = image::open(photos.join(&names[0])).unwrap().to_rgb8();
    assert_eq!(saved.dimensions(), (320, 240));
    assert!(saved.pixels().any(|p| *p == Rgb([0, 255, 0])));
}

/// 디버그 덤프: 사이클마다 4개 맵
#[test]
fn debug_dump_writes_maps_per_cycle() {
    let tmp = tempfile::tempdir().unwrap();
    let frames = tmp.path().join("frames");
    let debug_dir = tmp.path().join("debug");
    write_sequence(&frames, 2);

    let config = small_frame_config();
    let (_tx, rx) = watch::channel(false);
    let mut driver = CycleDriver::new(
        DriverConfig::default(),
        MotionDetector::from_config(&config.detection, &config.action),
        DetectorState::default(),
        Box::new(ImageSequenceSource::open(&frames, StdDuration::ZERO).unwrap()),
        Box::new(NullAlerts),
        Box::new(PhotoFileStorage::new(tmp.path().join("photos"), PhotoFormat::Jpeg, 90).unwrap()),
        Arc::new(ManualClock::new(Utc::now())),
        rx,
    )
    .with_display(Box::new(DebugDumpSink::new(debug_dir.clone(), 1).unwrap()));

    let summary = driver.run();
    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.sink_failures, 0);

    let names = file_names(&debug_dir);
    assert_eq!(names.len(), 8);
    assert!(names.contains(&"cycle_000001_edges.png".to_string()));
    assert!(names.contains(&"cycle_000002_threshold.png".to_string()));
}

/// 깨진 파일은 스킵하고 계속 진행
#[test]
fn corrupt_file_is_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let frames = tmp.path().join("frames");
    write_sequence(&frames, 3);
    std::fs::write(frames.join("frame_0002a.png"), b"garbage").unwrap();

    let config = small_frame_config();
    let (_tx, rx) = watch::channel(false);
    let mut driver = CycleDriver::new(
        DriverConfig::default(),
        MotionDetector::from_config(&config.detection, &config.action),
        DetectorState::default(),
        Box::new(ImageSequenceSource::open(&frames, StdDuration::ZERO).unwrap()),
        Box::new(NullAlerts),
        Box::new(PhotoFileStorage::new(tmp.path().join("photos"), PhotoFormat::Jpeg, 90).unwrap()),
        Arc::new(ManualClock::new(Utc::now())),
        rx,
    );

    let summary = driver.run();
    assert_eq!(summary.skipped_frames, 1);
    assert_eq!(summary.cycles, 3);
    // 스킵이 연속 카운트를 끊지 않으므로 3번째 사이클에서 알림
    assert_eq!(summary.alerts, 1);
}

/// 블로킹 스레드에서 드라이버 실행 (바이너리와 같은 구성)
#[tokio::test]
async fn driver_runs_on_blocking_thread() {
    let tmp = tempfile::tempdir().unwrap();
    let frames = tmp.path().join("frames");
    write_sequence(&frames, 5);

    let config = small_frame_config();
    let (tx, rx) = watch::channel(false);
    let mut driver = CycleDriver::new(
        DriverConfig {
            max_frames: Some(3),
        },
        MotionDetector::from_config(&config.detection, &config.action),
        DetectorState::default(),
        Box::new(ImageSequenceSource::open(&frames, StdDuration::ZERO).unwrap()),
        Box::new(NullAlerts),
        Box::new(PhotoFileStorage::new(tmp.path().join("photos"), PhotoFormat::Webp, 80).unwrap()),
        Arc::new(ManualClock::new(Utc::now())),
        rx,
    );

    let summary = tokio::task::spawn_blocking(move || driver.run())
        .await
        .unwrap();
    drop(tx);

    assert_eq!(summary.stop_reason, StopReason::FrameLimit);
    assert_eq!(summary.frames_read, 3);
    assert_eq!(summary.cycles, 2);
}
