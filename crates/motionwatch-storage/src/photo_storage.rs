//! 움직임 사진 파일 저장소.
//!
//! 사진 요청을 설정된 포맷으로 인코딩해 단일 디렉토리에 저장한다.
//! 파일명: `motion_{라벨}_{DD-MM-YYYY_HH-MM-SS}.{확장자}` (로컬 시각)

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use motionwatch_core::config::{PhotoFormat, StorageConfig};
use motionwatch_core::error::CoreError;
use motionwatch_core::models::event::PhotoRequest;
use motionwatch_core::ports::sink::PhotoSink;
use motionwatch_vision::encoder;
use tracing::{debug, info};

/// 파일명 접두사
const FILE_PREFIX: &str = "motion";

/// 사진 파일 저장소
pub struct PhotoFileStorage {
    /// 저장 디렉토리
    photo_dir: PathBuf,
    /// 인코딩 포맷
    format: PhotoFormat,
    /// 손실 포맷 품질 (1~100)
    quality: u8,
    /// 저장 성공 횟수
    saved: u64,
}

impl PhotoFileStorage {
    /// 새 저장소 생성: 디렉토리가 없으면 만든다
    pub fn new(photo_dir: PathBuf, format: PhotoFormat, quality: u8) -> Result<Self, CoreError> {
        std::fs::create_dir_all(&photo_dir).map_err(|e| {
            CoreError::sink(
                "photo",
                format!("사진 디렉토리 생성 실패 {}: {e}", photo_dir.display()),
            )
        })?;

        info!(
            "사진 저장소: {} ({:?}, 품질 {quality})",
            photo_dir.display(),
            format
        );

        Ok(Self {
            photo_dir,
            format,
            quality,
            saved: 0,
        })
    }

    /// 설정에서 생성
    pub fn from_config(config: &StorageConfig) -> Result<Self, CoreError> {
        Self::new(
            config.photo_dir.clone(),
            config.photo_format,
            config.photo_quality,
        )
    }

    pub fn photo_dir(&self) -> &Path {
        &self.photo_dir
    }

    pub fn saved_count(&self) -> u64 {
        self.saved
    }

    /// 라벨과 시각으로 파일명 생성
    pub fn file_name(label: u64, at: NaiveDateTime, format: PhotoFormat) -> String {
        format!(
            "{FILE_PREFIX}_{label}_{}.{}",
            at.format("%d-%m-%Y_%H-%M-%S"),
            format.extension()
        )
    }

    /// 요청에 대한 저장 경로
    pub fn path_for(&self, request: &PhotoRequest) -> PathBuf {
        let local = request.timestamp.with_timezone(&Local).naive_local();
        self.photo_dir
            .join(Self::file_name(request.label, local, self.format))
    }
}

impl PhotoSink for PhotoFileStorage {
    fn save_photo(&mut self, request: &PhotoRequest) -> Result<(), CoreError> {
        let bytes = encoder::encode(&request.frame, self.format, self.quality)
            .map_err(|e| CoreError::sink("photo", format!("인코딩 실패: {e}")))?;

        let path = self.path_for(request);
        std::fs::write(&path, &bytes).map_err(|e| {
            CoreError::sink("photo", format!("파일 쓰기 실패 {}: {e}", path.display()))
        })?;

        self.saved += 1;
        info!("움직임 사진 저장: {}", path.display());
        debug!("사진 크기: {}bytes, 영역 {}개", bytes.len(), request.regions.len());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use image::{Rgb, RgbImage};

    fn request(label: u64) -> PhotoRequest {
        PhotoRequest {
            label,
            frame: RgbImage::from_pixel(32, 24, Rgb([10, 200, 10])),
            regions: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn file_name_follows_pattern() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 2)
            .unwrap();
        assert_eq!(
            PhotoFileStorage::file_name(4, at, PhotoFormat::Jpeg),
            "motion_4_07-03-2024_09-05-02.jpg"
        );
        assert_eq!(
            PhotoFileStorage::file_name(12, at, PhotoFormat::Webp),
            "motion_12_07-03-2024_09-05-02.webp"
        );
    }

    #[test]
    fn creates_directory_and_writes_decodable_photo() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("captured_movement");
        let mut storage = PhotoFileStorage::new(dir.clone(), PhotoFormat::Png, 90).unwrap();
        assert!(dir.is_dir());

        let req = request(1);
        storage.save_photo(&req).unwrap();

        let path = storage.path_for(&req);
        assert!(path.starts_with(&dir));
        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded, req.frame);
        assert_eq!(storage.saved_count(), 1);
    }

    #[test]
    fn jpeg_photo_written() {
        let tmp = tempfile::tempdir().unwrap();
        let mut storage =
            PhotoFileStorage::new(tmp.path().to_path_buf(), PhotoFormat::Jpeg, 80).unwrap();

        storage.save_photo(&request(3)).unwrap();

        let names: Vec<String> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("motion_3_"));
        assert!(names[0].ends_with(".jpg"));
    }

    #[test]
    fn write_failure_is_sink_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("photos");
        let mut storage = PhotoFileStorage::new(dir.clone(), PhotoFormat::Png, 90).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        let err = storage.save_photo(&request(1)).unwrap_err();
        assert!(matches!(err, CoreError::SinkFailure { .. }));
        assert_eq!(storage.saved_count(), 0);
    }
}
