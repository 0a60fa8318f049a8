//! 프레임 소스.
//!
//! 디렉토리의 이미지 파일을 이름 순으로 재생하는 캡처 소스와
//! 메모리 프레임 큐 소스.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use motionwatch_core::error::CoreError;
use motionwatch_core::models::frame::RawFrame;
use motionwatch_core::ports::capture::CaptureSource;
use tracing::{debug, info};

/// 읽을 수 있는 이미지 확장자
const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

/// 이미지 시퀀스 캡처 소스
///
/// 파일 목록은 생성 시 고정된다. 모든 파일을 소비하면 스트림 종료(`Ok(None)`).
pub struct ImageSequenceSource {
    dir: PathBuf,
    files: VecDeque<PathBuf>,
    frame_interval: Duration,
    last_frame_at: Option<Instant>,
    released: bool,
}

impl ImageSequenceSource {
    /// 디렉토리 열기
    ///
    /// 디렉토리가 없거나 읽을 수 없으면 `CaptureUnavailable`.
    pub fn open(dir: impl AsRef<Path>, frame_interval: Duration) -> Result<Self, CoreError> {
        let dir = dir.as_ref().to_path_buf();
        let entries = std::fs::read_dir(&dir).map_err(|e| {
            CoreError::CaptureUnavailable(format!("프레임 디렉토리 열기 실패 {}: {e}", dir.display()))
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_supported(path))
            .collect();
        files.sort();

        info!("프레임 소스 열림: {} ({}개 파일)", dir.display(), files.len());

        Ok(Self {
            dir,
            files: files.into(),
            frame_interval,
            last_frame_at: None,
            released: false,
        })
    }

    /// 남은 프레임 수
    pub fn remaining(&self) -> usize {
        self.files.len()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn pace(&mut self) {
        if let Some(last) = self.last_frame_at {
            let elapsed = last.elapsed();
            if elapsed < self.frame_interval {
                std::thread::sleep(self.frame_interval - elapsed);
            }
        }
        self.last_frame_at = Some(Instant::now());
    }
}

impl CaptureSource for ImageSequenceSource {
    fn next_raw_frame(&mut self) -> Result<Option<RawFrame>, CoreError> {
        if self.released {
            return Err(CoreError::CaptureUnavailable(
                "해제된 프레임 소스".to_string(),
            ));
        }

        let Some(path) = self.files.pop_front() else {
            return Ok(None);
        };

        self.pace();

        let image = image::open(&path).map_err(|e| {
            CoreError::InvalidFrame(format!("프레임 디코딩 실패 {}: {e}", path.display()))
        })?;

        debug!("프레임 읽음: {} ({}x{})", path.display(), image.width(), image.height());

        Ok(Some(RawFrame::from_rgb(image.to_rgb8())))
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.files.clear();
            debug!("프레임 소스 해제: {}", self.dir.display());
        }
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// 메모리 프레임 큐 소스
///
/// 큐의 각 항목을 그대로 반환한다. 에러 항목으로 캡처 실패를 재현할 수 있다.
#[derive(Default)]
pub struct FrameQueueSource {
    queue: VecDeque<Result<RawFrame, CoreError>>,
    released: bool,
}

impl FrameQueueSource {
    pub fn new(frames: impl IntoIterator<Item = RawFrame>) -> Self {
        Self {
            queue: frames.into_iter().map(Ok).collect(),
            released: false,
        }
    }

    /// 프레임 추가
    pub fn push_frame(&mut self, frame: RawFrame) {
        self.queue.push_back(Ok(frame));
    }

    /// 에러 추가
    pub fn push_error(&mut self, error: CoreError) {
        self.queue.push_back(Err(error));
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl CaptureSource for FrameQueueSource {
    fn next_raw_frame(&mut self) -> Result<Option<RawFrame>, CoreError> {
        match self.queue.pop_front() {
            Some(item) => item.map(Some),
            None => Ok(None),
        }
    }

    fn release(&mut self) {
        self.released = true;
    }
}
