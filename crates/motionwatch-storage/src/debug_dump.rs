//! 디버그 맵 덤프.
//!
//! N 사이클마다 표시 프레임, 임계값 맵, 엣지 맵, 융합 맵을 PNG로 저장한다.

use std::path::{Path, PathBuf};

use image::{GrayImage, RgbImage};
use motionwatch_core::config::DebugConfig;
use motionwatch_core::error::CoreError;
use motionwatch_core::ports::sink::{DebugView, DisplaySink};
use tracing::{debug, info};

/// 디버그 덤프 싱크
pub struct DebugDumpSink {
    dir: PathBuf,
    every: u64,
    dumped: u64,
}

impl DebugDumpSink {
    /// 새 덤프 싱크: 디렉토리가 없으면 만든다. `every`는 최소 1.
    pub fn new(dir: PathBuf, every: u64) -> Result<Self, CoreError> {
        std::fs::create_dir_all(&dir).map_err(|e| {
            CoreError::sink(
                "debug",
                format!("디버그 디렉토리 생성 실패 {}: {e}", dir.display()),
            )
        })?;
        info!("디버그 덤프: {} ({}사이클마다)", dir.display(), every.max(1));

        Ok(Self {
            dir,
            every: every.max(1),
            dumped: 0,
        })
    }

    /// 설정에서 생성 (덤프 디렉토리 미설정 시 None)
    pub fn from_config(config: &DebugConfig) -> Result<Option<Self>, CoreError> {
        config
            .dump_dir
            .as_ref()
            .map(|dir| Self::new(dir.clone(), config.dump_every))
            .transpose()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 덤프한 사이클 수
    pub fn dumped(&self) -> u64 {
        self.dumped
    }

    fn save_gray(&self, cycle: u64, name: &str, image: &GrayImage) -> Result<(), CoreError> {
        let path = self.dir.join(format!("cycle_{cycle:06}_{name}.png"));
        image
            .save(&path)
            .map_err(|e| CoreError::sink("debug", format!("{} 저장 실패: {e}", path.display())))
    }

    fn save_rgb(&self, cycle: u64, name: &str, image: &RgbImage) -> Result<(), CoreError> {
        let path = self.dir.join(format!("cycle_{cycle:06}_{name}.png"));
        image
            .save(&path)
            .map_err(|e| CoreError::sink("debug", format!("{} 저장 실패: {e}", path.display())))
    }
}

impl DisplaySink for DebugDumpSink {
    fn show(&mut self, view: DebugView<'_>) -> Result<(), CoreError> {
        if view.cycle_index % self.every != 0 {
            return Ok(());
        }

        let cycle = view.cycle_index;
        self.save_rgb(cycle, "frame", view.frame)?;
        self.save_gray(cycle, "threshold", view.threshold.as_image())?;
        self.save_gray(cycle, "edges", view.edges.as_image())?;
        self.save_gray(cycle, "fused", view.fused.as_image())?;

        self.dumped += 1;
        debug!("디버그 덤프: 사이클 {cycle}, 영역 {}개", view.regions.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motionwatch_core::models::motion::MotionMap;

    fn view<'a>(cycle: u64, frame: &'a RgbImage, map: &'a MotionMap) -> DebugView<'a> {
        DebugView {
            cycle_index: cycle,
            frame,
            threshold: map,
            edges: map,
            fused: map,
            regions: &[],
        }
    }

    #[test]
    fn dumps_every_nth_cycle() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = DebugDumpSink::new(tmp.path().join("debug"), 2).unwrap();
        let frame = RgbImage::new(8, 6);
        let map = MotionMap::empty(8, 6);

        for cycle in 1..=4 {
            sink.show(view(cycle, &frame, &map)).unwrap();
        }

        assert_eq!(sink.dumped(), 2);
        assert!(sink.dir().join("cycle_000002_frame.png").is_file());
        assert!(sink.dir().join("cycle_000004_fused.png").is_file());
        assert!(!sink.dir().join("cycle_000003_edges.png").exists());
    }

    #[test]
    fn disabled_without_dump_dir() {
        let config = DebugConfig::default();
        assert!(DebugDumpSink::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn zero_interval_dumps_every_cycle() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = DebugDumpSink::new(tmp.path().to_path_buf(), 0).unwrap();
        let frame = RgbImage::new(4, 4);
        let map = MotionMap::empty(4, 4);

        sink.show(view(1, &frame, &map)).unwrap();
        sink.show(view(2, &frame, &map)).unwrap();
        assert_eq!(sink.dumped(), 2);
    }
}
