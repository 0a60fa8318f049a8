//! # motionwatch-storage
//!
//! 로컬 저장소 어댑터.
//!
//! ## 모듈
//! - `photo_storage`: 움직임 사진 파일 저장소 (PhotoSink 구현)
//! - `debug_dump`: 디버그 맵 PNG 덤프 (DisplaySink 구현)

pub mod debug_dump;
pub mod photo_storage;
