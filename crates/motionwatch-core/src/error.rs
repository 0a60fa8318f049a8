//! motionwatch 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 외부 라이브러리 에러를 `map_err`로 `CoreError`에 담아 반환한다.

use thiserror::Error;

/// 코어 레이어 에러.
///
/// 사이클 드라이버는 variant에 따라 처리 방식을 결정한다:
/// - [`CoreError::CaptureUnavailable`]: 치명적, 루프 종료
/// - [`CoreError::InvalidFrame`]: 해당 사이클만 스킵
/// - [`CoreError::SinkFailure`]: 로그만 남기고 계속 진행
#[derive(Debug, Error)]
pub enum CoreError {
    /// 캡처 소스가 프레임을 더 이상 제공할 수 없음
    #[error("캡처 소스 사용 불가: {0}")]
    CaptureUnavailable(String),

    /// 전달된 프레임이 전처리 조건을 만족하지 않음 (크기 0, 채널 수 불일치 등)
    #[error("잘못된 프레임: {0}")]
    InvalidFrame(String),

    /// 알림/사진 싱크 실패
    #[error("싱크 실패 ({sink}): {message}")]
    SinkFailure {
        /// 실패한 싱크 이름 (예: "photo", "alert")
        sink: String,
        /// 실패 사유
        message: String,
    },

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 이미지 디코딩/인코딩 실패
    #[error("이미지 에러: {0}")]
    Image(#[from] image::ImageError),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 싱크 실패 에러 생성 헬퍼
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkFailure {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// 유효성 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 루프를 끝내야 하는 치명적 에러인지 여부
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CaptureUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_capture_unavailable_is_fatal() {
        assert!(CoreError::CaptureUnavailable("카메라 분리".into()).is_fatal());
        assert!(!CoreError::InvalidFrame("빈 프레임".into()).is_fatal());
        assert!(!CoreError::sink("photo", "디스크 가득 참").is_fatal());
    }

    #[test]
    fn sink_failure_message_names_sink() {
        let err = CoreError::sink("photo", "권한 없음");
        let msg = err.to_string();
        assert!(msg.contains("photo"));
        assert!(msg.contains("권한 없음"));
    }
}
