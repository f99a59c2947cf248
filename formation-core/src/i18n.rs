//! User-facing strings in Korean and English.

use formation_model::{Locale, PlaybackErrorKind};

/// In-player status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    CheckingSystem,
    SettingSource,
    Loading,
    ReadyToPlay,
    Playing,
    AwaitingSource,
    ClickToPlay,
    SourceFailed,
}

impl PlayerStatus {
    pub fn text(self, locale: Locale) -> &'static str {
        use PlayerStatus::*;
        match (locale, self) {
            (Locale::Ko, CheckingSystem) => "시스템 확인 중...",
            (Locale::Ko, SettingSource) => "비디오 소스 설정 중...",
            (Locale::Ko, Loading) => "비디오 로딩 중...",
            (Locale::Ko, ReadyToPlay) => "재생 준비 완료",
            (Locale::Ko, Playing) => "재생 중",
            (Locale::Ko, AwaitingSource) => "비디오 소스를 불러오는 중...",
            (Locale::Ko, ClickToPlay) => "재생 버튼을 클릭해주세요",
            (Locale::Ko, SourceFailed) => "비디오 소스 설정 실패",
            (Locale::En, CheckingSystem) => "Checking system...",
            (Locale::En, SettingSource) => "Setting video source...",
            (Locale::En, Loading) => "Loading video...",
            (Locale::En, ReadyToPlay) => "Ready to play",
            (Locale::En, Playing) => "Playing",
            (Locale::En, AwaitingSource) => "Fetching video source...",
            (Locale::En, ClickToPlay) => "Press play to start",
            (Locale::En, SourceFailed) => "Failed to set video source",
        }
    }
}

/// Status line for a classified engine error.
pub fn playback_error(kind: PlaybackErrorKind, locale: Locale) -> &'static str {
    use PlaybackErrorKind::*;
    match (locale, kind) {
        (Locale::Ko, NotFound) => "비디오 파일을 찾을 수 없습니다. (404)",
        (Locale::Ko, Decode) => "비디오 디코딩 오류가 발생했습니다.",
        (Locale::Ko, Network) => "네트워크 오류가 발생했습니다.",
        (Locale::Ko, Aborted) => "비디오 로드를 중단했습니다.",
        (Locale::Ko, Unplayable) => "비디오를 재생할 수 없습니다.",
        (Locale::Ko, Restricted) => {
            "인증되지 않은 접근이거나 리전 정책 위반입니다."
        }
        (Locale::En, NotFound) => "Video file not found. (404)",
        (Locale::En, Decode) => "The video could not be decoded.",
        (Locale::En, Network) => "A network error occurred.",
        (Locale::En, Aborted) => "Video loading was aborted.",
        (Locale::En, Unplayable) => "This video cannot be played.",
        (Locale::En, Restricted) => {
            "Unauthorized access or region policy violation."
        }
    }
}

/// Split an offset into whole minutes and remaining whole seconds.
pub fn minutes_seconds(offset_secs: f64) -> (u64, u64) {
    let total = if offset_secs.is_finite() && offset_secs > 0.0 {
        offset_secs.floor() as u64
    } else {
        0
    };
    (total / 60, total % 60)
}

/// Confirmation question shown before resuming at `offset_secs`.
pub fn resume_prompt(offset_secs: f64, locale: Locale) -> String {
    let (m, s) = minutes_seconds(offset_secs);
    match locale {
        Locale::Ko => format!("{m}분 {s}초 지점부터 이어보시겠습니까?"),
        Locale::En => format!("Resume from {m}m {s}s?"),
    }
}

pub fn like_count(count: u32, locale: Locale) -> String {
    match locale {
        Locale::Ko => format!("{count}명이 이 콘텐츠를 좋아합니다"),
        Locale::En if count == 1 => "1 person likes this".to_string(),
        Locale::En => format!("{count} people like this"),
    }
}

pub fn runtime(minutes: u32, locale: Locale) -> String {
    match locale {
        Locale::Ko => format!("{minutes}분"),
        Locale::En => format!("{minutes} min"),
    }
}

/// Login and registration feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMessage {
    MissingFields,
    InvalidCredentials,
    SessionExpired,
    DuplicateEmail,
    Registered,
    ServerUnreachable,
}

impl AuthMessage {
    pub fn text(self, locale: Locale) -> &'static str {
        use AuthMessage::*;
        match (locale, self) {
            (Locale::Ko, MissingFields) => "모든 필드를 입력해주세요.",
            (Locale::Ko, InvalidCredentials) => {
                "이메일 또는 비밀번호가 올바르지 않습니다."
            }
            (Locale::Ko, SessionExpired) => {
                "세션이 만료되었습니다. 다시 로그인해주세요."
            }
            (Locale::Ko, DuplicateEmail) => "이미 가입된 이메일입니다.",
            (Locale::Ko, Registered) => {
                "회원가입 성공! 가입하신 계정으로 로그인해 주세요."
            }
            (Locale::Ko, ServerUnreachable) => "서버 연결에 실패했습니다.",
            (Locale::En, MissingFields) => "Please fill in all fields.",
            (Locale::En, InvalidCredentials) => "Incorrect email or password.",
            (Locale::En, SessionExpired) => {
                "Your session has expired. Please sign in again."
            }
            (Locale::En, DuplicateEmail) => "This email is already registered.",
            (Locale::En, Registered) => {
                "Registration complete! Sign in with your new account."
            }
            (Locale::En, ServerUnreachable) => "Could not reach the server.",
        }
    }
}

/// Registration rejected by the backend, with its reason when given.
pub fn registration_failed(detail: Option<&str>, locale: Locale) -> String {
    match locale {
        Locale::Ko => {
            format!("가입 실패: {}", detail.unwrap_or("정보를 확인해주세요."))
        }
        Locale::En => format!(
            "Registration failed: {}",
            detail.unwrap_or("please check your details.")
        ),
    }
}

/// Navigation and button labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Home,
    Watchlist,
    Movies,
    Series,
    Originals,
    Play,
    Info,
    RecommendTitle,
    SearchPlaceholder,
    Close,
}

impl Label {
    pub fn text(self, locale: Locale) -> &'static str {
        use Label::*;
        match (locale, self) {
            (Locale::Ko, Home) => "홈",
            (Locale::Ko, Watchlist) => "관심 콘텐츠",
            (Locale::Ko, Movies) => "영화",
            (Locale::Ko, Series) => "시리즈",
            (Locale::Ko, Originals) => "오리지널",
            (Locale::Ko, Play) => "재생하기",
            (Locale::Ko, Info) => "상세 정보",
            (Locale::Ko, RecommendTitle) => "Formation+ 오리지널 & 추천",
            (Locale::Ko, SearchPlaceholder) => {
                "제목, 캐릭터 또는 장르로 검색하세요"
            }
            (Locale::Ko, Close) => "닫기",
            (Locale::En, Home) => "Home",
            (Locale::En, Watchlist) => "My List",
            (Locale::En, Movies) => "Movies",
            (Locale::En, Series) => "Series",
            (Locale::En, Originals) => "Originals",
            (Locale::En, Play) => "Play",
            (Locale::En, Info) => "More Info",
            (Locale::En, RecommendTitle) => {
                "Formation+ Originals & Recommended"
            }
            (Locale::En, SearchPlaceholder) => "Titles, characters, or genres",
            (Locale::En, Close) => "Close",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_prompt_formats_minutes_and_seconds() {
        assert_eq!(
            resume_prompt(120.0, Locale::Ko),
            "2분 0초 지점부터 이어보시겠습니까?"
        );
        assert_eq!(resume_prompt(75.9, Locale::En), "Resume from 1m 15s?");
    }

    #[test]
    fn not_found_is_not_the_fallback() {
        let not_found = playback_error(PlaybackErrorKind::NotFound, Locale::Ko);
        let fallback = playback_error(PlaybackErrorKind::Restricted, Locale::Ko);
        assert_eq!(not_found, "비디오 파일을 찾을 수 없습니다. (404)");
        assert_ne!(not_found, fallback);
    }

    #[test]
    fn like_count_text() {
        assert_eq!(like_count(3, Locale::Ko), "3명이 이 콘텐츠를 좋아합니다");
        assert_eq!(like_count(1, Locale::En), "1 person likes this");
    }
}
