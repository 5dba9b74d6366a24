use std::time::{Duration, Instant};

pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    pub fn icon(&self) -> char {
        match self {
            NoticeKind::Success => '✓',
            NoticeKind::Error => '✗',
            NoticeKind::Info => 'ℹ',
        }
    }
}

/// Transient, non-blocking message. A newer notice replaces the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    expires_at: Instant,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>, now: Instant) -> Self {
        Self { kind, message: message.into(), expires_at: now + NOTICE_TTL }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_ttl() {
        let now = Instant::now();
        let notice = Notice::new(NoticeKind::Error, "Match is full", now);
        assert!(!notice.is_expired(now + Duration::from_secs(1)));
        assert!(notice.is_expired(now + NOTICE_TTL));
        assert_eq!(notice.kind.icon(), '✗');
    }
}
