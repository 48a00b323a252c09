//! # Notices and Replies
//!
//! Commands never print. They hand back a [`Reply`]: the value they produced,
//! at most one headline [`Notice`], and any warnings raised on the way (a
//! quantity that had to be coerced, for instance).
//!
//! ```text
//! record_sale(...)
//!     │
//!     ├── Ok(Reply { value: Sale, notice: "Success!", warnings: ["Invalid Discount!"] })
//!     └── Err(ApiError)  ──► Notice::from(&err)  (level Error)
//! ```

use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub text: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: impl Into<String>, text: impl Into<String>) -> Self {
        Notice {
            level,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, text)
    }

    pub fn info(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, text)
    }

    pub fn warning(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, text)
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, text)
    }

    /// The "nothing to save" notice for an edit that changed nothing.
    pub fn no_changes(what: &str) -> Self {
        Self::info("No Changes!", format!("No changes were made to the {}", what))
    }
}

impl From<&ApiError> for Notice {
    fn from(err: &ApiError) -> Self {
        Notice::error(err.title(), err.message.clone())
    }
}

/// What a command hands back on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply<T> {
    pub value: T,
    pub notice: Option<Notice>,
    pub warnings: Vec<Notice>,
}

impl<T> Reply<T> {
    pub fn new(value: T) -> Self {
        Reply {
            value,
            notice: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<Notice>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Whether the command reported a no-op.
    pub fn is_unchanged(&self) -> bool {
        self.notice
            .as_ref()
            .is_some_and(|n| n.level == NoticeLevel::Info && n.title == "No Changes!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_no_changes_notice() {
        let notice = Notice::no_changes("sale record");
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.text, "No changes were made to the sale record");
        assert!(Reply::new(()).with_notice(notice).is_unchanged());
    }

    #[test]
    fn test_error_notice_uses_code_title() {
        let err = ApiError::new(ErrorCode::DuplicateCode, "taken");
        let notice = Notice::from(&err);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, "Code Already Exists!");
        assert_eq!(notice.text, "taken");
    }
}
