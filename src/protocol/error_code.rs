//! Protocol error codes carried in responses.

/// Kafka protocol error codes (values match the official protocol).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum ErrorCode {
    UnknownServerError = -1,
    None = 0,
    UnsupportedVersion = 35,
}

impl ErrorCode {
    /// Wire value.
    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            -1 => Some(Self::UnknownServerError),
            0 => Some(Self::None),
            35 => Some(Self::UnsupportedVersion),
            _ => None,
        }
    }

    pub fn is_error(self) -> bool {
        self != Self::None
    }
}

impl From<ErrorCode> for i16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::UnknownServerError => "UNKNOWN_SERVER_ERROR",
            Self::None => "NONE",
            Self::UnsupportedVersion => "UNSUPPORTED_VERSION",
        };
        write!(f, "{} ({})", name, self.code())
    }
}
