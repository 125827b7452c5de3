//! DLsite work identifiers.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use absmeta_core::Error;

static RJ_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^RJ[0-9]{6,8}$").expect("invalid regex"));

/// A validated DLsite product code such as `RJ123456`.
///
/// Always stored uppercase and trimmed; the only way to get one is through
/// [`RjCode::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RjCode(String);

impl RjCode {
    /// Validate free-form input as a product code.
    ///
    /// Surrounding whitespace and prefix case are ignored.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let normalized = raw.trim().to_uppercase();

        if RJ_CODE_RE.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(Error::InvalidFormat(format!("not a DLsite product code: {raw:?}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RjCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RjCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RjCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
