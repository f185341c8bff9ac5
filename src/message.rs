use std::{fmt, str::FromStr, time::Duration};

use bytes::{BufMut, BytesMut};

use crate::{seq::Seq, time::Timestamp};

/// One outbound payload: `Hello <seq> at <timestamp>`.
///
/// Messages are written to the stream as bare UTF-8 text, with no length
/// prefix or delimiter.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Message {
    pub seq: Seq,
    pub timestamp: Timestamp,
}

impl Message {
    const PREFIX: &'static str = "Hello ";
    const SEPARATOR: &'static str = " at ";

    pub fn new(seq: impl Into<Seq>, timestamp: Timestamp) -> Self {
        Self {
            seq: seq.into(),
            timestamp,
        }
    }

    /// Encode the message into `data`, replacing its contents, and return the
    /// encoded length.
    pub fn write(&self, data: &mut BytesMut) -> usize {
        data.truncate(0);
        data.put_slice(self.to_string().as_bytes());
        data.len()
    }

    /// Split text read from an unframed stream back into messages.
    ///
    /// Each message begins with `Hello `, so a buffer holding several
    /// back-to-back payloads can be recovered without framing. The final
    /// message is only meaningful if the buffer ends on a payload boundary.
    pub fn scan(text: &str) -> impl Iterator<Item = Result<Message, ParseError>> + '_ {
        let mut parts = text.split(Self::PREFIX);

        // text before the first prefix is garbage, unless there is none
        let leading = parts
            .next()
            .filter(|head| !head.is_empty())
            .map(|head| Err(ParseError::Prefix(head.to_owned())));

        leading.into_iter().chain(parts.map(Self::parse_body))
    }

    fn parse_body(body: &str) -> Result<Self, ParseError> {
        let (seq, timestamp) = body
            .split_once(Self::SEPARATOR)
            .ok_or(ParseError::Separator)?;

        let seq = seq
            .parse::<u64>()
            .map_err(|_| ParseError::Seq(seq.to_owned()))?;
        let timestamp = parse_timestamp(timestamp)
            .ok_or_else(|| ParseError::Timestamp(timestamp.to_owned()))?;

        Ok(Self::new(seq, timestamp))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", Self::PREFIX, self.seq, Self::SEPARATOR, self.timestamp)
    }
}

impl FromStr for Message {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix(Self::PREFIX) {
            Some(body) => Self::parse_body(body),
            None => Err(ParseError::Prefix(s.to_owned())),
        }
    }
}

/// A payload that doesn't match `Hello <seq> at <timestamp>`.
#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
#[non_exhaustive]
pub enum ParseError {
    #[error("expected message to start with \"Hello \": {0:?}")]
    Prefix(String),
    #[error("missing \" at \" separator")]
    Separator,
    #[error("invalid sequence number: {0:?}")]
    Seq(String),
    #[error("invalid timestamp: {0:?}")]
    Timestamp(String),
}

/// Parse base-10 seconds exactly (up to nanosecond precision), without a
/// round trip through `f64`.
fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let (secs, frac) = s.split_once('.').unwrap_or((s, ""));

    if secs.is_empty() || !is_digits(secs) || !is_digits(frac) || frac.len() > 9 {
        return None;
    }

    let secs: u64 = secs.parse().ok()?;
    let nanos: u32 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<9}").parse().ok()?
    };

    Some(Timestamp::new(Duration::new(secs, nanos)))
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
