use std::{
    fmt,
    ops::{Add, Sub},
    time::SystemTime,
};

use tokio::time::{Duration, Instant};

/// A source of current [timestamps][Timestamp].
///
/// [`Clock::new`] calls [`SystemTime::now`] and [`Instant::now`] once, and then
/// [`Clock::now`] computes timestamps based on the difference between that
/// initial `Instant` and the current one. Timestamps from one `Clock` never go
/// backwards, even if the system clock is adjusted.
#[derive(Copy, Clone, Debug)]
pub struct Clock {
    offset: Duration,
    reference: Instant,
}

impl Clock {
    /// Create a new [`Clock`] initialized with [`SystemTime::now`].
    pub fn new() -> Self {
        let (now, reference) = (SystemTime::now(), Instant::now());

        Self {
            offset: Self::offset(now),
            reference,
        }
    }

    /// Compute the [`Duration`] between [`Instant::now`] and the anchor
    /// [`Instant`] recorded by [`Clock::new`], and return it as a
    /// [`Timestamp`].
    pub fn now(&self) -> Timestamp {
        Timestamp(self.offset + self.elapsed())
    }

    /// The [duration][Duration] since the [`Clock`] was
    /// [created][Clock::new()].
    #[inline]
    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.reference)
    }

    /// A system time before 1970 is clamped to the epoch.
    fn offset(time: SystemTime) -> Duration {
        time.duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// A wall-clock time, measured from the Unix epoch (1970-01-01 00:00:00 UTC).
///
/// Displayed as fractional seconds with microsecond precision, e.g.
/// `1701648000.25`. The output always contains a decimal point.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Default, Debug)]
#[repr(transparent)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// The Unix epoch.
    pub const ZERO: Timestamp = Timestamp(Duration::ZERO);

    #[inline]
    pub const fn new(since_epoch: Duration) -> Self {
        Self(since_epoch)
    }

    /// Convert seconds since the epoch to a [`Timestamp`].
    ///
    /// Returns `None` for negative, infinite, or NaN values.
    pub fn from_secs_f64(secs: f64) -> Option<Self> {
        Duration::try_from_secs_f64(secs).ok().map(Self)
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (secs, micros) = (self.0.as_secs(), self.0.subsec_micros());

        if micros == 0 {
            return write!(f, "{secs}.0");
        }

        let frac = format!("{micros:06}");
        write!(f, "{secs}.{}", frac.trim_end_matches('0'))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, duration: Duration) -> Self::Output {
        Self(self.0 + duration)
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Timestamp;

    fn sub(self, duration: Duration) -> Self::Output {
        Self(self.0.saturating_sub(duration))
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        self.0.saturating_sub(rhs.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(self.as_secs_f64())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let secs = f64::deserialize(d)?;
        Self::from_secs_f64(secs).ok_or_else(|| serde::de::Error::custom("invalid timestamp"))
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, SystemTime};

    use super::{Clock, Timestamp};

    const T: Timestamp = Timestamp::new(Duration::from_secs(1701648000)); // 2023-12-04 00:00:00

    #[test]
    fn test_display_always_has_fraction() {
        assert_eq!(T.to_string(), "1701648000.0");
        assert_eq!((T + Duration::from_millis(250)).to_string(), "1701648000.25");
        assert_eq!((T + Duration::from_micros(7)).to_string(), "1701648000.000007");
        assert_eq!(Timestamp::ZERO.to_string(), "0.0");
    }

    #[test]
    fn test_display_truncates_below_micros() {
        assert_eq!((T + Duration::from_nanos(1_999)).to_string(), "1701648000.000001");
    }

    #[test]
    fn test_arithmetic() {
        let later = T + Duration::from_secs(3);

        assert_eq!(later - T, Duration::from_secs(3));
        assert_eq!(T - later, Duration::ZERO);
        assert_eq!(later - Duration::from_secs(3), T);
        assert_eq!(Timestamp::ZERO - Duration::from_secs(1), Timestamp::ZERO);
    }

    #[test]
    fn test_from_secs_f64() {
        assert_eq!(Timestamp::from_secs_f64(1701648000.5), Some(T + Duration::from_millis(500)));
        assert_eq!(Timestamp::from_secs_f64(-1.0), None);
        assert_eq!(Timestamp::from_secs_f64(f64::NAN), None);
    }

    #[test]
    fn test_offset_before_epoch() {
        let before = SystemTime::UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(Clock::offset(before), Duration::ZERO);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = Clock::new();
        let a = clock.now();
        let b = clock.now();

        assert!(b >= a);
        assert!(a > T);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_seconds() {
        let t = T + Duration::from_millis(125);

        assert_eq!(serde_json::to_string(&t).unwrap(), "1701648000.125");
        assert_eq!(serde_json::from_str::<Timestamp>("1701648000.125").unwrap(), t);
        assert!(serde_json::from_str::<Timestamp>("-1.0").is_err());
    }
}
