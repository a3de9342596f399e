use serde::Deserialize;

/// A duration given as whitespace-separated `<number><unit>` parts, where
/// the unit is one of `s`, `m`, `h` or `d` (e.g. `"5m"` or `"1d 12h"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut seconds = 0;
        for part in s.split_whitespace() {
            let Some(split_at) = part.len().checked_sub(1) else {
                continue;
            };
            let (number, unit) = part.split_at(split_at);
            let number = number
                .parse::<u64>()
                .map_err(|_| serde::de::Error::custom("Invalid duration"))?;
            let multiplier = match unit {
                "s" => 1,
                "m" => 60,
                "h" => 60 * 60,
                "d" => 24 * 60 * 60,
                _ => return Err(serde::de::Error::custom("Invalid duration")),
            };
            seconds += number * multiplier;
        }
        Ok(Self(std::time::Duration::from_secs(seconds)))
    }
}
