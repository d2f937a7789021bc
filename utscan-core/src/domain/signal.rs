//! Signal outcome types shared by the extractor, pipeline and report.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Resolved signal type for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalType {
    Buy,
    Sell,
    #[serde(rename = "No Signal")]
    NoSignal,
    Error,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Buy => "Buy",
            SignalType::Sell => "Sell",
            SignalType::NoSignal => "No Signal",
            SignalType::Error => "Error",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of most-recent candles without a signal of the reported type.
///
/// `Infinite` is used for "No Signal" and errors and orders after every
/// finite count. Variant order matters: the derived `Ord` compares the
/// variant first, then the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CandlesAgo {
    Finite(usize),
    Infinite,
}

impl CandlesAgo {
    pub fn is_finite(&self) -> bool {
        matches!(self, CandlesAgo::Finite(_))
    }

    pub fn count(&self) -> Option<usize> {
        match self {
            CandlesAgo::Finite(n) => Some(*n),
            CandlesAgo::Infinite => None,
        }
    }
}

/// Serialized form of [`CandlesAgo::Infinite`].
pub const INFINITE_TOKEN: &str = "inf";

impl fmt::Display for CandlesAgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandlesAgo::Finite(n) => write!(f, "{n}"),
            CandlesAgo::Infinite => f.write_str(INFINITE_TOKEN),
        }
    }
}

impl Serialize for CandlesAgo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CandlesAgo::Finite(n) => serializer.serialize_u64(*n as u64),
            CandlesAgo::Infinite => serializer.serialize_str(INFINITE_TOKEN),
        }
    }
}

struct CandlesAgoVisitor;

impl<'de> Visitor<'de> for CandlesAgoVisitor {
    type Value = CandlesAgo;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a non-negative integer or \"{INFINITE_TOKEN}\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        usize::try_from(v)
            .map(CandlesAgo::Finite)
            .map_err(|_| E::custom(format!("candle count {v} out of range")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        if v < 0 {
            return Err(E::custom(format!("negative candle count {v}")));
        }
        self.visit_u64(v as u64)
    }

    // CSV infers "inf" as a float
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v == f64::INFINITY {
            Ok(CandlesAgo::Infinite)
        } else if v >= 0.0 && v.fract() == 0.0 && v <= usize::MAX as f64 {
            Ok(CandlesAgo::Finite(v as usize))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v == INFINITE_TOKEN {
            return Ok(CandlesAgo::Infinite);
        }
        v.parse::<usize>()
            .map(CandlesAgo::Finite)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for CandlesAgo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CandlesAgoVisitor)
    }
}

/// Outcome of scanning one symbol. One per symbol per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolResult {
    pub symbol: String,
    pub signal_type: SignalType,
    pub candles_ago: CandlesAgo,
    pub message: String,
    /// Position of the symbol in the configured symbol list. Used only as
    /// the tiebreak when ranking; not part of the report.
    #[serde(skip)]
    pub index: usize,
}

impl SymbolResult {
    /// Error row: always `Infinite`, message prefixed with the symbol.
    pub fn error(symbol: &str, index: usize, cause: impl fmt::Display) -> Self {
        Self {
            symbol: symbol.to_string(),
            signal_type: SignalType::Error,
            candles_ago: CandlesAgo::Infinite,
            message: format!("{symbol}: {cause}"),
            index,
        }
    }
}
