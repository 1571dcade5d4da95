use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Vendor confidence category, ordered by severity.
///
/// Variant order matters: `Ord` is derived, so `Unknown < VeryUnlikely < ... < VeryLikely`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Likelihood {
    #[default]
    Unknown,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

impl Likelihood {
    /// All categories in ascending severity.
    pub const ALL: [Likelihood; 6] = [
        Likelihood::Unknown,
        Likelihood::VeryUnlikely,
        Likelihood::Unlikely,
        Likelihood::Possible,
        Likelihood::Likely,
        Likelihood::VeryLikely,
    ];

    /// Map a vendor code name (e.g. `"VERY_LIKELY"`) to a category.
    ///
    /// Never fails: unrecognized codes, including the REST form
    /// `LIKELIHOOD_UNSPECIFIED`, map to `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "VERY_UNLIKELY" => Likelihood::VeryUnlikely,
            "UNLIKELY" => Likelihood::Unlikely,
            "POSSIBLE" => Likelihood::Possible,
            "LIKELY" => Likelihood::Likely,
            "VERY_LIKELY" => Likelihood::VeryLikely,
            _ => Likelihood::Unknown,
        }
    }

    /// Map the numeric enum index used by the gRPC wire form (0..=5).
    pub fn from_index(index: i64) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(Likelihood::Unknown)
    }

    /// Map any JSON value a vendor might send (string name, number, or null).
    pub fn from_vendor_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(code) => Self::from_code(code),
            serde_json::Value::Number(n) => n.as_i64().map(Self::from_index).unwrap_or_default(),
            _ => Likelihood::Unknown,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Likelihood::Unknown => "UNKNOWN",
            Likelihood::VeryUnlikely => "VERY_UNLIKELY",
            Likelihood::Unlikely => "UNLIKELY",
            Likelihood::Possible => "POSSIBLE",
            Likelihood::Likely => "LIKELY",
            Likelihood::VeryLikely => "VERY_LIKELY",
        }
    }

    /// True for `Possible` and anything more severe.
    pub fn is_at_least_possible(&self) -> bool {
        *self >= Likelihood::Possible
    }
}

impl Display for Likelihood {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_code())
    }
}

impl Serialize for Likelihood {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_code())
    }
}

impl<'de> Deserialize<'de> for Likelihood {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Likelihood::from_vendor_value(&value))
    }
}
