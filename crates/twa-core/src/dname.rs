//! X.500 distinguished names for generated certificates.

use std::fmt;

/// Identity fields embedded in the certificate subject.
///
/// Empty or unset fields are left out of the rendered name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    /// Common name (CN).
    pub common_name: Option<String>,
    /// Organizational unit (OU).
    pub organizational_unit: Option<String>,
    /// Organization (O).
    pub organization: Option<String>,
    /// Locality or city (L).
    pub locality: Option<String>,
    /// State or province (ST).
    pub state: Option<String>,
    /// Two-letter country code (C).
    pub country: Option<String>,
}

impl DistinguishedName {
    /// Present fields in CN, OU, O, L, ST, C order.
    pub fn components(&self) -> Vec<(&'static str, &str)> {
        [
            ("CN", &self.common_name),
            ("OU", &self.organizational_unit),
            ("O", &self.organization),
            ("L", &self.locality),
            ("ST", &self.state),
            ("C", &self.country),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.components().is_empty()
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .components()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&rendered)
    }
}
