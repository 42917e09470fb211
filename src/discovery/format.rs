//! Phone number display formatting.
//!
//! Identifiers are stored as raw digits with the calling code. Rows show
//! them in international form through a pluggable [`PhoneNumberFormatter`];
//! the default is backed by libphonenumber metadata.

use phonenumber::Mode;

/// Formats raw phone digits for display
pub trait PhoneNumberFormatter: Send + Sync {
    /// Display form of `digits`, or `None` if it cannot be parsed
    fn format_international(&self, digits: &str) -> Option<String>;
}

/// libphonenumber INTERNATIONAL format, e.g. `+44 7700 900123`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternationalFormatter;

impl PhoneNumberFormatter for InternationalFormatter {
    fn format_international(&self, digits: &str) -> Option<String> {
        let digits = digits.strip_prefix('+').unwrap_or(digits);

        match phonenumber::parse(None, format!("+{}", digits)) {
            Ok(number) => Some(number.format().mode(Mode::International).to_string()),
            Err(e) => {
                tracing::debug!("Unparseable phone identifier: {}", e);
                None
            }
        }
    }
}

/// Display form of a phone identifier, falling back to `+<raw>`.
pub(crate) fn display_phone(formatter: &dyn PhoneNumberFormatter, digits: &str) -> String {
    formatter
        .format_international(digits)
        .unwrap_or_else(|| format!("+{}", digits))
}
