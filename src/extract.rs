//! Pulls the corrected code out of a delimited oracle response.

/// Opening delimiter the oracle is instructed to emit before the code.
pub const BEGIN_DELIMITER: &str = "//BEGINCOMPLETION";
/// Closing delimiter the oracle is instructed to emit after the code.
pub const END_DELIMITER: &str = "//ENDCOMPLETION";

/// Result of scanning a raw oracle response for the completion envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Both delimiters were present; holds the text strictly between them.
    Delimited(String),
    /// At least one delimiter was missing; holds the raw response unchanged.
    /// Still worth checking — a rejection yields a fresh error reason for
    /// the next repair attempt.
    Unparsed(String),
}

impl Extraction {
    pub fn code(&self) -> &str {
        match self {
            Extraction::Delimited(code) | Extraction::Unparsed(code) => code,
        }
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self, Extraction::Unparsed(_))
    }
}

/// Extract the completion from a raw response.
///
/// Takes the text strictly between the first `//BEGINCOMPLETION` and the
/// first `//ENDCOMPLETION` that follows it. If either delimiter is missing
/// the raw text is returned unchanged, flagged as unparsed.
pub fn extract(raw: &str) -> Extraction {
    let Some(begin) = raw.find(BEGIN_DELIMITER) else {
        return Extraction::Unparsed(raw.to_string());
    };
    let body_start = begin + BEGIN_DELIMITER.len();
    let Some(end) = raw[body_start..].find(END_DELIMITER) else {
        return Extraction::Unparsed(raw.to_string());
    };
    Extraction::Delimited(raw[body_start..body_start + end].to_string())
}
