//! Field patterns for product descriptions.
//!
//! All patterns are matched case-insensitively.

use std::fmt;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use pharmacorpus_shared::{PharmaCorpusError, Result};

/// The extracted field types, in extraction and removal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Dose,
    Form,
    Recipient,
}

impl FieldKind {
    pub const ALL: [FieldKind; 3] = [FieldKind::Dose, FieldKind::Form, FieldKind::Recipient];

    /// Output column name.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Dose => "dose",
            FieldKind::Form => "form",
            FieldKind::Recipient => "recipient",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Quantity with a weight/volume/IU unit, optionally per another unit: `500mg`, `2,5 ml`, `10mg/ml`.
pub(crate) const DOSE: &str = r"((\d+,)?\d+\s?(mg|g|ml|UI)(/\d?(mg|g|ml))?)";

/// Dosage-form abbreviations: sachet, powder, tablet, capsule, suspension, solution, injectable, ampoule, syrup.
pub(crate) const FORM: &str = r"(\s?(?:sach\w+|po|tab|cap|comp|cpr|susp|sol|inj|amp|xpe))";

/// Container abbreviations: bag, pen, vial, bottle, box, envelope, packet.
pub(crate) const RECIPIENT: &str = r"\s*(bg|canet\w+|fa|fr|cx|env|pt)";

static DOSE_RE: LazyLock<Regex> = LazyLock::new(|| compile(FieldKind::Dose, DOSE).expect("valid regex"));
static FORM_RE: LazyLock<Regex> = LazyLock::new(|| compile(FieldKind::Form, FORM).expect("valid regex"));
static RECIPIENT_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(FieldKind::Recipient, RECIPIENT).expect("valid regex"));

/// Built-in pattern for a field.
pub(crate) fn default_regex(kind: FieldKind) -> Regex {
    match kind {
        FieldKind::Dose => DOSE_RE.clone(),
        FieldKind::Form => FORM_RE.clone(),
        FieldKind::Recipient => RECIPIENT_RE.clone(),
    }
}

/// Compile a field pattern case-insensitively.
pub(crate) fn compile(kind: FieldKind, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| PharmaCorpusError::Pattern {
            field: kind.name().to_string(),
            message: e.to_string(),
        })
}
