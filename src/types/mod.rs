mod arg;
mod context;
mod error;
mod evaluation_report;
mod outcome;
mod rule;
mod rule_spec;
mod value;

pub(crate) use arg::slash_literal_len;
pub use arg::{is_slash_literal, Arg};
pub use context::{EvaluationContext, FormValues};
pub use error::{EvaluationError, RuleError};
pub use evaluation_report::EvaluationReport;
pub use outcome::{RuleOutcome, ValidationResult};
pub use rule::ParsedRule;
pub use rule_spec::{RuleSpec, RuleSpecBuilder};
pub use value::{FieldValue, FileInfo};
