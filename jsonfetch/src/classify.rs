//! Turning a decode failure into the reason string callers see.

/// Where in the document a decode failure happened and what the decoder said
/// about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeContext {
    /// Field names and array indices leading to the failing value, outermost first.
    pub path: Vec<String>,
    /// The decoder's own explanation, e.g. `Expected to decode u64 but found string "x" instead.`
    pub debug_description: String,
    /// Description of a lower-level error, if the failure wraps one.
    pub underlying: Option<String>,
}

impl DecodeContext {
    /// The underlying error's description, or the dotted path when there is none.
    pub fn details(&self) -> String {
        match &self.underlying {
            Some(underlying) => underlying.clone(),
            None => self.path.join("."),
        }
    }
}

/// Why a JSON body could not be decoded into the requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailureDetail {
    /// The payload is not valid JSON, or a value was present but unacceptable.
    CorruptedPayload(DecodeContext),
    /// A required key is absent.
    KeyNotFound { key: String, context: DecodeContext },
    /// A value has the wrong JSON kind.
    TypeMismatch {
        expected: String,
        context: DecodeContext,
    },
    /// A value was `null` where one was required.
    ValueNotFound {
        expected: String,
        context: DecodeContext,
    },
    /// Anything the decoder reported that fits none of the above.
    Unknown { description: String },
}

impl DecodeFailureDetail {
    pub fn context(&self) -> Option<&DecodeContext> {
        match self {
            DecodeFailureDetail::CorruptedPayload(context)
            | DecodeFailureDetail::KeyNotFound { context, .. }
            | DecodeFailureDetail::TypeMismatch { context, .. }
            | DecodeFailureDetail::ValueNotFound { context, .. } => Some(context),
            DecodeFailureDetail::Unknown { .. } => None,
        }
    }

    /// Path to the failing value; empty for failures at the document root.
    pub fn path(&self) -> &[String] {
        self.context().map(|c| c.path.as_slice()).unwrap_or(&[])
    }
}

/// Renders the reason string for a decode failure.
///
/// Used by every decoding entry point so the same failure always reads the
/// same way.
pub fn classify(detail: &DecodeFailureDetail) -> String {
    match detail {
        DecodeFailureDetail::CorruptedPayload(context) => {
            format!("{} - ({})", context.debug_description, context.details())
        }
        DecodeFailureDetail::KeyNotFound { key, context } => format!(
            "{} (key: {}, {})",
            context.debug_description,
            key,
            context.details()
        ),
        DecodeFailureDetail::TypeMismatch { expected, context }
        | DecodeFailureDetail::ValueNotFound { expected, context } => format!(
            "{} (type: {}, {})",
            context.debug_description,
            expected,
            context.details()
        ),
        DecodeFailureDetail::Unknown { description } => description.clone(),
    }
}
