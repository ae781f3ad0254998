use std::fmt;

// Escape value every enumerated field offers next to the catalog entries.
pub const OTHER: &str = "Other";

const SUGGESTED_SUFFIX: &str = " (suggested)";

/// An enumerated form field with a free-text "Other" escape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    Unset,
    Option(T),
    Other { custom: String },
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::Unset
    }
}

impl<T> Selection<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Selection<U> {
        match self {
            Selection::Unset => Selection::Unset,
            Selection::Option(value) => Selection::Option(f(value)),
            Selection::Other { custom } => Selection::Other { custom },
        }
    }
}

impl<T: AsRef<str>> Selection<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Selection::Unset)
    }

    /// The value this field contributes to a request, if it has one.
    ///
    /// A picked option must be non-empty; a custom value is trimmed and must be
    /// non-empty after trimming.
    pub fn resolved(&self) -> Option<&str> {
        match self {
            Selection::Unset => None,
            Selection::Option(value) => {
                let value = value.as_ref();
                (!value.is_empty()).then_some(value)
            }
            Selection::Other { custom } => {
                let custom = custom.trim();
                (!custom.is_empty()).then_some(custom)
            }
        }
    }

    /// The option value as it appears in a picker (`"Other"` for the escape).
    pub fn picked_label(&self) -> Option<&str> {
        match self {
            Selection::Unset => None,
            Selection::Option(value) => Some(value.as_ref()),
            Selection::Other { .. } => Some(OTHER),
        }
    }
}

impl Selection<String> {
    /// Maps a raw picker value onto a selection: `"Other"` opens the custom
    /// input, anything else is a plain option, empty is unset.
    pub fn from_picker(value: &str, custom: &str) -> Self {
        match value {
            "" => Selection::Unset,
            OTHER => Selection::Other {
                custom: custom.to_string(),
            },
            value => Selection::Option(value.to_string()),
        }
    }

    /// Picks `value` when the list offers it, otherwise treats it as custom text.
    pub fn from_known_or_custom(value: &str, known: &[String]) -> Self {
        if value.trim().is_empty() {
            Selection::Unset
        } else if value == OTHER || !known.iter().any(|k| k == value) {
            Selection::Other {
                custom: if value == OTHER {
                    String::new()
                } else {
                    value.to_string()
                },
            }
        } else {
            Selection::Option(value.to_string())
        }
    }
}

/// A tone value tagged with whether it came from the suggestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneChoice {
    pub value: String,
    pub suggested: bool,
}

impl ToneChoice {
    pub fn picked(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            suggested: false,
        }
    }

    pub fn suggested(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            suggested: true,
        }
    }

    /// Reads a display label back into a choice, recognising the suggested marker.
    pub fn from_label(label: &str) -> Self {
        match label.strip_suffix(SUGGESTED_SUFFIX) {
            Some(value) => Self::suggested(value),
            None => Self::picked(label),
        }
    }

    /// Label shown to the user; never sent to the backend.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl AsRef<str> for ToneChoice {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ToneChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.suggested {
            write!(f, "{}{SUGGESTED_SUFFIX}", self.value)
        } else {
            f.write_str(&self.value)
        }
    }
}

/// Picker list for a field: the catalog entries followed by the escape value.
pub fn with_other(options: &[String]) -> Vec<String> {
    let mut list: Vec<String> = options.iter().filter(|o| *o != OTHER).cloned().collect();
    list.push(OTHER.to_string());
    list
}
