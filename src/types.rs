use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const STATUS_CODE_SUCCESS: u16 = 200;
pub const STATUS_CODE_BAD_REQUEST: u16 = 400;

pub const FUNCTION_FIELD: &str = "function";
pub const MESSAGES_FIELD: &str = "messages";

/// Functions a request may name in its `function` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    #[serde(rename = "spam_or_ham")]
    SpamOrHam,
}

impl Function {
    pub const SUPPORTED: &'static [Function] = &[Function::SpamOrHam];

    pub fn name(&self) -> &'static str {
        match self {
            Function::SpamOrHam => "spam_or_ham",
        }
    }

    /// Fields a request for this function is allowed to carry.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Function::SpamOrHam => &[FUNCTION_FIELD, MESSAGES_FIELD],
        }
    }
}

impl FromStr for Function {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SUPPORTED
            .iter()
            .copied()
            .find(|function| function.name() == s)
            .ok_or(())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    /// Binary framing: class 0 is ham, every other class is spam.
    pub fn from_class_index(index: usize) -> Self {
        if index == 0 { Label::Ham } else { Label::Spam }
    }
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassificationRequest {
    pub function: Function,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    pub status_code: u16,
    pub function: String,
    pub responses: IndexMap<String, Label>,
    pub errors: Vec<String>,
}

impl ClassificationResponse {
    pub fn success(function: Function, responses: IndexMap<String, Label>) -> Self {
        Self {
            status_code: STATUS_CODE_SUCCESS,
            function: function.name().to_string(),
            responses,
            errors: Vec::new(),
        }
    }

    /// Error response for a request whose function was never resolved.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self::failure(None, vec![error.into()])
    }

    pub fn failure(function: Option<Function>, errors: Vec<String>) -> Self {
        Self {
            status_code: STATUS_CODE_BAD_REQUEST,
            function: function.map(|f| f.name().to_string()).unwrap_or_default(),
            responses: IndexMap::new(),
            errors,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_CODE_SUCCESS
    }
}
