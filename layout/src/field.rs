//! Dynamic fields: the closed set of invoice placeholders and the one rule
//! used to turn a placeholder into display text.
//!
//! The same [`resolve_field_text`] runs for the editor preview (fed by
//! [`SampleData`]) and for final document generation (fed by
//! [`FieldValues`] carrying real invoice data), so the two paths cannot drift.

#[cfg(test)]
#[path = "field_test.rs"]
mod field_test;

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A dynamic field that is substituted with invoice data at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    CompanyName,
    Industry,
    Address,
    Phone,
    RepresentativeName,
    IssueDate,
    DueDate,
    TotalAmount,
}

impl FieldName {
    /// Every field, in toolbar order.
    pub const ALL: [FieldName; 8] = [
        Self::CompanyName,
        Self::Industry,
        Self::Address,
        Self::Phone,
        Self::RepresentativeName,
        Self::IssueDate,
        Self::DueDate,
        Self::TotalAmount,
    ];

    /// Wire name, e.g. `"companyName"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompanyName => "companyName",
            Self::Industry => "industry",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::RepresentativeName => "representativeName",
            Self::IssueDate => "issueDate",
            Self::DueDate => "dueDate",
            Self::TotalAmount => "totalAmount",
        }
    }

    /// Default human-readable caption shown in the toolbar and inspector.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CompanyName => "Company name",
            Self::Industry => "Industry",
            Self::Address => "Address",
            Self::Phone => "Phone",
            Self::RepresentativeName => "Representative",
            Self::IssueDate => "Issue date",
            Self::DueDate => "Due date",
            Self::TotalAmount => "Total amount",
        }
    }

    /// Fixed value painted in the editor preview.
    #[must_use]
    pub fn sample_value(self) -> &'static str {
        match self {
            Self::CompanyName => "Sample Trading Co., Ltd.",
            Self::Industry => "Information technology",
            Self::Address => "1-2-3 Marunouchi, Chiyoda-ku, Tokyo",
            Self::Phone => "03-1234-5678",
            Self::RepresentativeName => "Taro Yamada",
            Self::IssueDate => "2024-01-31",
            Self::DueDate => "2024-02-29",
            Self::TotalAmount => "1,234,567",
        }
    }
}

/// A field name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for FieldName {
    type Err = UnknownField;

    /// Parse a wire name such as `"totalAmount"`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|f| f.as_str() == raw).ok_or_else(|| UnknownField(raw.to_owned()))
    }
}

/// Supplies a value for each dynamic field.
pub trait FieldSource {
    /// The value for `field`, or `None` if this source has no data for it.
    fn value(&self, field: FieldName) -> Option<String>;
}

/// The preview table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleData;

impl FieldSource for SampleData {
    fn value(&self, field: FieldName) -> Option<String> {
        Some(field.sample_value().to_owned())
    }
}

/// Real invoice data keyed by field name, as posted by the document generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<FieldName, String>);

impl FieldValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.0.insert(field, value.into());
        self
    }

    pub fn insert(&mut self, field: FieldName, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FieldSource for FieldValues {
    fn value(&self, field: FieldName) -> Option<String> {
        self.0.get(&field).cloned()
    }
}

/// `prefix + value + suffix`, with an unset prefix or suffix treated as empty.
#[must_use]
pub fn assemble(prefix: Option<&str>, value: &str, suffix: Option<&str>) -> String {
    let prefix = prefix.unwrap_or("");
    let suffix = suffix.unwrap_or("");
    let mut out = String::with_capacity(prefix.len() + value.len() + suffix.len());
    out.push_str(prefix);
    out.push_str(value);
    out.push_str(suffix);
    out
}

/// Display text for a field element. A source with no value for `field`
/// contributes an empty string between the prefix and suffix.
#[must_use]
pub fn resolve_field_text(
    source: &dyn FieldSource,
    field: FieldName,
    prefix: Option<&str>,
    suffix: Option<&str>,
) -> String {
    let value = source.value(field).unwrap_or_default();
    assemble(prefix, &value, suffix)
}
