use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{
    component_index::{ComponentIndex, InvalidComponentIndex},
    dlid::{Container, FieldMap, MANDATORY_ELEMENTS},
};

#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("no DL or ID subfile found")]
    SubfileNotFound,

    #[error("`fields` and `componentIndex` are mutually exclusive")]
    ConflictingSelector,

    #[error(transparent)]
    ComponentIndex(#[from] InvalidComponentIndex),
}

/// Data elements to keep from the identity subfile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector {
    /// Every element present.
    #[default]
    All,

    /// The 22 mandatory elements.
    Mandatory,

    /// Explicit element codes. Codes absent from the subfile are ignored.
    Fields(BTreeSet<String>),

    /// Mandatory elements selected by a component index.
    ComponentIndex(ComponentIndex),
}

impl Selector {
    pub fn fields<S: Into<String>>(codes: impl IntoIterator<Item = S>) -> Self {
        Self::Fields(codes.into_iter().map(Into::into).collect())
    }

    /// Selector from the multibase text form of a component index.
    pub fn component_index(encoded: &str) -> Result<Self, InvalidComponentIndex> {
        ComponentIndex::decode(encoded).map(Self::ComponentIndex)
    }

    /// Codes to keep, or `None` to keep everything.
    fn resolve(&self) -> Option<BTreeSet<&str>> {
        match self {
            Self::All => None,
            Self::Mandatory => Some(MANDATORY_ELEMENTS.iter().map(|e| e.id()).collect()),
            Self::Fields(codes) => Some(codes.iter().map(String::as_str).collect()),
            Self::ComponentIndex(index) => Some(index.iter().map(|e| e.id()).collect()),
        }
    }
}

/// Selection request, as found in configuration or API payloads.
///
/// ```json
/// { "fields": "mandatory" }
/// { "fields": ["DAQ", "DCS"] }
/// { "componentIndex": "uP_BA" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SelectorRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldsRequest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_index: Option<ComponentIndexRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldsRequest {
    Set(FieldSet),
    Codes(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSet {
    Mandatory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentIndexRequest {
    Bits(u32),
    Encoded(String),
}

impl TryFrom<SelectorRequest> for Selector {
    type Error = SelectError;

    fn try_from(value: SelectorRequest) -> Result<Self, Self::Error> {
        match (value.fields, value.component_index) {
            (Some(_), Some(_)) => Err(SelectError::ConflictingSelector),
            (Some(FieldsRequest::Set(FieldSet::Mandatory)), None) => Ok(Self::Mandatory),
            (Some(FieldsRequest::Codes(codes)), None) => Ok(Self::fields(codes)),
            (None, Some(ComponentIndexRequest::Bits(bits))) => {
                Ok(Self::ComponentIndex(ComponentIndex::from_bits(bits)?))
            }
            (None, Some(ComponentIndexRequest::Encoded(encoded))) => {
                Ok(Self::component_index(&encoded)?)
            }
            (None, None) => Ok(Self::All),
        }
    }
}

/// Selects data elements from the first `DL` or `ID` subfile of `container`.
pub fn select(container: &Container, selector: &Selector) -> Result<FieldMap, SelectError> {
    let subfile = container
        .identity_subfile()
        .ok_or(SelectError::SubfileNotFound)?;

    let selected: FieldMap = match selector.resolve() {
        None => subfile.data.clone(),
        Some(keep) => subfile
            .data
            .iter()
            .filter(|(code, _)| keep.contains(code.as_str()))
            .map(|(code, value)| (code.clone(), value.clone()))
            .collect(),
    };

    tracing::debug!(
        subfile = %subfile.subfile_type,
        available = subfile.data.len(),
        selected = selected.len(),
        "selected data elements"
    );

    Ok(selected)
}
