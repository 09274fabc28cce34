//! Action metadata model.
//!
//! An [`Action`] is the record describing one scripted vRO action: identity,
//! parameters, return type, and the script body. It is assembled either from
//! an element's XML `data` document (expand path) or from a rendered stub in
//! a module file (build path), and consumed by the renderers in
//! [`stub`](crate::action::stub) and [`xml`](crate::action::xml).
//!
//! The record itself is inert: renderers only read it, and rendering the same
//! record twice produces byte-identical output.

pub mod stub;
pub mod xml;

use crate::error::{Result, VrocliError};
use serde::{Deserialize, Serialize};

/// One declared parameter of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParam {
    /// Parameter identifier.
    pub name: String,

    /// Declared type, free-form (`string`, `VC:VirtualMachine`, ...).
    /// Not validated; inserted verbatim into output.
    pub param_type: String,

    /// Optional human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl ActionParam {
    /// Create a parameter, normalizing an empty description to `None`.
    pub fn new(
        name: impl Into<String>,
        param_type: impl Into<String>,
        desc: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            desc: desc.filter(|d| !d.trim().is_empty()),
        }
    }
}

/// Return type of an action, carried in both of its spellings.
///
/// vRO writes array types as `Array/String` in element attributes while the
/// doc-comment annotation spells the same type `String[]`. Constructing from
/// either form derives the other; non-array types are identical in both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultType {
    js: String,
    element: String,
}

impl ResultType {
    /// Build from the annotation form (`String[]`, `void`, ...).
    pub fn from_js(js: &str) -> Self {
        let element = match js.strip_suffix("[]") {
            Some(inner) => format!("Array/{}", inner),
            None => js.to_string(),
        };
        Self {
            js: js.to_string(),
            element,
        }
    }

    /// Build from the element-attribute form (`Array/String`, `void`, ...).
    pub fn from_element(element: &str) -> Self {
        let js = match element.strip_prefix("Array/") {
            Some(inner) => format!("{}[]", inner),
            None => element.to_string(),
        };
        Self {
            js,
            element: element.to_string(),
        }
    }

    /// The annotation form, as emitted in `@return {...}`.
    pub fn js(&self) -> &str {
        &self.js
    }

    /// The element form, as emitted in the `result-type` attribute.
    pub fn element(&self) -> &str {
        &self.element
    }
}

/// Metadata record describing a scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Opaque unique id; becomes the element directory name and the
    /// `/* id:... */` comment. Never interpreted.
    pub id: String,

    /// Function name to emit. Treated as opaque text.
    pub name: String,

    /// Optional description; `None` (or empty input) renders nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordered parameter list; order is preserved verbatim in output.
    pub params: Vec<ActionParam>,

    /// Literal function body. Inserted unmodified by the stub renderer.
    pub script: String,

    /// Category path (`com.corp.tools`); names the module file.
    pub category: String,

    /// Return type in both spellings.
    pub result: ResultType,
}

impl Action {
    /// Create an action, normalizing the description (trimmed; empty means
    /// absent).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        params: Vec<ActionParam>,
        script: impl Into<String>,
        category: impl Into<String>,
        result: ResultType,
    ) -> Self {
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Self {
            id: id.into(),
            name: name.into(),
            description,
            params,
            script: script.into(),
            category: category.into(),
            result,
        }
    }

    /// Check the fields without which no output can be produced.
    ///
    /// The declaration line needs `name` and the body needs `script`;
    /// everything else is optional or merely copied through.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(VrocliError::InvalidSpec { field: "name" });
        }
        if self.script.trim().is_empty() {
            return Err(VrocliError::InvalidSpec { field: "script" });
        }
        Ok(())
    }
}
