//! Conversion plan: the field-name to index mapping a conversion follows.

use thiserror::Error;

use crate::error::RefactorError;
use crate::shape::{FieldListKind, StructShape};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct NotApplicable {
    pub reason: String,
}

impl NotApplicable {
    fn new(reason: impl Into<String>) -> Self {
        NotApplicable {
            reason: reason.into(),
        }
    }
}

impl From<NotApplicable> for RefactorError {
    fn from(err: NotApplicable) -> Self {
        RefactorError::NotApplicable(err.reason)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedField {
    pub name: String,
    pub index: usize,
    pub ty_text: String,
    pub visibility: Option<String>,
    pub attrs: Vec<String>,
    pub docs: Vec<String>,
}

impl PlannedField {
    /// `#[attr] pub T`, with block doc comments in front.
    fn slot(&self) -> String {
        let mut text = String::new();
        for prefix in self.docs.iter().filter(|d| d.starts_with("/**")).chain(&self.attrs) {
            text.push_str(prefix);
            text.push(' ');
        }
        if let Some(vis) = &self.visibility {
            text.push_str(vis);
            text.push(' ');
        }
        text.push_str(&self.ty_text);
        text
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionPlan {
    pub name: String,
    pub fields: Vec<PlannedField>,
}

impl ConversionPlan {
    /// Declaration index of the field called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `(pub A, B)`: the new positional field list.
    ///
    /// A `///` comment runs to the end of its line, so when a field has one
    /// the list is laid out one field per line, indented one level past
    /// `indent`, the indentation of the declaration's line.
    pub fn tuple_field_list(&self, indent: &str) -> String {
        let line_docs = |f: &PlannedField| -> Vec<String> {
            f.docs.iter().filter(|d| d.starts_with("///")).cloned().collect()
        };
        if self.fields.iter().all(|f| line_docs(f).is_empty()) {
            let fields: Vec<String> = self.fields.iter().map(PlannedField::slot).collect();
            return format!("({})", fields.join(", "));
        }

        let mut text = String::from("(\n");
        for field in &self.fields {
            for doc in line_docs(field) {
                text.push_str(&format!("{indent}    {doc}\n"));
            }
            text.push_str(&format!("{indent}    {},\n", field.slot()));
        }
        text.push_str(indent);
        text.push(')');
        text
    }
}

/// Plan the conversion of a named-field declaration.
pub fn plan_conversion(shape: &StructShape) -> Result<ConversionPlan, NotApplicable> {
    if shape.is_union {
        return Err(NotApplicable::new(format!(
            "`{}` is a union; only structs and enum variants can be converted",
            shape.name
        )));
    }
    match shape.kind {
        FieldListKind::Record => {}
        FieldListKind::Tuple => {
            return Err(NotApplicable::new(format!(
                "`{}` already has positional fields",
                shape.name
            )))
        }
        FieldListKind::Unit => {
            return Err(NotApplicable::new(format!("`{}` has no field list", shape.name)))
        }
    }

    let mut fields = Vec::with_capacity(shape.fields.len());
    for (index, field) in shape.fields.iter().enumerate() {
        let Some(name) = field.name.clone() else {
            return Err(NotApplicable::new(format!(
                "field {index} of `{}` has no name",
                shape.name
            )));
        };
        fields.push(PlannedField {
            name,
            index,
            ty_text: field.ty_text.clone(),
            visibility: field.visibility.clone(),
            attrs: field.attrs.clone(),
            docs: field.docs.clone(),
        });
    }
    Ok(ConversionPlan {
        name: shape.name.clone(),
        fields,
    })
}
