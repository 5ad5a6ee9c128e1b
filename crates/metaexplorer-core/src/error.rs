//! Error types for metaexplorer-core

use thiserror::Error;

use crate::schema::TypeKind;

/// Errors raised while reading a CSDL schema document.
#[derive(Error, Debug)]
pub enum CsdlError {
    /// The document is not well-formed XML
    #[error("malformed schema document at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// A recognised element is missing a required attribute
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// A schema element appeared outside of any `<Schema>`
    #[error("<{element}> declared outside of a <Schema> element")]
    OutsideSchema { element: String },

    /// A type inherits from itself, directly or transitively
    #[error("inheritance cycle involving '{type_name}'")]
    InheritanceCycle { type_name: String },
}

impl CsdlError {
    pub fn xml(position: u64, message: impl std::fmt::Display) -> Self {
        Self::Xml {
            position,
            message: message.to_string(),
        }
    }

    pub fn missing_attribute(element: impl Into<String>, attribute: &'static str) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute,
        }
    }
}

/// Errors raised while projecting a schema graph into display items.
#[derive(Error, Debug)]
pub enum ProjectionError {
    /// A structured declaration is neither an entity nor a complex type
    #[error("unsupported structured type kind {kind} for '{type_name}'")]
    UnsupportedTypeKind { type_name: String, kind: TypeKind },
}

/// Errors raised while reading an interchange artifact back.
#[derive(Error, Debug)]
pub enum InterchangeError {
    /// The text does not start with the expected binding
    #[error("interchange text must start with '{expected}'")]
    MissingBinding { expected: &'static str },

    /// The array literal is not terminated by `;`
    #[error("interchange text is not terminated by ';'")]
    MissingTerminator,

    /// The array literal could not be parsed
    #[error("invalid interchange array: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the end-to-end schema transformation.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    Csdl(#[from] CsdlError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CsdlError::missing_attribute("EntityType", "Name");
        assert_eq!(
            err.to_string(),
            "<EntityType> is missing required attribute 'Name'"
        );

        let err = ProjectionError::UnsupportedTypeKind {
            type_name: "ns.thing".to_string(),
            kind: TypeKind::Untyped,
        };
        assert!(err.to_string().contains("Untyped"));
        assert!(err.to_string().contains("ns.thing"));
    }

    #[test]
    fn test_transform_error_is_transparent() {
        let err: TransformError = CsdlError::xml(12, "unexpected end").into();
        assert_eq!(
            err.to_string(),
            "malformed schema document at byte 12: unexpected end"
        );
    }
}
