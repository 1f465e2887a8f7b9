//! Entity type descriptors, decoded entities and error definitions.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

/// Runtime identity of a Rust type, used where a decoder is selected by "class".
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for the type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this key identifies `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A named marker attached to a decode request.
///
/// Decoders may inspect annotations to adjust behaviour (e.g. a lenient parse).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation(Cow<'static, str>);

impl Annotation {
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<String> for Annotation {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&'static str> for Annotation {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

/// The declared type of a response entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityType {
    class: TypeKey,
    generic_type: Option<TypeKey>,
    annotations: Vec<Annotation>,
}

impl EntityType {
    /// Entity type for `T` with no generic type and no annotations.
    pub fn of<T: 'static>() -> Self {
        Self::new(TypeKey::of::<T>())
    }

    pub fn new(class: TypeKey) -> Self {
        Self {
            class,
            generic_type: None,
            annotations: Vec::new(),
        }
    }

    /// Set the declared generic type. Lookups fall back to the class when unset.
    pub fn with_generic_type(mut self, generic_type: TypeKey) -> Self {
        self.generic_type = Some(generic_type);
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn class(&self) -> TypeKey {
        self.class
    }

    /// The generic type, or the class if none was declared.
    pub fn generic_type(&self) -> TypeKey {
        self.generic_type.unwrap_or(self.class)
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// A decoded entity: an opaque value plus the type it was decoded as.
pub struct Entity {
    value: Box<dyn Any + Send + Sync>,
    declared: TypeKey,
}

impl Entity {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Box::new(value),
            declared: TypeKey::of::<T>(),
        }
    }

    /// The type the value was decoded as.
    pub fn declared_type(&self) -> TypeKey {
        self.declared
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Unwrap the value as `T`, handing the entity back on a type mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let declared = self.declared;
        self.value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|value| Self { value, declared })
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("declared", &self.declared)
            .finish_non_exhaustive()
    }
}

/// Boxed error raised by a third-party decoder.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while reading a response.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No registered decoder accepts the requested entity type.
    #[error("No reader for response entity {entity}")]
    NoReaderAvailable { entity: String },

    /// The response declared no usable content type.
    #[error("Unsupported media type: {content_type}")]
    UnsupportedMediaType { content_type: String },

    /// Status code outside 100..=599.
    #[error("Invalid HTTP status code {0}")]
    InvalidStatus(u16),

    /// A whole response was requested but the message carried no status.
    #[error("Response status missing from message context")]
    MissingStatus,

    /// Typed extraction of an already received entity failed.
    #[error("Failed to read {target} from response: {source}")]
    ClientDecode {
        target: String,
        #[source]
        source: Box<DecodeError>,
    },

    /// Reading the entity stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Body was not valid text in the declared charset.
    #[error("Invalid text entity: {0}")]
    InvalidText(String),

    #[error(transparent)]
    Decoder(BoxError),
}

impl DecodeError {
    /// Wrap an arbitrary decoder failure without altering its message.
    pub fn decoder(err: impl Into<BoxError>) -> Self {
        Self::Decoder(err.into())
    }
}

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Record {
        id: i64,
    }

    #[test]
    fn test_generic_type_falls_back_to_class() {
        let plain = EntityType::of::<Record>();
        assert_eq!(plain.generic_type(), TypeKey::of::<Record>());

        let generic = EntityType::of::<Vec<Record>>().with_generic_type(TypeKey::of::<Record>());
        assert_eq!(generic.class(), TypeKey::of::<Vec<Record>>());
        assert_eq!(generic.generic_type(), TypeKey::of::<Record>());
    }

    #[test]
    fn test_entity_downcast() {
        let entity = Entity::new(Record { id: 7 });
        assert!(entity.is::<Record>());
        assert_eq!(entity.declared_type(), TypeKey::of::<Record>());
        assert_eq!(entity.downcast_ref::<Record>(), Some(&Record { id: 7 }));

        let entity = entity.downcast::<String>().unwrap_err();
        assert_eq!(entity.downcast::<Record>().unwrap(), Record { id: 7 });
    }

    #[test]
    fn test_error_display() {
        let err = DecodeError::NoReaderAvailable {
            entity: TypeKey::of::<Record>().name().to_string(),
        };
        assert!(err.to_string().contains("Record"));

        let err = DecodeError::decoder("boom");
        assert_eq!(err.to_string(), "boom");

        let err = DecodeError::ClientDecode {
            target: "Record".into(),
            source: Box::new(DecodeError::InvalidStatus(42)),
        };
        assert!(err.to_string().contains("Invalid HTTP status code 42"));
    }
}
