//! Form domain layer
//!
//! Schema definitions, the per-kind field renderer, the answer set and the
//! session that ties them together while a form is open.

mod answers;
mod field;
mod form_state;
mod registry;

pub use answers::AnswerSet;
pub use field::{AnswerValue, FieldDescriptor, FieldEdit, FieldKind, RenderedField, RenderedInput};
pub use form_state::{Form, FormButton, FormSession, LoginForm};
pub use registry::{CatalogEntry, FormDefinition, FormSchemaRegistry};
