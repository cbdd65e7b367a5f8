//! # itemform
//!
//! Request-time validation for the item add/edit forms.
//!
//! Every rule runs on every call and each violation is collected into an
//! [`ErrorBag`], attached to a field or to the whole object. Each violation
//! carries an ordered list of message codes, from most to least specific,
//! for a message catalog to try in turn. The user's raw input is kept so the
//! form can be redisplayed as typed.
//!
//! ## Example
//!
//! ```rust
//! use itemform::{ConstraintGroup, FormData, FromForm, Item, ValidationDispatcher};
//!
//! let dispatcher = ValidationDispatcher::for_items().unwrap();
//! let form = FormData::from_pairs([("itemName", "pen"), ("price", "100"), ("quantity", "1")]);
//!
//! let bound = Item::bind(&form, dispatcher.resolver()).unwrap();
//! let bound = dispatcher.validate_bound(bound, ConstraintGroup::Create).unwrap();
//!
//! assert!(bound.has_errors());
//! assert_eq!(
//!     bound.errors.field_error("price").unwrap().codes,
//!     vec!["range.item.price", "range.price", "range.i32", "range"],
//! );
//! ```

pub mod binding;
pub mod codes;
pub mod config;
pub mod constraints;
pub mod dispatcher;
pub mod error;
pub mod errors;
pub mod form_context;
pub mod item;
pub mod messages;
pub mod target;
pub mod validator;
pub mod value;

pub use binding::{Bound, FormData, FromForm};
pub use codes::{CodeFormat, MessageCodesResolver};
pub use config::Config;
pub use constraints::{Constraint, ConstraintGroup, ConstraintSet, FieldCheck};
pub use dispatcher::ValidationDispatcher;
pub use error::EngineError;
pub use errors::{ErrorBag, FieldError, ObjectError, Violation, ViolationKind};
pub use form_context::FormContext;
pub use item::{item_constraints, Item, ItemBounds};
pub use messages::Messages;
pub use target::{FieldType, Target};
pub use validator::{ItemValidator, Validator};
pub use value::Value;
