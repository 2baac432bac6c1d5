//! The seam between the pipeline and the app's domain result types.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::context::{FallbackContext, OperationKind};

/// Fields of a partially decoded response object.
pub type PartialFields = Map<String, Value>;

/// A domain result type the pipeline can decode into.
///
/// The pipeline knows nothing about result shapes beyond this trait: the
/// canonical field set for coverage checks, a hand-authored degraded
/// default, and an optional hook for synthesizing missing mandatory
/// fields from a partial decode.
pub trait ParseTarget: DeserializeOwned + Serialize + Sized {
    /// Short type tag used in errors and logs.
    const NAME: &'static str;

    /// The operation this type is the result of.
    fn operation_kind() -> OperationKind;

    /// Canonical keys a partial object must carry to count as covering
    /// the type.
    fn mandatory_fields() -> &'static [&'static str];

    /// Fixed degraded instance with user-legible copy.
    ///
    /// `None` opts the type out of the use-default-values rung. The copy
    /// must read as an unavailability notice, never as a plausible real
    /// answer.
    fn degraded_default() -> Option<Self>;

    /// Synthesize a value from a partially decoded object.
    ///
    /// Called on the intelligent-inference rung with whatever fields
    /// survived decoding. Implementations must be deterministic: the same
    /// fields always produce the same value. The default declines.
    fn infer_from_partial(_fields: &PartialFields, _ctx: &FallbackContext) -> Option<Self> {
        None
    }
}
