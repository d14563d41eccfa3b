pub mod error;
pub mod generation;

pub use error::{
    BizError, ErrorCategory, ErrorClassifier, LlmError, Result, ValidationError,
    ValidationErrorKind,
};
pub use generation::{
    Assumptions, CircleType, Generated, ImageInputs, ImageSet, ImageSettings, Intent,
    LeapOfFaithInputs, MomTestInputs, MomTestQuestion, MomTestSheet, ProviderImage,
};
