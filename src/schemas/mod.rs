pub mod signup_schema;

pub use signup_schema::{NormalizedSignupInput, RawSignupInput, SignupResponseSchema};
