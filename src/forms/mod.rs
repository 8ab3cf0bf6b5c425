pub mod contact;
pub mod signup;
pub mod validation;
