pub mod codes;
pub mod validate;
