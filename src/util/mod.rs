pub mod fmt;
pub mod result;
pub mod sealed;

#[cfg(test)]
pub mod leak;
