pub mod constants;
pub mod filename;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
