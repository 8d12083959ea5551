#[macro_use]
pub mod test_utils;
