pub mod arithmetic;
pub mod cornacchia;
pub mod gf_matrix;
pub mod random;
pub mod test_utils;
