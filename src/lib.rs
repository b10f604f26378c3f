#![allow(non_snake_case)]

pub mod error;
pub mod klpt;
pub mod quaternion;
pub mod utilities;
