pub mod algebra;
pub mod ideal;
pub mod lattice;
pub mod order;

pub use algebra::{Quaternion, QuaternionAlgebra};
pub use ideal::{Ideal, connecting_ideal, ideal_product, left_ideal};
pub use order::Order;
