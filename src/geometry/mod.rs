//! Target formations
//!
//! Pure point samplers for the two shapes every entity moves between: a
//! conical tree and a scattered spherical shell. Only the marginal
//! distributions matter, not the exact random sequence.

mod shapes;

pub use shapes::{random_direction, scatter_position, tree_position, tree_shell_position};
