pub mod error;
pub mod loader;
pub mod model_tree;
pub mod object_model_index;
pub mod sharing;
