//! Runtime execution for PlusPlus programs by walking the syntax tree

mod evaluator;
mod store;

pub use evaluator::{literal_value, Evaluator};
pub use store::VariableStore;
