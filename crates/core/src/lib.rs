pub mod catalog;
pub mod console;
pub mod error;
pub mod form;
pub mod input;
pub mod resolver;
pub mod similarity;
pub mod validation;

pub use catalog::*;
pub use console::*;
pub use error::*;
pub use form::*;
pub use input::*;
pub use resolver::*;
pub use validation::*;
