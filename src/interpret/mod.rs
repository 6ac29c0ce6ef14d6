mod environment;
mod error;
mod interpreter;
mod output;
mod prelude;
mod value;

pub use environment::Environment;
pub use error::RuntimeError;
pub use interpreter::Interpreter;
pub use output::{Output, WriterOutput};
pub use value::{Callable, Function, NativeFn, Value};
