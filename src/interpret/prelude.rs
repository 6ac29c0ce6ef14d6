use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;

use crate::interpret::{
    environment::Environment,
    error::RuntimeError,
    interpreter::Interpreter,
    value::{Callable, NativeFn, Value},
};

const NATIVES: &[NativeFn] = &[
    NativeFn {
        name: "clock",
        arity: 0,
        body: clock_fn,
    },
    NativeFn {
        name: "write",
        arity: 1,
        body: write_fn,
    },
    NativeFn {
        name: "writeLine",
        arity: 1,
        body: write_line_fn,
    },
];

/// Binds every native function in `env`.
pub fn install(env: &mut Environment) {
    for native in NATIVES {
        env.define_builtin(native.name, Value::Callable(Callable::Native(*native)));
    }
}

/// Milliseconds since the Unix epoch.
fn clock_fn(_: &mut Interpreter, _: Vec<Value>) -> Result<Value, RuntimeError> {
    let millis = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as f64,
        Err(err) => {
            warn!("system clock is set before the Unix epoch: {}", err);
            0.0
        }
    };
    Ok(Value::Number(millis))
}

fn write_fn(itp: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let mut output = itp.get_output();
    for value in args {
        output.write(&value.to_string());
    }
    Ok(Value::Null)
}

fn write_line_fn(itp: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let text: String = args.iter().map(Value::to_string).collect();
    itp.get_output().write_line(&text);
    Ok(Value::Null)
}
