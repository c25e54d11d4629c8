//! Bundled host helpers.
//!
//! Two helpers ship with the crate: [`StringHelper`] for text manipulation
//! and [`ArrayHelper`] for lists. Neither is bound automatically; use
//! [`install`] or bind them by hand under names of your choosing.

mod array;
mod string;

pub use array::ArrayHelper;
pub use string::StringHelper;

use crate::{context::Context, value::Value};

/// Binds the bundled helpers as `String` and `Array` on the context root.
///
/// # Examples
///
/// ```
/// use eel_lang::{evaluate, helpers, Context, Value};
///
/// let context = helpers::install(Context::empty());
/// let result = evaluate("String.substr('something', 2, 3)", &context).unwrap();
/// assert_eq!(result, Value::from("met"));
/// ```
pub fn install(context: Context<'_>) -> Context<'_> {
    context
        .with("String", Value::host(StringHelper))
        .with("Array", Value::host(ArrayHelper))
}

/// Bound string argument. Arguments are kind-checked before a helper
/// method runs, so anything else reads as empty.
fn text(args: &[Value], index: usize) -> &str {
    args.get(index).and_then(Value::as_str).unwrap_or_default()
}

fn integer(args: &[Value], index: usize) -> i64 {
    match args.get(index) {
        Some(Value::Number(n)) => *n as i64,
        _ => 0,
    }
}

fn list(args: &[Value], index: usize) -> &[Value] {
    args.get(index).and_then(Value::as_list).unwrap_or_default()
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Null)
}
