use std::borrow::Cow;

use tracing::debug;

use crate::{
    evaluator::EvalError,
    host::bind_arguments,
    value::{Map, Value, format_number},
};

/// Key of a member lookup or offset access.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Key<'k> {
    Name(&'k str),
    Number(f64),
}

impl<'k> Key<'k> {
    /// Coerces an evaluated offset to a key: strings and numbers only.
    pub fn from_value(value: &'k Value) -> Result<Self, EvalError> {
        match value {
            Value::String(s) => Ok(Key::Name(s)),
            Value::Number(n) => Ok(Key::Number(*n)),
            other => Err(EvalError::InvalidKey(other.type_name())),
        }
    }

    fn to_name(self) -> Cow<'k, str> {
        match self {
            Key::Name(name) => Cow::Borrowed(name),
            Key::Number(n) => Cow::Owned(format_number(n)),
        }
    }

    fn to_index(self) -> Option<usize> {
        match self {
            Key::Name(name) => name.parse::<usize>().ok(),
            Key::Number(n) if n.is_finite() && n >= 0.0 => Some(n.trunc() as usize),
            Key::Number(_) => None,
        }
    }
}

/// Wrapper around exactly one value; the root of path resolution.
///
/// Sub-contexts produced by [`Context::get`] borrow from their parent when
/// possible, so walking a path never copies the tree it walks through.
///
/// # Examples
///
/// ```
/// use eel_lang::{Context, Value};
/// use eel_lang::context::Key;
///
/// let context = Context::empty()
///     .with("variable", "foo")
///     .with("list", Value::List(vec![Value::Number(1.0)]));
///
/// let first = context.reborrow().get(Key::Name("list")).unwrap().get(Key::Number(0.0)).unwrap();
/// assert_eq!(first.unwrap(), Value::Number(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct Context<'a> {
    value: Cow<'a, Value>,
}

impl Context<'static> {
    pub fn new(value: Value) -> Self {
        Context {
            value: Cow::Owned(value),
        }
    }

    /// A context over an empty map.
    pub fn empty() -> Self {
        Context::new(Value::Map(Map::new()))
    }
}

impl<'a> Context<'a> {
    pub fn from_ref(value: &'a Value) -> Self {
        Context {
            value: Cow::Borrowed(value),
        }
    }

    /// Binds `name` on the root map. A non-map root is replaced by a map.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let root = self.value.to_mut();
        if !matches!(root, Value::Map(_)) {
            *root = Value::Map(Map::new());
        }
        if let Value::Map(map) = root {
            map.insert(name.into(), value.into());
        }
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// A context borrowing this one's value.
    pub fn reborrow(&self) -> Context<'_> {
        Context::from_ref(&self.value)
    }

    /// Copies the wrapped value out.
    pub fn unwrap(&self) -> Value {
        self.value.as_ref().clone()
    }

    pub fn into_value(self) -> Value {
        self.value.into_owned()
    }

    /// Member or offset lookup.
    ///
    /// Maps are looked up by key, lists by non-negative index, host objects
    /// through their member getters. A missing entry or a null receiver gives
    /// a null context; scalars cannot be navigated.
    pub fn get(self, key: Key<'_>) -> Result<Context<'a>, EvalError> {
        let found = match self.value {
            Cow::Borrowed(value) => lookup(value, key)?,
            Cow::Owned(value) => lookup(&value, key)?.map(|v| Cow::Owned(v.into_owned())),
        };
        Ok(Context {
            value: found.unwrap_or(Cow::Owned(Value::Null)),
        })
    }

    /// Calls `method` on the wrapped host object with evaluated arguments.
    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Context<'static>, EvalError> {
        let host = match self.value() {
            Value::Null => return Ok(Context::new(Value::Null)),
            Value::Host(host) => host,
            other => {
                return Err(EvalError::NotCallable {
                    method: method.to_string(),
                    type_name: other.type_name(),
                });
            }
        };

        if !host.allows_call(method) {
            return Err(EvalError::MethodNotAllowed {
                host: host.type_name().to_string(),
                method: method.to_string(),
            });
        }
        let params = host.params(method).ok_or_else(|| EvalError::UnknownMethod {
            host: host.type_name().to_string(),
            method: method.to_string(),
        })?;

        let args = bind_arguments(host.type_name(), method, params, args)?;
        debug!(host = host.type_name(), method, args = args.len(), "calling host method");
        host.invoke(method, &args).map(Context::new)
    }
}

fn lookup<'v>(value: &'v Value, key: Key<'_>) -> Result<Option<Cow<'v, Value>>, EvalError> {
    match value {
        Value::Null => Ok(None),
        Value::Map(map) => Ok(map.get(&*key.to_name()).map(Cow::Borrowed)),
        Value::List(items) => Ok(key
            .to_index()
            .and_then(|index| items.get(index))
            .map(Cow::Borrowed)),
        Value::Host(host) => Ok(host.get(&key.to_name()).map(Cow::Owned)),
        scalar => Err(EvalError::NotNavigable {
            member: key.to_name().into_owned(),
            type_name: scalar.type_name(),
        }),
    }
}

impl From<Value> for Context<'static> {
    fn from(value: Value) -> Self {
        Context::new(value)
    }
}

impl FromIterator<(String, Value)> for Context<'static> {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Context::new(Value::Map(iter.into_iter().collect()))
    }
}
