//! Host object protocol.
//!
//! Host values are never inspected directly. A host type becomes reachable
//! from expressions by implementing [`Helper`], which publishes a
//! [`Descriptor`]: a table of member getters and of methods with their
//! parameter metadata. Every method call is additionally gated by
//! [`Helper::allows_call`].
//!
//! # Examples
//!
//! ```
//! use eel_lang::host::{Descriptor, Helper, Param, ParamKind};
//! use eel_lang::{evaluate, Context, Value};
//!
//! struct Greeter {
//!     greeting: String,
//! }
//!
//! impl Helper for Greeter {
//!     fn descriptor() -> Descriptor<Self> {
//!         Descriptor::new("Greeter")
//!             .member("greeting", |g: &Greeter| Value::from(g.greeting.as_str()))
//!             .method(
//!                 "greet",
//!                 vec![Param::optional("name", ParamKind::String, "world")],
//!                 |g: &Greeter, args: &[Value]| {
//!                     let name = args[0].as_str().unwrap_or_default();
//!                     Ok(Value::from(format!("{}, {}!", g.greeting, name)))
//!                 },
//!             )
//!     }
//!
//!     fn allows_call(&self, method: &str) -> bool {
//!         method == "greet"
//!     }
//! }
//!
//! let context = Context::empty().with(
//!     "Greeter",
//!     Value::host(Greeter { greeting: "Hello".to_string() }),
//! );
//! let result = evaluate("Greeter.greet()", &context).unwrap();
//! assert_eq!(result, Value::from("Hello, world!"));
//! ```

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{evaluator::EvalError, value::Value};

/// Declared kind of a method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Any,
    Bool,
    Number,
    /// A number narrowed to an integer (truncated toward zero) before the call
    Integer,
    String,
    List,
    Map,
}

impl ParamKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            ParamKind::Any => true,
            ParamKind::Bool => matches!(value, Value::Bool(_)),
            ParamKind::Number | ParamKind::Integer => matches!(value, Value::Number(_)),
            ParamKind::String => matches!(value, Value::String(_)),
            ParamKind::List => matches!(value, Value::List(_)),
            ParamKind::Map => matches!(value, Value::Map(_)),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Any => "any value",
            ParamKind::Bool => "boolean",
            ParamKind::Number => "number",
            ParamKind::Integer => "integer",
            ParamKind::String => "string",
            ParamKind::List => "list",
            ParamKind::Map => "map",
        };
        f.write_str(name)
    }
}

/// Parameter metadata: name, declared kind and optional default.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: Option<Value>,
}

impl Param {
    pub fn required(name: &'static str, kind: ParamKind) -> Self {
        Param {
            name,
            kind,
            default: None,
        }
    }

    pub fn optional(name: &'static str, kind: ParamKind, default: impl Into<Value>) -> Self {
        Param {
            name,
            kind,
            default: Some(default.into()),
        }
    }
}

pub type Getter<T> = fn(&T) -> Value;

/// Receives exactly one argument per declared parameter, already bound.
pub type Invoker<T> = fn(&T, &[Value]) -> Result<Value, EvalError>;

pub struct Method<T> {
    pub params: Vec<Param>,
    invoke: Invoker<T>,
}

/// Accessor table of a host type.
pub struct Descriptor<T> {
    type_name: &'static str,
    members: IndexMap<&'static str, Getter<T>>,
    methods: IndexMap<&'static str, Method<T>>,
}

impl<T> Descriptor<T> {
    pub fn new(type_name: &'static str) -> Self {
        Descriptor {
            type_name,
            members: IndexMap::new(),
            methods: IndexMap::new(),
        }
    }

    pub fn member(mut self, name: &'static str, getter: Getter<T>) -> Self {
        self.members.insert(name, getter);
        self
    }

    pub fn method(mut self, name: &'static str, params: Vec<Param>, invoke: Invoker<T>) -> Self {
        self.methods.insert(name, Method { params, invoke });
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Contract for host types bound into a context.
pub trait Helper: Send + Sync + 'static {
    fn descriptor() -> Descriptor<Self>
    where
        Self: Sized;

    /// Capability gate consulted before every method call.
    fn allows_call(&self, method: &str) -> bool;
}

/// Type-erased view of a bound host object, as stored in [`Value::Host`].
pub trait HostObject: Send + Sync {
    fn type_name(&self) -> &str;

    fn allows_call(&self, method: &str) -> bool;

    /// Reads a member through its getter. `None` if no such member exists.
    fn get(&self, member: &str) -> Option<Value>;

    /// Parameter metadata of a method. `None` if no such method exists.
    fn params(&self, method: &str) -> Option<&[Param]>;

    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, EvalError>;
}

impl fmt::Debug for dyn HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostObject({})", self.type_name())
    }
}

/// A helper together with its descriptor.
pub struct Bound<T> {
    helper: T,
    descriptor: Descriptor<T>,
}

impl<T: Helper> Bound<T> {
    pub fn new(helper: T) -> Self {
        Bound {
            helper,
            descriptor: T::descriptor(),
        }
    }
}

impl<T: Helper> HostObject for Bound<T> {
    fn type_name(&self) -> &str {
        self.descriptor.type_name
    }

    fn allows_call(&self, method: &str) -> bool {
        self.helper.allows_call(method)
    }

    fn get(&self, member: &str) -> Option<Value> {
        self.descriptor
            .members
            .get(member)
            .map(|getter| getter(&self.helper))
    }

    fn params(&self, method: &str) -> Option<&[Param]> {
        self.descriptor
            .methods
            .get(method)
            .map(|m| m.params.as_slice())
    }

    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, EvalError> {
        match self.descriptor.methods.get(method) {
            Some(m) => (m.invoke)(&self.helper, args),
            None => Err(EvalError::UnknownMethod {
                host: self.type_name().to_string(),
                method: method.to_string(),
            }),
        }
    }
}

impl Value {
    /// Binds a helper as a host value.
    pub fn host<T: Helper>(helper: T) -> Self {
        Value::Host(Arc::new(Bound::new(helper)))
    }
}

/// Matches evaluated arguments to declared parameters.
///
/// Numbers passed to integer parameters are truncated, missing trailing
/// arguments take their defaults, and every argument must match its
/// declared kind.
pub fn bind_arguments(
    host: &str,
    method: &str,
    params: &[Param],
    args: Vec<Value>,
) -> Result<Vec<Value>, EvalError> {
    if args.len() > params.len() {
        return Err(EvalError::TooManyArguments {
            host: host.to_string(),
            method: method.to_string(),
            expected: params.len(),
            got: args.len(),
        });
    }

    let mut args = args.into_iter();
    let mut bound = Vec::with_capacity(params.len());

    for param in params {
        let value = match args.next() {
            Some(Value::Number(n)) if param.kind == ParamKind::Integer => Value::Number(n.trunc()),
            Some(value) => value,
            None => match &param.default {
                Some(default) => default.clone(),
                None => {
                    return Err(EvalError::MissingArgument {
                        host: host.to_string(),
                        method: method.to_string(),
                        param: param.name,
                    });
                }
            },
        };

        if !param.kind.accepts(&value) {
            return Err(EvalError::InvalidArgument {
                method: method.to_string(),
                message: format!(
                    "parameter '{}' expects {}, got {}",
                    param.name,
                    param.kind,
                    value.type_name()
                ),
            });
        }
        bound.push(value);
    }

    Ok(bound)
}
