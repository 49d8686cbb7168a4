//! Runtime value type for trait operations
//!
//! `RuntimeValue` is the unified representation of every argument passed to,
//! and every result returned from, an operation provided by a trait or
//! defined directly on an entity type.
//! - Scalars and strings are stored inline or behind `Arc<str>`
//! - Lists are shared and mutable (`Arc<RwLock<Vec<_>>>`), so an operation can
//!   append to a list owned by its caller
//! - Instances are receiver handles compared by identity

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::compose::{TraitError, TraitResult};
use crate::host::Instance;

/// Shared, mutable list storage
pub type ListRef = Arc<RwLock<Vec<RuntimeValue>>>;

/// Value type enumeration for type queries and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Unit,
    Bool,
    Int,
    Float,
    String,
    List,
    Instance,
}

impl ValueType {
    /// Human readable type name
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Unit => "unit",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Instance => "instance",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime value - everything an operation can receive or return
#[derive(Clone, Default)]
pub enum RuntimeValue {
    /// Empty value
    #[default]
    Unit,

    /// Boolean
    Bool(bool),

    /// Integer
    Int(i64),

    /// Float
    Float(f64),

    /// String (shared string, Arc<str>)
    String(Arc<str>),

    /// Shared mutable list
    List(ListRef),

    /// Receiver handle of an entity type instance
    Instance(Instance),
}

// ============================================================================
// Constructors
// ============================================================================

impl RuntimeValue {
    /// Create a string value
    pub fn str(s: impl AsRef<str>) -> Self {
        RuntimeValue::String(Arc::from(s.as_ref()))
    }

    /// Create a list value from its elements
    pub fn list(items: Vec<RuntimeValue>) -> Self {
        RuntimeValue::List(Arc::new(RwLock::new(items)))
    }

    /// Create an empty list value
    pub fn empty_list() -> Self {
        Self::list(Vec::new())
    }
}

// ============================================================================
// Type Query Methods
// ============================================================================

impl RuntimeValue {
    /// Get the type of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            RuntimeValue::Unit => ValueType::Unit,
            RuntimeValue::Bool(_) => ValueType::Bool,
            RuntimeValue::Int(_) => ValueType::Int,
            RuntimeValue::Float(_) => ValueType::Float,
            RuntimeValue::String(_) => ValueType::String,
            RuntimeValue::List(_) => ValueType::List,
            RuntimeValue::Instance(_) => ValueType::Instance,
        }
    }

    /// Type name, shortcut for `value_type().name()`
    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, RuntimeValue::Unit)
    }

    /// Convert to bool
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            RuntimeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to i64
    pub fn to_int(&self) -> Option<i64> {
        match self {
            RuntimeValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to f64
    pub fn to_float(&self) -> Option<f64> {
        match self {
            RuntimeValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Borrow the string contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RuntimeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the shared list storage
    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            RuntimeValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Get the instance handle
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            RuntimeValue::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Snapshot of the list elements
    pub fn list_items(&self) -> Option<Vec<RuntimeValue>> {
        self.as_list().map(|list| list.read().clone())
    }
}

// ============================================================================
// Checked accessors (errors surface as `TraitError::TypeError`)
// ============================================================================

impl RuntimeValue {
    /// Expect an integer
    pub fn expect_int(&self) -> TraitResult<i64> {
        self.to_int()
            .ok_or_else(|| TraitError::type_error(ValueType::Int, self))
    }

    /// Expect a string
    pub fn expect_str(&self) -> TraitResult<&str> {
        self.as_str()
            .ok_or_else(|| TraitError::type_error(ValueType::String, self))
    }

    /// Expect a list
    pub fn expect_list(&self) -> TraitResult<&ListRef> {
        self.as_list()
            .ok_or_else(|| TraitError::type_error(ValueType::List, self))
    }

    /// Expect an instance
    pub fn expect_instance(&self) -> TraitResult<&Instance> {
        self.as_instance()
            .ok_or_else(|| TraitError::type_error(ValueType::Instance, self))
    }

    /// Append to a list value in place
    pub fn push(
        &self,
        item: RuntimeValue,
    ) -> TraitResult<()> {
        self.expect_list()?.write().push(item);
        Ok(())
    }
}

/// Check the number of positional arguments an operation received
pub fn expect_arity(
    operation: &str,
    args: &[RuntimeValue],
    expected: usize,
) -> TraitResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(TraitError::Arity {
            name: operation.into(),
            expected,
            found: args.len(),
        })
    }
}

// ============================================================================
// Equality
// ============================================================================

impl PartialEq for RuntimeValue {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        match (self, other) {
            (RuntimeValue::Unit, RuntimeValue::Unit) => true,
            (RuntimeValue::Bool(a), RuntimeValue::Bool(b)) => a == b,
            (RuntimeValue::Int(a), RuntimeValue::Int(b)) => a == b,
            (RuntimeValue::Float(a), RuntimeValue::Float(b)) => a == b,
            (RuntimeValue::String(a), RuntimeValue::String(b)) => a == b,
            (RuntimeValue::List(a), RuntimeValue::List(b)) => {
                Arc::ptr_eq(a, b) || *a.read() == *b.read()
            }
            // Instances compare by identity
            (RuntimeValue::Instance(a), RuntimeValue::Instance(b)) => a == b,
            _ => false,
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<()> for RuntimeValue {
    fn from(_: ()) -> Self {
        RuntimeValue::Unit
    }
}

impl From<bool> for RuntimeValue {
    fn from(b: bool) -> Self {
        RuntimeValue::Bool(b)
    }
}

impl From<i64> for RuntimeValue {
    fn from(i: i64) -> Self {
        RuntimeValue::Int(i)
    }
}

impl From<f64> for RuntimeValue {
    fn from(f: f64) -> Self {
        RuntimeValue::Float(f)
    }
}

impl From<&str> for RuntimeValue {
    fn from(s: &str) -> Self {
        RuntimeValue::String(Arc::from(s))
    }
}

impl From<String> for RuntimeValue {
    fn from(s: String) -> Self {
        RuntimeValue::String(Arc::from(s))
    }
}

impl From<Instance> for RuntimeValue {
    fn from(instance: Instance) -> Self {
        RuntimeValue::Instance(instance)
    }
}

impl From<Vec<RuntimeValue>> for RuntimeValue {
    fn from(items: Vec<RuntimeValue>) -> Self {
        RuntimeValue::list(items)
    }
}

// ============================================================================
// Formatting
// ============================================================================

impl fmt::Debug for RuntimeValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            RuntimeValue::Unit => write!(f, "Unit"),
            RuntimeValue::Bool(b) => write!(f, "Bool({})", b),
            RuntimeValue::Int(i) => write!(f, "Int({})", i),
            RuntimeValue::Float(x) => write!(f, "Float({})", x),
            RuntimeValue::String(s) => write!(f, "String({:?})", s),
            RuntimeValue::List(list) => f.debug_list().entries(list.read().iter()).finish(),
            RuntimeValue::Instance(instance) => write!(f, "{:?}", instance),
        }
    }
}

impl fmt::Display for RuntimeValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            RuntimeValue::Unit => write!(f, "()"),
            RuntimeValue::Bool(b) => write!(f, "{}", b),
            RuntimeValue::Int(i) => write!(f, "{}", i),
            RuntimeValue::Float(x) => write!(f, "{}", x),
            RuntimeValue::String(s) => write!(f, "{}", s),
            RuntimeValue::List(list) => {
                write!(f, "[")?;
                for (i, item) in list.read().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            RuntimeValue::Instance(instance) => write!(f, "{}", instance),
        }
    }
}
