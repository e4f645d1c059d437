//! Routine Table
//!
//! Helper routines are registered once at startup under an owner name, a
//! routine name and the exact parameter representations, and are looked up
//! the same way. The table never changes after `build()`, so a resolved
//! [`Routine`] can be shared by every compilation.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::basic;
use crate::error::{RuntimeError, RuntimeResult};
use crate::random::RandomRuntime;
use crate::slot::{Repr, Slot};
use crate::value::Value;

// ============================================================================
// Owner names
// ============================================================================

/// Owner names of the standard routines
pub mod owner {
    /// Native floating point math
    pub const MATH: &str = "Math";
    /// Portable helpers for the basic function library
    pub const BASIC: &str = "BasicRuntime";
    /// Seedable random source (instance routines)
    pub const RANDOM: &str = "RandomRuntime";
}

/// A registered runtime object, the receiver of instance routines
pub type RuntimeObject = Arc<dyn Any + Send + Sync>;

/// Entry point of a static routine
pub type StaticEntry = fn(&[Slot]) -> RuntimeResult<Slot>;

/// Entry point of an instance routine
pub type InstanceEntry = fn(&(dyn Any + Send + Sync), &[Slot]) -> RuntimeResult<Slot>;

/// How a routine is invoked
#[derive(Clone, Copy)]
pub enum RoutineKind {
    /// Free function
    Static(StaticEntry),
    /// Method on a registered runtime object
    Instance(InstanceEntry),
}

/// A resolved helper routine
pub struct Routine {
    owner: String,
    name: String,
    params: Vec<Repr>,
    ret: Repr,
    kind: RoutineKind,
}

impl Routine {
    /// Owning class/module name
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Routine name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter representations
    pub fn params(&self) -> &[Repr] {
        &self.params
    }

    /// Return representation
    pub fn ret(&self) -> Repr {
        self.ret
    }

    /// Does this routine need a runtime object?
    pub fn is_instance(&self) -> bool {
        matches!(self.kind, RoutineKind::Instance(_))
    }

    /// Call the routine
    ///
    /// `receiver` is only consulted for instance routines.
    pub fn invoke(
        &self,
        receiver: Option<&(dyn Any + Send + Sync)>,
        args: &[Slot],
    ) -> RuntimeResult<Slot> {
        if args.len() != self.params.len() {
            return Err(RuntimeError::ArgumentCount {
                routine: self.to_string(),
                expected: self.params.len(),
                actual: args.len(),
            });
        }
        match self.kind {
            RoutineKind::Static(entry) => entry(args),
            RoutineKind::Instance(entry) => {
                let receiver = receiver.ok_or_else(|| RuntimeError::MissingReceiver {
                    owner: self.owner.clone(),
                })?;
                entry(receiver, args)
            }
        }
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.owner, self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ") -> {}", self.ret)
    }
}

impl fmt::Debug for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Routine({})", self)
    }
}

// ============================================================================
// Table
// ============================================================================

/// Immutable lookup table of helper routines
#[derive(Debug, Default)]
pub struct RoutineTable {
    /// (owner, name) → overloads by parameter list
    routines: FxHashMap<(String, String), Vec<Arc<Routine>>>,
}

impl RoutineTable {
    /// Start an empty table
    pub fn builder() -> RoutineTableBuilder {
        RoutineTableBuilder::default()
    }

    /// The routines behind the basic function library
    pub fn standard() -> Self {
        let mut builder = Self::builder();
        register_standard(&mut builder);
        builder.build()
    }

    /// Find the routine with exactly these parameter representations
    pub fn lookup(&self, owner: &str, name: &str, params: &[Repr]) -> Option<Arc<Routine>> {
        self.routines
            .get(&(owner.to_string(), name.to_string()))?
            .iter()
            .find(|r| r.params == params)
            .cloned()
    }

    /// Is anything registered under this owner?
    pub fn has_owner(&self, owner: &str) -> bool {
        self.routines.keys().any(|(o, _)| o == owner)
    }

    /// Number of registered routines
    pub fn len(&self) -> usize {
        self.routines.values().map(Vec::len).sum()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}

/// Collects routines before the table is frozen
#[derive(Default)]
pub struct RoutineTableBuilder {
    routines: FxHashMap<(String, String), Vec<Arc<Routine>>>,
    first_error: Option<RuntimeError>,
}

impl RoutineTableBuilder {
    /// Register a free function
    pub fn register_static(
        &mut self,
        owner: &str,
        name: &str,
        params: &[Repr],
        ret: Repr,
        entry: StaticEntry,
    ) -> &mut Self {
        self.insert(owner, name, params, ret, RoutineKind::Static(entry))
    }

    /// Register a method on a runtime object
    pub fn register_instance(
        &mut self,
        owner: &str,
        name: &str,
        params: &[Repr],
        ret: Repr,
        entry: InstanceEntry,
    ) -> &mut Self {
        self.insert(owner, name, params, ret, RoutineKind::Instance(entry))
    }

    fn insert(
        &mut self,
        owner: &str,
        name: &str,
        params: &[Repr],
        ret: Repr,
        kind: RoutineKind,
    ) -> &mut Self {
        let overloads = self
            .routines
            .entry((owner.to_string(), name.to_string()))
            .or_default();
        if overloads.iter().any(|r| r.params == params) {
            self.first_error.get_or_insert(RuntimeError::DuplicateRoutine {
                owner: owner.to_string(),
                name: name.to_string(),
            });
            return self;
        }
        overloads.push(Arc::new(Routine {
            owner: owner.to_string(),
            name: name.to_string(),
            params: params.to_vec(),
            ret,
            kind,
        }));
        self
    }

    /// Freeze the table, failing if any registration collided
    pub fn try_build(self) -> RuntimeResult<RoutineTable> {
        if let Some(err) = self.first_error {
            return Err(err);
        }
        tracing::debug!(routines = self.routines.len(), "routine table built");
        Ok(RoutineTable {
            routines: self.routines,
        })
    }

    /// Freeze the table, keeping the first registration on collisions
    pub fn build(self) -> RoutineTable {
        if let Some(err) = &self.first_error {
            tracing::warn!(error = %err, "ignoring duplicate routine registration");
        }
        RoutineTable {
            routines: self.routines,
        }
    }
}

// ============================================================================
// Runtime objects
// ============================================================================

/// Runtime objects available to instance routines, keyed by owner
#[derive(Clone, Default)]
pub struct RuntimeInstances {
    by_owner: FxHashMap<String, RuntimeObject>,
}

impl RuntimeInstances {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the object that receives `owner`'s instance routines
    pub fn insert(&mut self, owner: impl Into<String>, object: RuntimeObject) {
        self.by_owner.insert(owner.into(), object);
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, owner: impl Into<String>, object: RuntimeObject) -> Self {
        self.insert(owner, object);
        self
    }

    /// The object registered for `owner`
    pub fn get(&self, owner: &str) -> Option<&(dyn Any + Send + Sync)> {
        self.by_owner.get(owner).map(|o| &**o)
    }
}

// ============================================================================
// Standard routines
// ============================================================================

fn register_standard(builder: &mut RoutineTableBuilder) {
    use owner::{BASIC, MATH, RANDOM};
    use Repr::{Bool, Boxed, Float64, Int64};

    builder
        .register_static(MATH, "ceil", &[Float64], Float64, |args| {
            Ok(Slot::Float64(args[0].as_f64()?.ceil()))
        })
        .register_static(MATH, "floor", &[Float64], Float64, |args| {
            Ok(Slot::Float64(args[0].as_f64()?.floor()))
        })
        .register_static(BASIC, "ceil", &[Boxed], Boxed, |args| {
            Ok(Slot::Boxed(basic::ceil(&boxed(&args[0]))?))
        })
        .register_static(BASIC, "floor", &[Boxed], Boxed, |args| {
            Ok(Slot::Boxed(basic::floor(&boxed(&args[0]))?))
        })
        .register_static(BASIC, "range", &[Int64], Boxed, |args| {
            Ok(Slot::Boxed(basic::range_to(args[0].as_i64()?)?))
        })
        .register_static(BASIC, "range", &[Int64, Int64], Boxed, |args| {
            Ok(Slot::Boxed(basic::range_between(
                args[0].as_i64()?,
                args[1].as_i64()?,
            )?))
        })
        .register_static(BASIC, "range", &[Int64, Int64, Int64], Boxed, |args| {
            Ok(Slot::Boxed(basic::range(
                args[0].as_i64()?,
                args[1].as_i64()?,
                args[2].as_i64()?,
            )?))
        })
        .register_static(BASIC, "max", &[Boxed, Boxed], Boxed, |args| {
            Ok(Slot::Boxed(basic::max(&boxed(&args[0]), &boxed(&args[1]))?))
        })
        .register_static(BASIC, "min", &[Boxed, Boxed], Boxed, |args| {
            Ok(Slot::Boxed(basic::min(&boxed(&args[0]), &boxed(&args[1]))?))
        })
        .register_static(BASIC, "isNull", &[Boxed], Bool, |args| {
            Ok(Slot::Bool(basic::is_null(&boxed(&args[0]))))
        })
        .register_instance(RANDOM, "randomInt", &[Int64], Int64, |receiver, args| {
            let runtime = receiver.downcast_ref::<RandomRuntime>().ok_or_else(|| {
                RuntimeError::MissingReceiver {
                    owner: RANDOM.to_string(),
                }
            })?;
            Ok(Slot::Int64(runtime.random_int(args[0].as_i64()?)?))
        });
}

fn boxed(slot: &Slot) -> Value {
    slot.clone().into_value()
}
