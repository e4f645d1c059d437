//! Standard registry
//!
//! Declares every basic function into a [`RegistryBuilder`]. The process-wide
//! [`standard_registry`] is built on first use with the default configuration
//! and never changes afterwards; hosts with their own `stencil.toml` call
//! [`build_registry`] instead.

use std::sync::Arc;

use once_cell::sync::Lazy;
use stencil_plugin::{
    Capabilities, FunctionRegistry, LowerError, LowerResult, LoweringConfig, RegistryBuilder,
};
use stencil_runtime::{owner, RandomRuntime, RoutineTable, RuntimeInstances};
use stencil_types::{Signature, TypeResult};

use crate::extrema::ExtremumFunction;
use crate::null_check::NullCheck;
use crate::random::{self, RandomIntFunction};
use crate::range::RangeFunction;
use crate::rounding::RoundingFunction;

static STANDARD: Lazy<LowerResult<FunctionRegistry>> = Lazy::new(|| {
    let registry = build_registry(LoweringConfig::default(), &RoutineTable::standard());
    if let Err(err) = &registry {
        tracing::warn!(error = %err, "standard registry is unusable");
    }
    registry
});

/// The shared registry of basic functions
///
/// Fails only if the built-in declarations are inconsistent with the
/// standard routine table, and then fails the same way on every call.
pub fn standard_registry() -> LowerResult<&'static FunctionRegistry> {
    STANDARD.as_ref().map_err(Clone::clone)
}

/// Build a registry of the basic functions with a custom configuration
pub fn build_registry(
    config: LoweringConfig,
    table: &RoutineTable,
) -> LowerResult<FunctionRegistry> {
    let mut builder = FunctionRegistry::builder().with_config(config);
    register_basic_functions(&mut builder, table)?;
    Ok(builder.build())
}

/// Declare the basic functions into an existing builder
pub fn register_basic_functions(
    builder: &mut RegistryBuilder,
    table: &RoutineTable,
) -> LowerResult<()> {
    for rounding in [RoundingFunction::ceiling(table)?, RoundingFunction::floor(table)?] {
        let signature = declared(rounding.signature())?;
        builder.declare(signature, Capabilities::all(Arc::new(rounding)))?;
    }

    let range = RangeFunction::new(table)?;
    let signature = declared(range.signature())?;
    builder.declare(signature, Capabilities::all(Arc::new(range)))?;

    for check in [NullCheck::is_null(table)?, NullCheck::is_nonnull(table)?] {
        let signature = declared(check.signature())?;
        let has_generic = check.has_generic();
        let check = Arc::new(check);
        let mut capabilities = Capabilities::new()
            .with_bytecode(check.clone())
            .with_js(check.clone())
            .with_python(check.clone());
        if has_generic {
            capabilities = capabilities.with_generic(check);
        }
        builder.declare(signature, capabilities)?;
    }

    for extremum in [ExtremumFunction::max(table)?, ExtremumFunction::min(table)?] {
        let signature = declared(extremum.signature())?;
        builder.declare(signature, Capabilities::all(Arc::new(extremum)))?;
    }

    let random_int = RandomIntFunction::new(table)?;
    let signature = declared(random_int.signature())?;
    builder
        .declare(signature, Capabilities::all(Arc::new(random_int)))?
        .register_runtime(random::NAME, owner::RANDOM)?;

    Ok(())
}

/// Runtime objects the basic functions need at render time
pub fn runtime_instances(seed: u64) -> RuntimeInstances {
    RuntimeInstances::new().with(owner::RANDOM, Arc::new(RandomRuntime::seeded(seed)))
}

fn declared(signature: TypeResult<Signature>) -> LowerResult<Signature> {
    signature.map_err(|err| LowerError::configuration(err.to_string()))
}
