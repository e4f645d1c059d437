//! Function registry
//!
//! Built once at startup by folding every plugin's signature and
//! capabilities into a name-indexed map, then frozen. Lookups take `&self`
//! only, so a registry behind an `Arc` (or a `static`) is shared by any number
//! of concurrent compilations without locking.

use rustc_hash::FxHashMap;
use stencil_types::{Overload, SemanticType, Signature, TypeError};

use crate::capability::Capabilities;
use crate::config::LoweringConfig;
use crate::error::{LowerError, LowerResult};

/// Everything registered for one function
#[derive(Debug, Clone)]
pub struct FunctionEntry {
    signature: Signature,
    capabilities: Capabilities,
    runtimes: Vec<String>,
}

impl FunctionEntry {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Owners of the runtime objects this function's instance routines use
    pub fn runtimes(&self) -> &[String] {
        &self.runtimes
    }
}

/// Immutable name → function map
#[derive(Debug)]
pub struct FunctionRegistry {
    functions: FxHashMap<String, FunctionEntry>,
    config: LoweringConfig,
}

impl FunctionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Look up a function by name
    pub fn resolve(&self, name: &str) -> LowerResult<&FunctionEntry> {
        self.functions
            .get(name)
            .ok_or_else(|| LowerError::UnknownFunction {
                name: name.to_string(),
            })
    }

    pub fn signature(&self, name: &str) -> LowerResult<&Signature> {
        Ok(self.resolve(name)?.signature())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered function names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn config(&self) -> &LoweringConfig {
        &self.config
    }
}

/// Select the overload for a call and check its argument types
///
/// Must succeed before any capability is invoked for the call.
pub fn validate_call<'s>(
    signature: &'s Signature,
    arg_types: &[SemanticType],
) -> LowerResult<&'s Overload> {
    let overload = signature
        .overload_for_arity(arg_types.len())
        .ok_or_else(|| LowerError::ArityMismatch {
            name: signature.name().to_string(),
            expected: describe_arities(&signature.arities()),
            actual: arg_types.len(),
        })?;

    overload.check_arguments(arg_types).map_err(|err| match err {
        TypeError::Mismatch {
            index,
            expected,
            actual,
        } => LowerError::TypeMismatch {
            name: signature.name().to_string(),
            index,
            expected,
            actual,
        },
        other => LowerError::internal(format!(
            "overload for arity {} rejected its own arity: {}",
            arg_types.len(),
            other
        )),
    })?;

    Ok(overload)
}

/// `1`, `1 or 2`, `1, 2 or 3`
fn describe_arities(arities: &[usize]) -> String {
    match arities.split_last() {
        None => "none".to_string(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => {
            let rest: Vec<String> = rest.iter().map(usize::to_string).collect();
            format!("{} or {}", rest.join(", "), last)
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Collects declarations during startup
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    functions: FxHashMap<String, FunctionEntry>,
    config: LoweringConfig,
}

impl RegistryBuilder {
    /// Use `config` instead of the defaults
    pub fn with_config(mut self, config: LoweringConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a function
    pub fn declare(
        &mut self,
        signature: Signature,
        capabilities: Capabilities,
    ) -> LowerResult<&mut Self> {
        let name = signature.name().to_string();
        if self.functions.contains_key(&name) {
            return Err(LowerError::DuplicateFunction { name });
        }
        if capabilities.is_empty() {
            tracing::warn!(function = %name, "function declared without any backend capability");
        }
        tracing::debug!(
            function = %name,
            backends = ?capabilities.supported(),
            "declared function"
        );
        self.functions.insert(
            name,
            FunctionEntry {
                signature,
                capabilities,
                runtimes: Vec::new(),
            },
        );
        Ok(self)
    }

    /// Allow `function`'s instance routines to target the runtime object
    /// registered under `owner`
    pub fn register_runtime(&mut self, function: &str, owner: &str) -> LowerResult<&mut Self> {
        let entry = self.functions.get_mut(function).ok_or_else(|| {
            LowerError::configuration(format!(
                "cannot register runtime {} for undeclared function '{}'",
                owner, function
            ))
        })?;
        if !entry.runtimes.iter().any(|r| r == owner) {
            entry.runtimes.push(owner.to_string());
        }
        Ok(self)
    }

    /// Freeze the registry
    pub fn build(self) -> FunctionRegistry {
        tracing::debug!(functions = self.functions.len(), "function registry built");
        FunctionRegistry {
            functions: self.functions,
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_types::Purity;

    fn signature(name: &str, arities: &[usize]) -> Signature {
        let overloads = arities
            .iter()
            .map(|n| Overload::new(vec![SemanticType::Number; *n], SemanticType::Int))
            .collect();
        Signature::new(name, overloads, Purity::Pure).unwrap()
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut builder = FunctionRegistry::builder();
        builder
            .declare(signature("f", &[1]), Capabilities::new())
            .unwrap();
        assert_eq!(
            builder
                .declare(signature("f", &[2]), Capabilities::new())
                .unwrap_err(),
            LowerError::DuplicateFunction {
                name: "f".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = FunctionRegistry::builder().build();
        assert!(matches!(
            registry.resolve("nope"),
            Err(LowerError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_validate_call_arity() {
        let sig = signature("range", &[1, 2, 3]);
        let err = validate_call(&sig, &vec![SemanticType::Int; 4]).unwrap_err();
        assert_eq!(
            err,
            LowerError::ArityMismatch {
                name: "range".to_string(),
                expected: "1, 2 or 3".to_string(),
                actual: 4
            }
        );
        let overload = validate_call(&sig, &[SemanticType::Int, SemanticType::Float]).unwrap();
        assert_eq!(overload.arity(), 2);
    }

    #[test]
    fn test_validate_call_types() {
        let sig = signature("ceiling", &[1]);
        assert_eq!(
            validate_call(&sig, &[SemanticType::String]),
            Err(LowerError::TypeMismatch {
                name: "ceiling".to_string(),
                index: 0,
                expected: "number".to_string(),
                actual: "string".to_string()
            })
        );
        assert!(validate_call(&sig, &[SemanticType::Unknown]).is_ok());
    }

    #[test]
    fn test_register_runtime() {
        let mut builder = FunctionRegistry::builder();
        builder
            .declare(signature("randomInt", &[1]), Capabilities::new())
            .unwrap()
            .register_runtime("randomInt", "RandomRuntime")
            .unwrap();
        assert!(builder.register_runtime("missing", "RandomRuntime").is_err());

        let registry = builder.build();
        assert_eq!(
            registry.resolve("randomInt").unwrap().runtimes(),
            &["RandomRuntime".to_string()]
        );
        assert_eq!(registry.names(), vec!["randomInt"]);
    }

    #[test]
    fn test_describe_arities() {
        assert_eq!(describe_arities(&[1]), "1");
        assert_eq!(describe_arities(&[1, 2]), "1 or 2");
    }
}
