//! Function signatures
//!
//! A signature owns one overload per arity. The arity is the dispatch key,
//! so two overloads with the same parameter count are rejected when the
//! signature is built.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::ty::SemanticType;

/// Whether calls to a function may be folded or deduplicated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purity {
    /// Same arguments always produce the same result, with no side effects
    Pure,
    /// Result may vary between calls (e.g. random numbers)
    Impure,
}

/// One arity-specific parameter list and return type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Overload {
    /// Parameter types in call order
    pub params: Vec<SemanticType>,
    /// Return type
    pub return_type: SemanticType,
}

impl Overload {
    /// Create an overload from already-built types
    pub fn new(params: Vec<SemanticType>, return_type: SemanticType) -> Self {
        Self {
            params,
            return_type,
        }
    }

    /// Create an overload from annotation strings, e.g. `(&["number"], "list<int>")`
    pub fn parse(params: &[&str], return_type: &str) -> TypeResult<Self> {
        let params = params
            .iter()
            .map(|p| p.parse::<SemanticType>())
            .collect::<TypeResult<Vec<_>>>()?;
        Ok(Self::new(params, return_type.parse()?))
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Check call-site argument types against this overload
    ///
    /// Reports the first incompatible argument.
    pub fn check_arguments(&self, arg_types: &[SemanticType]) -> TypeResult<()> {
        if arg_types.len() != self.params.len() {
            return Err(TypeError::ArgumentCount {
                expected: self.params.len(),
                actual: arg_types.len(),
            });
        }
        for (index, (expected, actual)) in self.params.iter().zip(arg_types).enumerate() {
            if !expected.is_assignable_from(actual) {
                return Err(TypeError::Mismatch {
                    index,
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The declared shape of a plugin function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    name: String,
    overloads: Vec<Overload>,
    purity: Purity,
}

impl Signature {
    /// Build a signature, rejecting empty overload sets and repeated arities
    pub fn new(
        name: impl Into<String>,
        overloads: Vec<Overload>,
        purity: Purity,
    ) -> TypeResult<Self> {
        let name = name.into();
        if overloads.is_empty() {
            return Err(TypeError::NoOverloads { name });
        }

        let mut seen = FxHashSet::default();
        for overload in &overloads {
            if !seen.insert(overload.arity()) {
                return Err(TypeError::DuplicateArity {
                    name,
                    arity: overload.arity(),
                });
            }
        }

        let mut overloads = overloads;
        overloads.sort_by_key(Overload::arity);
        Ok(Self {
            name,
            overloads,
            purity,
        })
    }

    /// Function name as written at call sites
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overloads, ordered by arity
    pub fn overloads(&self) -> &[Overload] {
        &self.overloads
    }

    /// Purity of every overload
    pub fn purity(&self) -> Purity {
        self.purity
    }

    /// Declared arities in ascending order
    pub fn arities(&self) -> Vec<usize> {
        self.overloads.iter().map(Overload::arity).collect()
    }

    /// The overload taking exactly `arity` parameters
    pub fn overload_for_arity(&self, arity: usize) -> Option<&Overload> {
        self.overloads.iter().find(|o| o.arity() == arity)
    }
}
