//! Test harness for lowering calls and running the result
//!
//! Bytecode and generic-call artifacts are emitted and executed in the VM so
//! tests can compare rendered values across backends. Text artifacts are
//! compared as text.

use stencil_functions::{runtime_instances, standard_registry};
use stencil_plugin::bytecode::{Expr, TypedExpr};
use stencil_plugin::{
    BackendArgs, BackendArtifact, CallSite, DeferredValue, DiagnosticCollector, FunctionRegistry,
    JsExpr, Lowerer, PyExpr, SourceLocation, Vm, VmError,
};
use stencil_runtime::{RuntimeInstances, Slot, Value};
use stencil_types::SemanticType;
use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber once; `STENCIL_LOG=trace` for detail
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("STENCIL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// One call-site argument
#[derive(Debug, Clone)]
pub struct Arg {
    pub slot: Slot,
    pub ty: SemanticType,
    /// Lowered as a constant instead of an argument reference
    pub literal: bool,
}

impl Arg {
    pub fn new(slot: Slot, ty: SemanticType) -> Self {
        Self {
            slot,
            ty,
            literal: false,
        }
    }

    pub fn literal(mut self) -> Self {
        self.literal = true;
        self
    }

    /// The bytecode backend's view of argument `index`
    pub fn typed(&self, index: u16) -> TypedExpr {
        if self.literal {
            TypedExpr::new(Expr::Const(self.slot.clone()), self.ty.clone())
        } else {
            TypedExpr::arg(index, self.slot.repr(), self.ty.clone())
        }
    }
}

pub fn int(value: i64) -> Arg {
    Arg::new(Slot::Int64(value), SemanticType::Int)
}

pub fn float(value: f64) -> Arg {
    Arg::new(Slot::Float64(value), SemanticType::Float)
}

/// A boxed argument whose static type is only `ty`
pub fn boxed(value: Value, ty: SemanticType) -> Arg {
    Arg::new(Slot::Boxed(value), ty)
}

/// Why a call produced no value
#[derive(Debug)]
pub enum Failure {
    /// Reported at compile time, with its error code
    Diagnostic(&'static str),
    /// Raised while running the lowered code
    Render(VmError),
}

pub struct Harness<'r> {
    registry: &'r FunctionRegistry,
    instances: RuntimeInstances,
}

impl Harness<'static> {
    /// The standard registry with a deterministic random source
    pub fn standard() -> Self {
        let registry = standard_registry().expect("standard registry builds");
        Harness::with_registry(registry, 7)
    }
}

impl<'r> Harness<'r> {
    pub fn with_registry(registry: &'r FunctionRegistry, seed: u64) -> Self {
        init_tracing();
        Self {
            registry,
            instances: runtime_instances(seed),
        }
    }

    pub fn registry(&self) -> &'r FunctionRegistry {
        self.registry
    }

    /// Lower one call; any diagnostic becomes a failure
    pub fn lower(
        &self,
        function: &str,
        types: &[SemanticType],
        args: BackendArgs,
    ) -> Result<BackendArtifact, Failure> {
        let site = CallSite::new(function, types, SourceLocation::default());
        let mut reporter = DiagnosticCollector::new();
        let artifact = Lowerer::new(self.registry)
            .lower(&site, args, &mut reporter)
            .expect("no configuration or internal error");
        match reporter.diagnostics().first() {
            Some(diag) => Err(Failure::Diagnostic(
                diag.code().map(|c| c.0).unwrap_or("none"),
            )),
            None => Ok(artifact),
        }
    }

    /// Lower for the bytecode backend and run
    pub fn bytecode(&self, function: &str, args: &[Arg]) -> Result<Value, Failure> {
        let types = types(args);
        let lowered = args
            .iter()
            .enumerate()
            .map(|(i, a)| a.typed(i as u16))
            .collect();
        let artifact = self.lower(function, &types, BackendArgs::Bytecode(lowered))?;
        let expr = artifact
            .as_expression()
            .expect("bytecode artifact")
            .expr
            .clone();
        self.run(&expr, args)
    }

    /// Lower through the generic-call capability, materialize and run
    pub fn generic(&self, function: &str, args: &[Arg]) -> Result<Value, Failure> {
        let types = types(args);
        let deferred = args
            .iter()
            .enumerate()
            .map(|(i, a)| DeferredValue::Leaf(a.typed(i as u16)))
            .collect();
        let artifact = self.lower(function, &types, BackendArgs::GenericCall(deferred))?;
        let BackendArtifact::Deferred(deferred) = artifact else {
            panic!("generic-call artifact expected, got {:?}", artifact);
        };
        let expr = deferred.materialize().expect("materializes").into_expr();
        self.run(&expr, args)
    }

    /// Lower for JavaScript; returns the text and required libraries
    pub fn js(
        &self,
        function: &str,
        types: &[SemanticType],
        args: Vec<JsExpr>,
    ) -> Result<(String, Vec<String>), Failure> {
        let artifact = self.lower(function, types, BackendArgs::JsText(args))?;
        Ok(text_of(artifact))
    }

    /// Lower for Python; returns the text and required modules
    pub fn python(
        &self,
        function: &str,
        types: &[SemanticType],
        args: Vec<PyExpr>,
    ) -> Result<(String, Vec<String>), Failure> {
        let artifact = self.lower(function, types, BackendArgs::PyText(args))?;
        Ok(text_of(artifact))
    }

    fn run(&self, expr: &Expr, args: &[Arg]) -> Result<Value, Failure> {
        let slots: Vec<Slot> = args.iter().map(|a| a.slot.clone()).collect();
        Vm::new(&self.instances)
            .evaluate(expr, &slots)
            .map(Slot::into_value)
            .map_err(Failure::Render)
    }
}

fn types(args: &[Arg]) -> Vec<SemanticType> {
    args.iter().map(|a| a.ty.clone()).collect()
}

fn text_of(artifact: BackendArtifact) -> (String, Vec<String>) {
    let libraries = artifact.required_libraries().to_vec();
    let text = artifact.as_text().expect("text artifact").text().to_string();
    (text, libraries)
}

/// Render any artifact to a stable string
pub fn describe(artifact: &BackendArtifact) -> String {
    match artifact {
        BackendArtifact::Expression(expr) => expr.to_string(),
        BackendArtifact::Text {
            expr,
            required_libraries,
        } => format!("{} [{}]", expr, required_libraries.join(", ")),
        BackendArtifact::Deferred(deferred) => match deferred.clone().materialize() {
            Ok(expr) => format!("deferred {}", expr),
            Err(err) => format!("deferred error {}", err),
        },
    }
}

/// Assert that a call failed at compile time with `code`
pub fn assert_diagnostic(result: Result<impl std::fmt::Debug, Failure>, code: &str) {
    match result {
        Err(Failure::Diagnostic(actual)) => assert_eq!(actual, code),
        other => panic!("expected diagnostic {}, got {:?}", code, other),
    }
}
