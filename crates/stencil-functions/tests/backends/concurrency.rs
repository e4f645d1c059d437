//! Concurrent lowering against the shared registry

use stencil_plugin::bytecode::TypedExpr;
use stencil_plugin::{BackendArgs, DeferredValue, JsExpr, PyExpr};
use stencil_runtime::Repr;
use stencil_types::SemanticType;

use crate::harness::*;

const THREADS: usize = 128;

/// Lower a fixed mix of calls on every backend
fn lower_workload(h: &Harness<'_>) -> Vec<String> {
    let calls: [(&str, Vec<(Repr, SemanticType)>); 6] = [
        ("ceiling", vec![(Repr::Float64, SemanticType::Float)]),
        ("floor", vec![(Repr::Boxed, SemanticType::Number)]),
        ("range", vec![(Repr::Int64, SemanticType::Int); 3]),
        ("max", vec![(Repr::Int64, SemanticType::Int); 2]),
        ("isNull", vec![(Repr::Boxed, SemanticType::Any)]),
        ("randomInt", vec![(Repr::Int64, SemanticType::Int)]),
    ];

    let mut out = Vec::new();
    for (function, params) in calls.iter() {
        let types: Vec<SemanticType> = params.iter().map(|(_, ty)| ty.clone()).collect();
        let typed: Vec<TypedExpr> = params
            .iter()
            .enumerate()
            .map(|(i, (repr, ty))| TypedExpr::arg(i as u16, *repr, ty.clone()))
            .collect();
        let names: Vec<String> = (0..params.len()).map(|i| format!("a{}", i)).collect();

        let backends = [
            BackendArgs::Bytecode(typed.clone()),
            BackendArgs::GenericCall(typed.into_iter().map(DeferredValue::Leaf).collect()),
            BackendArgs::JsText(names.iter().map(|n| JsExpr::atomic(n.as_str())).collect()),
            BackendArgs::PyText(names.iter().map(|n| PyExpr::atomic(n.as_str())).collect()),
        ];
        for args in backends {
            let backend = args.backend();
            let line = match h.lower(function, &types, args) {
                Ok(artifact) => describe(&artifact),
                Err(failure) => format!("{:?}", failure),
            };
            out.push(format!("{} {}: {}", backend, function, line));
        }
    }
    out
}

#[test]
fn test_parallel_lowering_matches_sequential() {
    let h = Harness::standard();
    let expected = lower_workload(&h);
    assert_eq!(expected.len(), 24);

    let results = crossbeam::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|_| {
                    let h = Harness::standard();
                    lower_workload(&h)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect::<Vec<_>>()
    })
    .expect("scope");

    assert_eq!(results.len(), THREADS);
    for result in results {
        assert_eq!(result, expected);
    }
}
