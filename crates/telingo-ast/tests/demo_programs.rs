//! The bundled demo programs parse into the expected statement shapes.

use telingo_ast::ast::Statement;
use telingo_ast::parse;

fn demo(name: &str) -> Vec<Statement> {
    let path = format!("{}/../../demos/{name}", env!("CARGO_MANIFEST_DIR"));
    let source = std::fs::read_to_string(&path).expect("demo should be readable");
    match parse(&source, name) {
        Ok(statements) => statements,
        Err(e) => panic!("expected {name} to parse, got {e:?}"),
    }
}

fn program_names(statements: &[Statement]) -> Vec<&str> {
    statements
        .iter()
        .filter_map(|s| match s {
            Statement::Program { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect()
}

fn shown(statements: &[Statement]) -> Vec<(String, usize)> {
    statements
        .iter()
        .filter_map(|s| match s {
            Statement::ShowSignature { name, arity, .. } => Some((name.clone(), *arity)),
            _ => None,
        })
        .collect()
}

#[test]
fn toggle_demo_structure() {
    let statements = demo("toggle.lp");
    assert_eq!(
        program_names(&statements),
        vec!["base", "initial", "dynamic", "final"]
    );
    assert_eq!(
        shown(&statements),
        vec![("on".to_string(), 0), ("switch".to_string(), 0)]
    );
    let rules = statements
        .iter()
        .filter(|s| matches!(s, Statement::Rule(_)))
        .count();
    assert_eq!(rules, 7);
}

#[test]
fn delayed_demo_keeps_prime_markers() {
    let statements = demo("delayed.lp");
    assert_eq!(
        program_names(&statements),
        vec!["base", "initial", "static", "dynamic", "final"]
    );
    let rendered: Vec<String> = statements.iter().map(ToString::to_string).collect();
    assert!(rendered.iter().any(|l| l.starts_with("delivered''(M)")));
    assert!(rendered.iter().any(|l| l.contains("'delivered(M)")));
}

#[test]
fn blocks_demo_parses() {
    let statements = demo("blocks.lp");
    assert_eq!(program_names(&statements)[0], "base");
    assert!(statements.len() > 5);
}
