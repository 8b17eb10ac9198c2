//! The built-in registry shared by the interpreter and the codegen. Both
//! receive the same table at construction; neither reaches for global state.

/// What a built-in does when called in interpreted mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuiltinKind {
    /// Takes one value, hands it to the output sink, evaluates to it.
    OutputOne,
}

pub struct Builtin {
    pub name: &'static str,
    pub kind: BuiltinKind,
    /// Import declaration emitted at most once per generated module.
    pub wat_import: &'static str,
    /// Call target the import binds, e.g. `$log`.
    pub wat_symbol: &'static str,
}

pub const BUILTINS: &[Builtin] = &[Builtin {
    name: "log",
    kind: BuiltinKind::OutputOne,
    wat_import: r#"(import "console" "log" (func $log (param f32) (result f32)))"#,
    wat_symbol: "$log",
}];
