//! # Introduction
//!
//! hlc compiles H source into a portable C99 translation unit. The core is
//! a strict left-to-right pipeline with no I/O of its own:
//!
//! ```text
//! Source → Lexer → Parser → AST → C emitter
//! ```
//!
//! 1. [`parser`] — tokenises the source and builds an AST, accumulating
//!    diagnostics instead of aborting.
//! 2. [`codegen`] — walks the AST twice and emits the translation unit:
//!    headers and runtime helpers first, then struct and function forward
//!    declarations, then definitions.
//!
//! The driver binary owns file I/O, the C compiler invocation, and `-run`
//! execution; the library is a pure function over source text.
//!
//! ## Supported language
//!
//! Structs with methods, enums, `var`/`const`/`:=` declarations, `if/else`,
//! C-style and range `for`, `while`, `defer` with LIFO emission at every
//! function exit, and the built-ins `print`, `len`, `alloc`, `free`,
//! `make`, and `map[K]V` literals backed by an emitted map runtime.

pub mod codegen;
pub mod parser;

pub use codegen::Generator;
pub use parser::{Lexer, Parser};

/// Compile H source text to a C99 translation unit.
///
/// Returns the generated C on success, or the parser's diagnostics when
/// the source does not parse. The emitter is only invoked on a clean
/// parse, so the returned C is always a complete translation unit.
pub fn compile(source: &str) -> Result<String, Vec<String>> {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();

    if !parser.errors().is_empty() {
        return Err(parser.errors().to_vec());
    }

    let mut generator = Generator::new();
    Ok(generator.generate(&program))
}
