//! Symbol table for the global namespace

use std::collections::{HashMap, HashSet};
use std::fmt;

use string_interner::{DefaultStringInterner, DefaultSymbol};

use crate::ast::{FuncDecl, Type};
use crate::common::{Span, SymbolError, SymbolResult};

/// Interned identifier
pub type Name = DefaultSymbol;

/// Kind of symbol, fixed at first mention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Function,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Variable => f.write_str("variable"),
            SymbolKind::Function => f.write_str("function"),
        }
    }
}

/// Whether a function has a body yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolState {
    Declared,
    Defined,
}

/// Function signature. Parameter types only matter for their count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub return_type: Type,
    pub params: Vec<Type>,
}

impl Signature {
    pub fn new(return_type: Type, params: Vec<Type>) -> Self {
        Self { return_type, params }
    }

    pub fn of(func: &FuncDecl) -> Self {
        Self::new(func.return_type, func.params.iter().map(|p| p.ty).collect())
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.return_type)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(")")
    }
}

/// Where a symbol's first mention came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A declaration or definition in the translation unit
    Source,
    /// Synthesized from a call to an unknown name
    ImplicitCall,
    /// Pre-seeded external routine with no source location
    Builtin,
}

/// A symbol in the symbol table
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: Name,
    pub kind: SymbolKind,
    /// `None` for variables and for implicitly declared externals
    pub signature: Option<Signature>,
    pub state: SymbolState,
    /// Non-defining mentions accepted so far (functions only)
    pub declaration_count: u32,
    pub origin: Origin,
    /// First mention
    pub span: Span,
    /// The accepted declaration (prototype, or the definition when there was none)
    pub declaration: Option<Span>,
    pub definition: Option<Span>,
}

impl Symbol {
    fn new(name: Name, kind: SymbolKind, span: Span) -> Self {
        Self {
            name,
            kind,
            signature: None,
            state: SymbolState::Declared,
            declaration_count: 0,
            origin: Origin::Source,
            span,
            declaration: None,
            definition: None,
        }
    }

    pub fn is_function(&self) -> bool {
        self.kind == SymbolKind::Function
    }

    pub fn is_defined(&self) -> bool {
        self.state == SymbolState::Defined
    }

    /// Implicit externals accept one later prototype or definition
    pub fn is_implicit(&self) -> bool {
        self.origin != Origin::Source
    }

    pub fn return_type(&self) -> Option<Type> {
        self.signature.as_ref().map(|sig| sig.return_type)
    }

    /// Declaration to point back at from a later diagnostic
    pub fn location(&self) -> Option<Span> {
        self.declaration.or(self.first_mention())
    }

    fn first_mention(&self) -> Option<Span> {
        match self.origin {
            Origin::Builtin => None,
            _ => Some(self.span),
        }
    }
}

/// How an identifier resolves at the current program point
#[derive(Debug, Clone, Copy)]
pub enum Binding<'a> {
    /// Parameter or variable of the function being walked
    Local,
    Global(&'a Symbol),
    Unbound,
}

/// Global symbol table plus the variable frame of the function being walked
pub struct SymbolTable {
    interner: DefaultStringInterner,
    symbols: Vec<Symbol>,
    index: HashMap<Name, usize>,
    frame: Option<HashSet<Name>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            interner: DefaultStringInterner::default(),
            symbols: Vec::new(),
            index: HashMap::new(),
            frame: None,
        }
    }

    /// Record a non-defining mention of `name`
    pub fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        signature: Option<Signature>,
        span: Span,
    ) -> SymbolResult<()> {
        let Some(slot) = self.slot(name) else {
            let mut symbol = Symbol::new(self.interner.get_or_intern(name), kind, span);
            symbol.signature = signature;
            symbol.declaration_count = 1;
            symbol.declaration = Some(span);
            log::debug!("declared {} '{}'", kind, name);
            self.insert(symbol);
            return Ok(());
        };

        let symbol = &mut self.symbols[slot];
        if symbol.kind != kind {
            return Err(SymbolError::KindConflict {
                name: name.to_string(),
                existing: symbol.kind,
                requested: kind,
                previous: symbol.first_mention(),
            });
        }

        match kind {
            // Repeated variable mentions are not conflicts
            SymbolKind::Variable => Ok(()),
            SymbolKind::Function => {
                if symbol.declaration_count >= 1 {
                    return Err(SymbolError::DuplicateDeclaration {
                        name: name.to_string(),
                        previous: symbol.declaration.or(symbol.first_mention()),
                    });
                }
                // Only implicit externals get here
                symbol.declaration_count = 1;
                symbol.declaration = Some(span);
                symbol.origin = Origin::Source;
                if symbol.signature.is_none() {
                    symbol.signature = signature;
                }
                log::debug!("declared previously implicit function '{}'", name);
                Ok(())
            }
        }
    }

    /// Attach a body to the function `name`, declaring it first if unseen
    pub fn define(&mut self, name: &str, signature: Signature, span: Span) -> SymbolResult<()> {
        let Some(slot) = self.slot(name) else {
            let mut symbol =
                Symbol::new(self.interner.get_or_intern(name), SymbolKind::Function, span);
            symbol.signature = Some(signature);
            symbol.state = SymbolState::Defined;
            symbol.declaration_count = 1;
            symbol.declaration = Some(span);
            symbol.definition = Some(span);
            log::debug!("defined function '{}' without prototype", name);
            self.insert(symbol);
            return Ok(());
        };

        let symbol = &mut self.symbols[slot];
        if symbol.kind != SymbolKind::Function {
            return Err(SymbolError::KindConflict {
                name: name.to_string(),
                existing: symbol.kind,
                requested: SymbolKind::Function,
                previous: symbol.first_mention(),
            });
        }
        if symbol.is_defined() {
            return Err(SymbolError::DuplicateDefinition {
                name: name.to_string(),
                previous: symbol.definition.or(symbol.first_mention()),
            });
        }

        symbol.state = SymbolState::Defined;
        symbol.definition = Some(span);
        symbol.signature = Some(signature);
        if symbol.declaration_count == 0 {
            symbol.declaration_count = 1;
            symbol.declaration = Some(span);
        }
        symbol.origin = Origin::Source;
        log::debug!("defined function '{}'", name);
        Ok(())
    }

    /// Synthesize an external function for a call to an unknown name.
    /// Existing symbols are returned untouched.
    pub fn declare_implicit(&mut self, name: &str, span: Span) -> &Symbol {
        self.declare_external(name, Origin::ImplicitCall, span)
    }

    /// Pre-seed an external routine callable without a prototype
    pub fn declare_builtin(&mut self, name: &str) -> &Symbol {
        self.declare_external(name, Origin::Builtin, Span::default())
    }

    fn declare_external(&mut self, name: &str, origin: Origin, span: Span) -> &Symbol {
        let slot = match self.slot(name) {
            Some(slot) => slot,
            None => {
                let mut symbol =
                    Symbol::new(self.interner.get_or_intern(name), SymbolKind::Function, span);
                symbol.origin = origin;
                log::debug!("implicitly declared external function '{}'", name);
                self.insert(symbol)
            }
        };
        &self.symbols[slot]
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.slot(name).map(|slot| &self.symbols[slot])
    }

    /// Resolve `name`, preferring the local frame over globals
    pub fn resolve(&self, name: &str) -> Binding<'_> {
        if self.is_local(name) {
            Binding::Local
        } else if let Some(symbol) = self.lookup(name) {
            Binding::Global(symbol)
        } else {
            Binding::Unbound
        }
    }

    /// Open the variable frame of a function body
    pub fn enter_function(&mut self) {
        self.frame = Some(HashSet::new());
    }

    pub fn leave_function(&mut self) {
        self.frame = None;
    }

    pub fn in_function(&self) -> bool {
        self.frame.is_some()
    }

    /// Bind a parameter or local variable in the current frame
    pub fn bind_local(&mut self, name: &str) {
        let id = self.interner.get_or_intern(name);
        if let Some(frame) = self.frame.as_mut() {
            frame.insert(id);
        }
    }

    pub fn is_local(&self, name: &str) -> bool {
        match (&self.frame, self.interner.get(name)) {
            (Some(frame), Some(id)) => frame.contains(&id),
            _ => false,
        }
    }

    pub fn name_of(&self, symbol: &Symbol) -> Option<&str> {
        self.interner.resolve(symbol.name)
    }

    /// Global symbols in order of first mention
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.symbols
            .iter()
            .filter_map(|symbol| self.name_of(symbol).map(|name| (name, symbol)))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn slot(&self, name: &str) -> Option<usize> {
        self.interner
            .get(name)
            .and_then(|id| self.index.get(&id).copied())
    }

    fn insert(&mut self, symbol: Symbol) -> usize {
        let slot = self.symbols.len();
        self.index.insert(symbol.name, slot);
        self.symbols.push(symbol);
        slot
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;

    fn sig(return_type: Type, arity: usize) -> Signature {
        Signature::new(return_type, vec![Type::Int; arity])
    }

    fn span(start: usize) -> Span {
        Span::new(start, start + 1)
    }

    #[test]
    fn test_declare_then_lookup() {
        let mut table = SymbolTable::new();
        table
            .declare("der", SymbolKind::Function, Some(sig(Type::Int, 0)), span(0))
            .unwrap();

        let symbol = table.lookup("der").unwrap();
        assert!(symbol.is_function());
        assert_eq!(symbol.state, SymbolState::Declared);
        assert_eq!(symbol.declaration_count, 1);
        assert_eq!(symbol.return_type(), Some(Type::Int));
        assert!(table.lookup("other").is_none());
    }

    #[test]
    fn test_identical_prototype_twice_is_rejected() {
        let mut table = SymbolTable::new();
        table
            .declare("der", SymbolKind::Function, Some(sig(Type::Int, 0)), span(0))
            .unwrap();
        let err = table
            .declare("der", SymbolKind::Function, Some(sig(Type::Int, 0)), span(10))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateDeclaration);
        assert_eq!(err.previous(), Some(span(0)));
    }

    #[test]
    fn test_prototype_then_definition() {
        let mut table = SymbolTable::new();
        table
            .declare("empty", SymbolKind::Function, Some(sig(Type::Void, 0)), span(0))
            .unwrap();
        table.define("empty", sig(Type::Void, 0), span(20)).unwrap();

        let symbol = table.lookup("empty").unwrap();
        assert!(symbol.is_defined());
        assert_eq!(symbol.declaration_count, 1);
        assert_eq!(symbol.definition, Some(span(20)));
    }

    #[test]
    fn test_second_definition_is_rejected() {
        let mut table = SymbolTable::new();
        table.define("fun", sig(Type::Int, 2), span(0)).unwrap();
        let err = table.define("fun", sig(Type::Int, 2), span(30)).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateDefinition);
        assert_eq!(err.previous(), Some(span(0)));
    }

    #[test]
    fn test_prototype_after_definition_is_rejected() {
        let mut table = SymbolTable::new();
        table.define("fun", sig(Type::Int, 0), span(0)).unwrap();
        let err = table
            .declare("fun", SymbolKind::Function, Some(sig(Type::Int, 0)), span(30))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateDeclaration);
    }

    #[test]
    fn test_kind_is_fixed_at_first_mention() {
        let mut table = SymbolTable::new();
        table.declare("a", SymbolKind::Variable, None, span(0)).unwrap();

        let err = table
            .declare("a", SymbolKind::Function, Some(sig(Type::Int, 3)), span(8))
            .unwrap_err();
        assert!(matches!(
            err,
            SymbolError::KindConflict {
                existing: SymbolKind::Variable,
                requested: SymbolKind::Function,
                ..
            }
        ));

        let err = table.define("a", sig(Type::Int, 0), span(16)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KindConflict);

        table.declare("f", SymbolKind::Function, None, span(24)).unwrap();
        let err = table.declare("f", SymbolKind::Variable, None, span(32)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KindConflict);
        assert_eq!(table.lookup("a").unwrap().kind, SymbolKind::Variable);
    }

    #[test]
    fn test_repeated_variable_mentions_are_accepted() {
        let mut table = SymbolTable::new();
        table.declare("a", SymbolKind::Variable, None, span(0)).unwrap();
        table.declare("a", SymbolKind::Variable, None, span(5)).unwrap();
        table.declare("a", SymbolKind::Variable, None, span(9)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("a").unwrap().span, span(0));
    }

    #[test]
    fn test_implicit_external_accepts_one_real_declaration() {
        let mut table = SymbolTable::new();
        let symbol = table.declare_implicit("printf", span(0));
        assert!(symbol.is_implicit());
        assert_eq!(symbol.declaration_count, 0);

        table
            .declare("printf", SymbolKind::Function, Some(sig(Type::Int, 1)), span(10))
            .unwrap();
        let symbol = table.lookup("printf").unwrap();
        assert!(!symbol.is_implicit());
        assert_eq!(symbol.signature.as_ref().map(Signature::arity), Some(1));

        let err = table
            .declare("printf", SymbolKind::Function, None, span(20))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateDeclaration);
    }

    #[test]
    fn test_implicit_external_conflicts_with_variable() {
        let mut table = SymbolTable::new();
        table.declare_implicit("scanf", span(0));
        let err = table.declare("scanf", SymbolKind::Variable, None, span(4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KindConflict);
    }

    #[test]
    fn test_builtin_conflict_has_no_previous_location() {
        let mut table = SymbolTable::new();
        table.declare_builtin("printf");
        assert_eq!(table.lookup("printf").unwrap().origin, Origin::Builtin);

        let err = table.declare("printf", SymbolKind::Variable, None, span(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KindConflict);
        assert_eq!(err.previous(), None);
    }

    #[test]
    fn test_locals_shadow_globals_only_inside_frame() {
        let mut table = SymbolTable::new();
        table
            .declare("test", SymbolKind::Function, Some(sig(Type::Void, 2)), span(0))
            .unwrap();

        table.enter_function();
        table.bind_local("test");
        assert!(matches!(table.resolve("test"), Binding::Local));
        assert!(matches!(table.resolve("nothing"), Binding::Unbound));
        table.leave_function();

        assert!(matches!(table.resolve("test"), Binding::Global(s) if s.is_function()));
        // locals never become globals
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_iter_in_first_mention_order() {
        let mut table = SymbolTable::new();
        table.declare("b", SymbolKind::Variable, None, span(0)).unwrap();
        table.define("a", sig(Type::Void, 0), span(4)).unwrap();
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_signature_display() {
        assert_eq!(sig(Type::Int, 2).to_string(), "int (int, int)");
        assert_eq!(sig(Type::Void, 0).to_string(), "void ()");
    }
}
