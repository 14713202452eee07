use crate::ts::document::ParsedDocument;
use crate::ts::errors::TreeSitterError;
use ast_grep_language::{LanguageExt, SupportLang};
use std::path::Path;
use tree_sitter::{Parser, Tree};

/// Source dialect, which selects the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// JavaScript with JSX (`.js`, `.jsx`, `.mjs`, `.cjs`)
    #[default]
    Jsx,
    /// TypeScript with JSX (`.tsx`)
    Tsx,
}

impl Dialect {
    /// Pick a dialect from a file extension.
    ///
    /// Plain `.ts` is not JSX: the TypeScript grammar reads `<T>x` as a type
    /// assertion, so such files are never linted.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "js" | "jsx" | "mjs" | "cjs" => Some(Dialect::Jsx),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    pub fn language(&self) -> SupportLang {
        match self {
            Dialect::Jsx => SupportLang::JavaScript,
            Dialect::Tsx => SupportLang::Tsx,
        }
    }
}

/// Tree-sitter parser wrapper for one JSX dialect.
pub struct JsxParser {
    parser: Parser,
    dialect: Dialect,
}

impl JsxParser {
    pub fn new(dialect: Dialect) -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        let ts_lang = dialect.language().get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| TreeSitterError::LanguageSet)?;

        Ok(Self { parser, dialect })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree, TreeSitterError> {
        self.parser
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed)
    }

    /// Parse and lower `source` into a rule-facing document.
    pub fn parse_document<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<ParsedDocument<'a>, TreeSitterError> {
        let tree = self.parse(source)?;
        Ok(ParsedDocument::new(source, tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_jsx() {
        let mut parser = JsxParser::new(Dialect::Jsx).unwrap();
        let tree = parser.parse("const a = <div>{b}</div>;").unwrap();
        assert_eq!(tree.root_node().kind(), "program");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn parse_tsx() {
        let mut parser = JsxParser::new(Dialect::Tsx).unwrap();
        let tree = parser
            .parse("const a = (p: Props) => <div>{p.b && <span />}</div>;")
            .unwrap();
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn dialect_from_extension() {
        assert_eq!(Dialect::from_path(&PathBuf::from("a/App.jsx")), Some(Dialect::Jsx));
        assert_eq!(Dialect::from_path(&PathBuf::from("index.js")), Some(Dialect::Jsx));
        assert_eq!(Dialect::from_path(&PathBuf::from("App.tsx")), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_path(&PathBuf::from("types.ts")), None);
        assert_eq!(Dialect::from_path(&PathBuf::from("README")), None);
    }
}
