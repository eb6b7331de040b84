//! Source-level settings that steer scanning and parsing.

use serde::Serialize;

/// Language variant (standard vs JSX).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LanguageVariant {
    #[default]
    Standard,
    JSX,
}

/// The kind of script, usually inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ScriptKind {
    #[default]
    Unknown,
    JS,
    JSX,
    TS,
    TSX,
    JSON,
}

impl ScriptKind {
    /// Infer the script kind from a file name's extension. Unrecognized
    /// extensions are treated as TypeScript.
    pub fn from_file_name(file_name: &str) -> ScriptKind {
        let lower = file_name.to_ascii_lowercase();
        let extension = lower.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match extension {
            "ts" | "mts" | "cts" => ScriptKind::TS,
            "tsx" => ScriptKind::TSX,
            "js" | "mjs" | "cjs" => ScriptKind::JS,
            "jsx" => ScriptKind::JSX,
            "json" => ScriptKind::JSON,
            _ => ScriptKind::TS,
        }
    }

    /// Resolve `Unknown` against the file name.
    pub fn ensure(self, file_name: &str) -> ScriptKind {
        match self {
            ScriptKind::Unknown => ScriptKind::from_file_name(file_name),
            kind => kind,
        }
    }

    pub fn language_variant(self) -> LanguageVariant {
        match self {
            ScriptKind::TSX | ScriptKind::JSX | ScriptKind::JS => LanguageVariant::JSX,
            _ => LanguageVariant::Standard,
        }
    }

    pub fn is_javascript(self) -> bool {
        matches!(self, ScriptKind::JS | ScriptKind::JSX)
    }
}

/// Target language version. It selects the Unicode identifier tables the
/// scanner consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub enum ScriptTarget {
    ES3,
    ES5,
    ES2015,
    ES2016,
    ES2017,
    ES2018,
    ES2019,
    ES2020,
    ES2021,
    ES2022,
    #[default]
    ESNext,
    JSON,
}

impl ScriptTarget {
    pub fn from_name(name: &str) -> Option<ScriptTarget> {
        let target = match name.to_ascii_lowercase().as_str() {
            "es3" => ScriptTarget::ES3,
            "es5" => ScriptTarget::ES5,
            "es6" | "es2015" => ScriptTarget::ES2015,
            "es2016" => ScriptTarget::ES2016,
            "es2017" => ScriptTarget::ES2017,
            "es2018" => ScriptTarget::ES2018,
            "es2019" => ScriptTarget::ES2019,
            "es2020" => ScriptTarget::ES2020,
            "es2021" => ScriptTarget::ES2021,
            "es2022" => ScriptTarget::ES2022,
            "esnext" => ScriptTarget::ESNext,
            "json" => ScriptTarget::JSON,
            _ => return None,
        };
        Some(target)
    }
}

/// Whether a file name names a declaration file (`.d.ts`, `.d.mts`, `.d.cts`).
pub fn is_declaration_file_name(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".d.ts") || lower.ends_with(".d.mts") || lower.ends_with(".d.cts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_kind_from_file_name() {
        assert_eq!(ScriptKind::from_file_name("lib.dom.d.ts"), ScriptKind::TS);
        assert_eq!(ScriptKind::from_file_name("App.TSX"), ScriptKind::TSX);
        assert_eq!(ScriptKind::from_file_name("index.mjs"), ScriptKind::JS);
        assert_eq!(ScriptKind::from_file_name("package.json"), ScriptKind::JSON);
        assert_eq!(ScriptKind::from_file_name("README"), ScriptKind::TS);
        assert_eq!(ScriptKind::TSX.language_variant(), LanguageVariant::JSX);
        assert_eq!(ScriptKind::TS.language_variant(), LanguageVariant::Standard);
    }

    #[test]
    fn test_declaration_file_name() {
        assert!(is_declaration_file_name("lib.dom.d.ts"));
        assert!(!is_declaration_file_name("lib.ts"));
    }

    #[test]
    fn test_target_from_name() {
        assert_eq!(ScriptTarget::from_name("ES5"), Some(ScriptTarget::ES5));
        assert_eq!(ScriptTarget::from_name("es6"), Some(ScriptTarget::ES2015));
        assert_eq!(ScriptTarget::from_name("es1999"), None);
        assert!(ScriptTarget::ES5 < ScriptTarget::ES2015);
    }
}
