// File: src/errors.rs
//
// Error handling and reporting for the BCL language.
// Provides structured error types with source location information
// and pretty-printed error messages.

use colored::Colorize;
use std::fmt;

/// Source location information for tracking where code appears in a file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub file: Option<String>,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column, file: None }
    }

    pub fn unknown() -> Self {
        Self { line: 0, column: 0, file: None }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Types of errors that can occur in BCL
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    SyntaxError,
    SemanticError,
    TypeError,
    UndefinedVariable,
    UndefinedFunction,
    RuntimeError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::SyntaxError => write!(f, "Syntax Error"),
            ErrorKind::SemanticError => write!(f, "Semantic Error"),
            ErrorKind::TypeError => write!(f, "Type Error"),
            ErrorKind::UndefinedVariable => write!(f, "Undefined Variable"),
            ErrorKind::UndefinedFunction => write!(f, "Undefined Function"),
            ErrorKind::RuntimeError => write!(f, "Runtime Error"),
        }
    }
}

/// A structured error with location information
#[derive(Debug, Clone)]
pub struct BclError {
    pub kind: ErrorKind,
    pub message: String,
    pub location: SourceLocation,
    pub suggestion: Option<String>,
}

impl BclError {
    pub fn new(kind: ErrorKind, message: String, location: SourceLocation) -> Self {
        Self { kind, message, location, suggestion: None }
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Create a syntax error
    pub fn syntax_error(message: String, location: SourceLocation) -> Self {
        Self::new(ErrorKind::SyntaxError, message, location)
    }

    /// Create a semantic error
    pub fn semantic_error(message: String, location: SourceLocation) -> Self {
        Self::new(ErrorKind::SemanticError, message, location)
    }

    /// Create a type error
    pub fn type_error(message: String, location: SourceLocation) -> Self {
        Self::new(ErrorKind::TypeError, message, location)
    }

    /// Create a runtime error
    pub fn runtime_error(message: String, location: SourceLocation) -> Self {
        Self::new(ErrorKind::RuntimeError, message, location)
    }

    /// Create an undefined variable error
    pub fn undefined_variable(name: &str, location: SourceLocation) -> Self {
        Self::new(
            ErrorKind::UndefinedVariable,
            format!("Variable '{}' does not exist", name),
            location,
        )
    }

    /// Create an undefined function error
    pub fn undefined_function(name: &str, location: SourceLocation) -> Self {
        Self::new(
            ErrorKind::UndefinedFunction,
            format!("Function '{}' does not exist", name),
            location,
        )
    }
}

impl fmt::Display for BclError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Error header with kind and message
        let kind_str = format!("{}", self.kind);
        writeln!(f, "{}: {}", kind_str.red().bold(), self.message.bold())?;

        // Location arrow
        let location_str =
            format!("  --> line {}, column {}", self.location.line, self.location.column);
        writeln!(f, "{}", location_str.bright_blue())?;

        if let Some(ref suggestion) = self.suggestion {
            writeln!(
                f,
                "   {} {}",
                "=".bright_green(),
                format!("Did you mean '{}'?", suggestion).bright_green()
            )?;
        }

        Ok(())
    }
}

impl std::error::Error for BclError {}

/// Computes the Levenshtein distance between two strings
/// Used for "Did you mean?" suggestions
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    for (i, row) in matrix.iter_mut().enumerate().take(len1 + 1) {
        row[0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    for i in 1..=len1 {
        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] { 0 } else { 1 };
            matrix[i][j] = std::cmp::min(
                std::cmp::min(
                    matrix[i - 1][j] + 1, // deletion
                    matrix[i][j - 1] + 1, // insertion
                ),
                matrix[i - 1][j - 1] + cost, // substitution
            );
        }
    }

    matrix[len1][len2]
}

/// Find the closest match from a list of candidates using Levenshtein distance
/// Returns None if no good match is found (distance > 3)
pub fn find_closest_match<'a>(target: &str, candidates: &'a [String]) -> Option<&'a str> {
    if candidates.is_empty() {
        return None;
    }

    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for candidate in candidates {
        let distance = levenshtein_distance(target, candidate);

        if distance <= 3 && distance < best_distance {
            best_distance = distance;
            best_match = Some(candidate.as_str());
        }
    }

    best_match
}
