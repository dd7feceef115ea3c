//! Math typesetting pass over the results region.
//!
//! The typesetter is an external collaborator: it receives the rendered
//! region and a delimiter configuration and works by side effect. The
//! default configuration recognises `$$...$$` as display math and `$...$`
//! as inline math, and asks the typesetter not to fail on malformed input.

use crate::render::ResultsView;

/// One math delimiter pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathDelimiter {
    pub left: String,
    pub right: String,
    /// Display (block) mode when true, inline otherwise
    pub display: bool,
}

impl MathDelimiter {
    pub fn new(left: impl Into<String>, right: impl Into<String>, display: bool) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            display,
        }
    }
}

/// Options handed to the typesetter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypesetOptions {
    pub delimiters: Vec<MathDelimiter>,
    /// Fail on malformed math instead of leaving it as text
    pub throw_on_error: bool,
}

impl Default for TypesetOptions {
    fn default() -> Self {
        Self {
            delimiters: vec![
                MathDelimiter::new("$$", "$$", true),
                MathDelimiter::new("$", "$", false),
            ],
            throw_on_error: false,
        }
    }
}

/// Errors a typesetter may report when `throw_on_error` is set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesetError {
    #[error("Unbalanced math delimiter '{0}'")]
    Unbalanced(String),
}

/// Renders math found in a results region
pub trait MathTypesetter: Send + Sync + std::fmt::Debug {
    fn typeset(&self, region: &dyn ResultsView, options: &TypesetOptions)
        -> Result<(), TypesetError>;
}

/// Marks math spans in the region's markup
///
/// Each recognised span becomes `<span class="math inline">..</span>` or
/// `<span class="math display">..</span>` holding the TeX source, ready for
/// a client-side math renderer. Only text between tags is scanned. A
/// delimiter preceded by a backslash is literal. An unclosed delimiter is
/// left as text unless `throw_on_error` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimiterTypesetter;

impl DelimiterTypesetter {
    pub fn new() -> Self {
        Self
    }

    /// Typeset a markup string
    pub fn typeset_markup(
        &self,
        markup: &str,
        options: &TypesetOptions,
    ) -> Result<String, TypesetError> {
        let mut out = String::with_capacity(markup.len());
        let mut rest = markup;

        while !rest.is_empty() {
            match rest.find('<') {
                Some(0) => {
                    let end = rest.find('>').map(|i| i + 1).unwrap_or(rest.len());
                    out.push_str(&rest[..end]);
                    rest = &rest[end..];
                }
                Some(start) => {
                    typeset_text(&rest[..start], options, &mut out)?;
                    rest = &rest[start..];
                }
                None => {
                    typeset_text(rest, options, &mut out)?;
                    rest = "";
                }
            }
        }

        Ok(out)
    }
}

impl MathTypesetter for DelimiterTypesetter {
    fn typeset(
        &self,
        region: &dyn ResultsView,
        options: &TypesetOptions,
    ) -> Result<(), TypesetError> {
        let typeset = self.typeset_markup(&region.markup(), options)?;
        region.set_markup(typeset);
        Ok(())
    }
}

/// First occurrence of `pattern` in `text` not preceded by a backslash
fn find_unescaped(text: &str, pattern: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = text[from..].find(pattern) {
        let pos = from + found;
        if pos > 0 && text[..pos].ends_with('\\') {
            from = pos + pattern.len();
            continue;
        }
        return Some(pos);
    }
    None
}

/// Earliest unescaped left delimiter in `text`, longest first on ties
fn next_delimiter<'a>(
    text: &str,
    delimiters: &'a [MathDelimiter],
) -> Option<(usize, &'a MathDelimiter)> {
    let mut best: Option<(usize, &MathDelimiter)> = None;

    for delimiter in delimiters.iter().filter(|d| !d.left.is_empty()) {
        let Some(pos) = find_unescaped(text, &delimiter.left) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((best_pos, best_delim)) => {
                pos < best_pos || (pos == best_pos && delimiter.left.len() > best_delim.left.len())
            }
        };
        if better {
            best = Some((pos, delimiter));
        }
    }

    best
}

fn typeset_text(
    text: &str,
    options: &TypesetOptions,
    out: &mut String,
) -> Result<(), TypesetError> {
    let mut rest = text;

    while let Some((pos, delimiter)) = next_delimiter(rest, &options.delimiters) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + delimiter.left.len()..];

        match find_unescaped(after, &delimiter.right).filter(|&end| end > 0) {
            Some(end) => {
                let mode = if delimiter.display { "display" } else { "inline" };
                out.push_str(&format!(
                    r#"<span class="math {}">{}</span>"#,
                    mode,
                    &after[..end]
                ));
                rest = &after[end + delimiter.right.len()..];
            }
            None if options.throw_on_error => {
                return Err(TypesetError::Unbalanced(delimiter.left.clone()));
            }
            None => {
                out.push_str(&delimiter.left);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(())
}
