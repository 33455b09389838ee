//! Output filename templating.
//!
//! Templates recognise `{name}`, `{os}`, `{OS}` and `{arch}`. Both OS spellings
//! map to the job's operating system. Substitution is a single left-to-right
//! pass: substituted values are never re-scanned, so a `{name}` value that
//! happens to contain `{arch}` is copied literally. Anything else in braces is
//! left untouched.

use crate::consts::{DEFAULT_OUTPUT_TEMPLATE, EXE_SUFFIX};

#[derive(Debug, Clone, Copy)]
enum Placeholder {
  Name,
  Os,
  Arch,
}

const PLACEHOLDERS: &[(&str, Placeholder)] = &[
  ("{name}", Placeholder::Name),
  ("{os}", Placeholder::Os),
  ("{OS}", Placeholder::Os),
  ("{arch}", Placeholder::Arch),
];

/// An immutable filename template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate(String);

impl OutputTemplate {
  pub fn new(template: impl Into<String>) -> Self {
    Self(template.into())
  }

  /// Substitute placeholders.
  pub fn render(&self, name: &str, os: &str, arch: &str) -> String {
    let mut out = String::with_capacity(self.0.len() + name.len() + os.len() + arch.len());
    let mut rest = self.0.as_str();

    while let Some(start) = rest.find('{') {
      out.push_str(&rest[..start]);
      let tail = &rest[start..];

      match PLACEHOLDERS.iter().find(|(token, _)| tail.starts_with(token)) {
        Some((token, placeholder)) => {
          out.push_str(match placeholder {
            Placeholder::Name => name,
            Placeholder::Os => os,
            Placeholder::Arch => arch,
          });
          rest = &tail[token.len()..];
        }
        None => {
          out.push('{');
          rest = &tail[1..];
        }
      }
    }

    out.push_str(rest);
    out
  }

  /// Render and, when requested, append the executable suffix.
  pub fn filename(&self, name: &str, os: &str, arch: &str, exe_suffix: bool) -> String {
    let mut filename = self.render(name, os, arch);
    if exe_suffix {
      filename.push_str(EXE_SUFFIX);
    }
    filename
  }
}

impl Default for OutputTemplate {
  fn default() -> Self {
    Self::new(DEFAULT_OUTPUT_TEMPLATE)
  }
}

/// Index of the argument naming the output file: the one right after the
/// first occurrence of `flag`. `None` if the flag is absent or last.
pub fn output_value_index(args: &[String], flag: &str) -> Option<usize> {
  let index = args.iter().position(|a| a == flag)? + 1;
  (index < args.len()).then_some(index)
}
