//! Objective-C selectors and Swift names for members.

use std::fmt;

use smallvec::SmallVec;

use crate::names::capitalize;

/// Extra trailing channel a member's foreign signature carries.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Channel {
    None,
    /// Trailing `NSError **` out-parameter.
    ErrorOut,
    /// Trailing completion block.
    Completion,
}

/// An Objective-C selector: one piece per argument, or a single name for
/// nullary methods.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Selector {
    pieces: SmallVec<[String; 4]>,
    nullary: bool,
}

impl Selector {
    pub fn nullary(name: impl Into<String>) -> Self {
        let mut pieces = SmallVec::new();
        pieces.push(name.into());
        Selector {
            pieces,
            nullary: true,
        }
    }

    pub fn keyword(pieces: impl IntoIterator<Item = String>) -> Self {
        Selector {
            pieces: pieces.into_iter().collect(),
            nullary: false,
        }
    }

    pub fn pieces(&self) -> &[String] {
        &self.pieces
    }

    /// Number of arguments the selector takes.
    pub fn arity(&self) -> usize {
        if self.nullary {
            0
        } else {
            self.pieces.len()
        }
    }

    pub fn is_nullary(&self) -> bool {
        self.nullary
    }

    pub fn name(&self) -> &str {
        self.pieces.first().map_or("", String::as_str)
    }

    /// Append `_` to the first piece. The Swift name is unaffected.
    #[must_use]
    pub(crate) fn escaped(mut self) -> Self {
        if let Some(first) = self.pieces.first_mut() {
            first.push('_');
        }
        self
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullary {
            return f.write_str(self.name());
        }
        for piece in &self.pieces {
            write!(f, "{piece}:")?;
        }
        Ok(())
    }
}

/// Shape of a call, from which selector candidates are derived.
#[derive(Clone, Debug)]
pub(crate) struct CallShape<'a> {
    pub name: &'a str,
    pub labels: Vec<&'a str>,
    /// Leading unlabeled receiver argument (hoisted members).
    pub receiver: bool,
    pub initializer: bool,
    pub channel: Channel,
}

struct Arg {
    label: String,
    swift: Option<String>,
    joiner: &'static str,
}

impl CallShape<'_> {
    /// The `k`-th disambiguation candidate: `k` underscores on the last
    /// parameter label, or on the name when there are no labels.
    pub fn candidate(&self, k: usize) -> (Selector, String) {
        let suffix = "_".repeat(k);
        let mut name = self.name.to_string();
        let mut args: Vec<Arg> = Vec::with_capacity(self.labels.len() + 2);
        if self.receiver {
            args.push(Arg {
                label: String::new(),
                swift: Some("_".to_string()),
                joiner: "",
            });
        }
        for label in &self.labels {
            args.push(Arg {
                label: (*label).to_string(),
                swift: Some((*label).to_string()),
                joiner: if self.initializer { "With" } else { "" },
            });
        }
        if self.labels.is_empty() {
            name.push_str(&suffix);
        } else if let Some(last) = args.last_mut() {
            last.label.push_str(&suffix);
            if let Some(swift) = &mut last.swift {
                swift.push_str(&suffix);
            }
        }
        match self.channel {
            Channel::None => {}
            Channel::ErrorOut => args.push(Arg {
                label: if args.is_empty() { "returnError" } else { "error" }.to_string(),
                swift: None,
                joiner: "And",
            }),
            Channel::Completion => args.push(Arg {
                label: "completionHandler".to_string(),
                swift: Some("completionHandler".to_string()),
                joiner: "With",
            }),
        }

        let swift_labels: String = args
            .iter()
            .filter_map(|arg| arg.swift.as_deref())
            .map(|label| format!("{label}:"))
            .collect();
        let swift_base = if self.initializer { "init" } else { name.as_str() };
        let swift = format!("{swift_base}({swift_labels})");

        if args.is_empty() {
            return (Selector::nullary(name), swift);
        }
        let pieces = args.iter().enumerate().map(|(i, arg)| {
            if i == 0 {
                if arg.label.is_empty() {
                    name.clone()
                } else {
                    format!("{name}{}{}", arg.joiner, capitalize(&arg.label))
                }
            } else {
                arg.label.clone()
            }
        });
        (Selector::keyword(pieces.collect::<Vec<_>>()), swift)
    }
}
