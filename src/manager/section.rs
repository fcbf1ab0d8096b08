use indexmap::IndexMap;

use super::Pass;
use crate::error::ConfigError;


/// Body of a section that cannot fail.
pub type PureBody<S> = Box<dyn FnMut(&mut Pass<'_>, &mut S)>;

/// Body of a section that reports success (`true`) or failure (`false`).
pub type FallibleBody<S> = Box<dyn FnMut(&mut Pass<'_>, &mut S) -> bool>;


/// A named unit of configuration: the callback that reads or writes
/// the fields of one top-level table.
///
/// The same body runs for both loading and saving; [`Pass::field`] decides
/// the direction.
pub enum Section<S> {
    Pure(PureBody<S>),
    Fallible(FallibleBody<S>),
}

impl<S> Section<S> {
    pub fn pure<F>(body: F) -> Self
    where
        F: FnMut(&mut Pass<'_>, &mut S) + 'static,
    {
        Self::Pure(Box::new(body))
    }

    pub fn fallible<F>(body: F) -> Self
    where
        F: FnMut(&mut Pass<'_>, &mut S) -> bool + 'static,
    {
        Self::Fallible(Box::new(body))
    }

    /// Runs the body. Pure bodies always succeed.
    pub(crate) fn run(&mut self, pass: &mut Pass<'_>, state: &mut S) -> bool {
        match self {
            Section::Pure(body) => {
                body(pass, state);
                true
            }
            Section::Fallible(body) => body(pass, state),
        }
    }
}

impl<S> std::fmt::Debug for Section<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Pure(_) => f.write_str("Section::Pure"),
            Section::Fallible(_) => f.write_str("Section::Fallible"),
        }
    }
}



/// Sections keyed by name, kept in registration order.
///
/// Registration order is traversal order, and therefore document layout.
pub struct SectionRegistry<S> {
    sections: IndexMap<String, Section<S>>,
}

impl<S> SectionRegistry<S> {
    pub fn new() -> Self {
        Self {
            sections: IndexMap::new(),
        }
    }

    pub fn register(&mut self, name: String, section: Section<S>) -> Result<(), ConfigError> {
        if self.sections.contains_key(&name) {
            return Err(ConfigError::DuplicateSection { name });
        }

        self.sections.insert(name, section);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Section<S>, ConfigError> {
        // `shift_remove` keeps the remaining sections in registration order.
        self.sections
            .shift_remove(name)
            .ok_or_else(|| ConfigError::MissingSection {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Section<S>)> {
        self.sections.iter_mut()
    }
}

impl<S> Default for SectionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
