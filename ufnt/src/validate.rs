//! The pre-encoding validation pass

use std::fmt::{Debug, Display};

/// Validation of build inputs before any glyph is rasterized.
///
/// Some requirements on the inputs (ranges must not be inverted, strict
/// builds must not overlap) are awkward to encode in the type system.
/// They are enforced via a validation pass that collects every problem
/// rather than stopping at the first one.
pub trait Validate {
    /// Ensure that this item is well-formed, reporting any errors.
    ///
    /// This calls [validate_impl][Self::validate_impl] and collects any errors.
    fn validate(&self) -> Result<(), ValidationReport> {
        let mut ctx = ValidationCtx::default();
        self.validate_impl(&mut ctx);
        if ctx.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport { errors: ctx.errors })
        }
    }

    /// Validate this item.
    ///
    /// An implementation should look something like:
    ///
    /// ```rust
    /// # use ufnt::validate::{Validate, ValidationCtx};
    /// struct Sizes {
    ///     sizes: Vec<u32>,
    /// }
    ///
    /// impl Validate for Sizes {
    ///     fn validate_impl(&self, ctx: &mut ValidationCtx) {
    ///         ctx.in_table("Sizes", |ctx| {
    ///             ctx.in_field("sizes", |ctx| {
    ///                 if self.sizes.is_empty() {
    ///                     ctx.report("no sizes given");
    ///                 }
    ///             })
    ///         })
    ///     }
    /// }
    /// ```
    fn validate_impl(&self, ctx: &mut ValidationCtx);
}

/// A context for collecting validation errors.
///
/// This is responsible for tracking the position at which a given error
/// is reported, via calls to methods like [in_table][Self::in_table] and
/// [in_field][Self::in_field].
#[derive(Clone, Debug, Default)]
pub struct ValidationCtx {
    cur_location: Vec<LocationElem>,
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
struct ValidationError {
    error: String,
    location: Vec<LocationElem>,
}

/// One or more validation errors.
#[derive(Clone)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
enum LocationElem {
    Table(&'static str),
    Field(&'static str),
    Index(usize),
}

impl ValidationCtx {
    /// Run the provided closure in the context of a new table.
    ///
    /// Errors reported in the closure will include the provided identifier
    /// in their path.
    pub fn in_table(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Table(name), f);
    }

    /// Run the provided closure in the context of a new field.
    pub fn in_field(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Field(name), f);
    }

    /// Run the provided closure in the context of an array.
    pub fn in_array(&mut self, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Index(0), f);
    }

    /// Run the provided closure in the context of a new array item.
    ///
    /// This must only be called in a closure passed to [in_array][Self::in_array].
    pub fn array_item(&mut self, f: impl FnOnce(&mut ValidationCtx)) {
        debug_assert!(matches!(
            self.cur_location.last(),
            Some(LocationElem::Index(_))
        ));
        f(self);
        if let Some(LocationElem::Index(i)) = self.cur_location.last_mut() {
            *i += 1;
        }
    }

    /// Report a new error, associating it with the current path.
    pub fn report(&mut self, msg: impl Display) {
        self.errors.push(ValidationError {
            location: self.cur_location.clone(),
            error: msg.to_string(),
        });
    }

    fn with_elem(&mut self, elem: LocationElem, f: impl FnOnce(&mut ValidationCtx)) {
        self.cur_location.push(elem);
        f(self);
        self.cur_location.pop();
    }
}

impl ValidationReport {
    /// The number of problems found.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false`; a report is only produced when something was wrong.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The reported messages, without their locations.
    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.errors.iter().map(|e| e.error.as_str())
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let [error] = self.errors.as_slice() {
            return write!(f, "validation error: {error}");
        }

        write!(f, "{} validation errors:", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "\n#{} {error}", i + 1)?;
        }
        Ok(())
    }
}

impl Debug for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl std::error::Error for ValidationReport {}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.error)?;
        if self.location.is_empty() {
            return Ok(());
        }
        write!(f, " in ")?;
        for (i, elem) in self.location.iter().enumerate() {
            match elem {
                LocationElem::Table(name) if i == 0 => write!(f, "{name}"),
                LocationElem::Table(name) => write!(f, " > {name}"),
                LocationElem::Field(name) => write!(f, ".{name}"),
                LocationElem::Index(idx) => write!(f, "[{idx}]"),
            }?;
        }
        Ok(())
    }
}
