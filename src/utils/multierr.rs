use std::fmt;

/// Several independent failures reported together, one per line.
#[derive(Debug)]
pub struct MultiError<E> {
    errors: Vec<E>,
}

impl<E> MultiError<E> {
    pub fn new(errors: Vec<E>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<E: fmt::Display> fmt::Display for MultiError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure(s):", self.errors.len())?;
        for error in self.errors.iter() {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}
