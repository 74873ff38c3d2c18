use crate::store;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AdminUser,
    Collection,
    SearchIndex,
}

#[derive(Debug)]
pub enum Error {
    MissingField(&'static str),
    NotReady {
        attempts: u32,
        last: store::Error,
    },
    Step {
        step: Step,
        source: store::Error,
    },
    IndexConflict {
        name: String,
        existing: store::IndexSpec,
        wanted: store::IndexSpec,
    },
}

impl Error {
    pub fn step(step: Step) -> impl FnOnce(store::Error) -> Self {
        move |source| Self::Step { step, source }
    }
}

// region:    --- Error Boilerplate
impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}
impl std::error::Error for Error {}
// endregion: --- Error Boilerplate
