use crate::{provision, store};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    // config
    ConfigMissingEnv(&'static str),
    ConfigParseInt { var_name: String },
    ConfigDotEnv(String),

    // store
    Store(store::Error),

    // provision
    Provision(provision::Error),
}

// region:    --- Error Boilerplate
impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}
impl std::error::Error for Error {}
// endregion: --- Error Boilerplate

// region:   --- error from
impl From<provision::Error> for Error {
    fn from(err: provision::Error) -> Self {
        Self::Provision(err)
    }
}

impl From<store::Error> for Error {
    fn from(err: store::Error) -> Self {
        Self::Store(err)
    }
}
// endregion: --- error from
