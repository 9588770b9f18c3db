/// Errors raised while parsing a bech32m address.
#[derive(Debug, thiserror::Error)]
pub enum Bech32ParseError {
    /// The string is not valid bech32.
    #[error("Bech32 error: {0}")]
    Bech32(#[from] bech32::Error),
    /// The human readable part is not [`crate::HRP`].
    #[error("Wrong HRP: {0}")]
    WrongHRP(String),
    /// The decoded payload is not 32 bytes long.
    #[error("Wrong address length: {0}, expected 32 bytes")]
    WrongLength(usize),
}

/// General error type in the Module System.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// Custom error thrown by a module.
    #[error(transparent)]
    ModuleError(#[from] anyhow::Error),
}

impl ModuleError {
    /// Returns the module specific error carried by this error, if it has type `E`.
    ///
    /// The whole error chain is searched, so context added with
    /// [`anyhow::Context`] does not hide the original cause.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        let Self::ModuleError(err) = self;
        err.chain().find_map(|cause| cause.downcast_ref::<E>())
    }
}
