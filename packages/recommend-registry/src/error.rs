use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown variant '{0}'")]
    UnknownVariant(String),

    #[error("no variant is active for this family")]
    NoActiveVariant,
}
