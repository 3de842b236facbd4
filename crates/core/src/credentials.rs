use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const PASSWORD_PREFIX: &str = "PnG";
const PASSWORD_SUFFIX_LEN: usize = 8;
const PASSWORD_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// One-time password provisioned client-side when approving a driver. Sent to
/// the gateway once so the backend can create login credentials; never stored
/// past the request that carries it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvisionedPassword(String);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PasswordFormatError {
    #[error("provisioned password must start with `{PASSWORD_PREFIX}`")]
    MissingPrefix,
    #[error("provisioned password must carry exactly {PASSWORD_SUFFIX_LEN} characters after the prefix, got {0}")]
    WrongSuffixLength(usize),
    #[error("provisioned password suffix must be uppercase base-36, found `{0}`")]
    InvalidSuffixCharacter(char),
}

impl ProvisionedPassword {
    pub fn parse(raw: impl Into<String>) -> Result<Self, PasswordFormatError> {
        let raw = raw.into();
        let suffix = raw.strip_prefix(PASSWORD_PREFIX).ok_or(PasswordFormatError::MissingPrefix)?;
        if suffix.chars().count() != PASSWORD_SUFFIX_LEN {
            return Err(PasswordFormatError::WrongSuffixLength(suffix.chars().count()));
        }
        if let Some(bad) =
            suffix.chars().find(|ch| !ch.is_ascii_uppercase() && !ch.is_ascii_digit())
        {
            return Err(PasswordFormatError::InvalidSuffixCharacter(bad));
        }
        Ok(Self(raw))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

/// Source of provisioned passwords. A seam so the review flows can be tested
/// with a deterministic sequence instead of thread-local randomness.
pub trait PasswordProvisioner: Send + Sync {
    fn provision(&self) -> ProvisionedPassword;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPasswordProvisioner;

impl PasswordProvisioner for RandomPasswordProvisioner {
    fn provision(&self) -> ProvisionedPassword {
        let mut rng = rand::thread_rng();
        let mut value = String::with_capacity(PASSWORD_PREFIX.len() + PASSWORD_SUFFIX_LEN);
        value.push_str(PASSWORD_PREFIX);
        for _ in 0..PASSWORD_SUFFIX_LEN {
            let index = rng.gen_range(0..PASSWORD_ALPHABET.len());
            value.push(PASSWORD_ALPHABET[index] as char);
        }
        ProvisionedPassword(value)
    }
}
