use std::str::FromStr;

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// How a password is turned into the value persisted with the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordStorage {
    /// Store exactly what the user typed. Unsafe outside local testing.
    Plaintext,
    /// Argon2id PHC string with a random salt.
    #[default]
    Argon2,
}

impl FromStr for PasswordStorage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "plain" => Ok(Self::Plaintext),
            "argon2" => Ok(Self::Argon2),
            other => anyhow::bail!("unknown password storage {other:?}"),
        }
    }
}

impl PasswordStorage {
    pub fn seal(&self, plain: &str) -> anyhow::Result<String> {
        match self {
            Self::Plaintext => Ok(plain.to_string()),
            Self::Argon2 => hash_password(plain),
        }
    }
}

fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use argon2::{PasswordHash, PasswordVerifier};

    use super::*;

    #[test]
    fn plaintext_is_passed_through() {
        let sealed = PasswordStorage::Plaintext.seal("pw123").unwrap();
        assert_eq!(sealed, "pw123");
    }

    #[test]
    fn argon2_output_verifies_against_plain_password() {
        let password = "Secur3P@ssw0rd!";
        let sealed = PasswordStorage::Argon2.seal(password).expect("hashing should succeed");
        assert_ne!(sealed, password);

        let parsed = PasswordHash::new(&sealed).expect("PHC string");
        assert!(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"wrong-password", &parsed).is_err());
    }

    #[test]
    fn argon2_salts_every_hash() {
        let a = PasswordStorage::Argon2.seal("same").unwrap();
        let b = PasswordStorage::Argon2.seal("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn parses_storage_names() {
        assert_eq!("argon2".parse::<PasswordStorage>().unwrap(), PasswordStorage::Argon2);
        assert_eq!("Plaintext".parse::<PasswordStorage>().unwrap(), PasswordStorage::Plaintext);
        assert!("md5".parse::<PasswordStorage>().is_err());
    }
}
