//! The dashboard password, strength-checked with zxcvbn and stored as a bcrypt hash.

use std::fmt::Debug;

use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// The lowest zxcvbn score accepted for the dashboard password.
const MIN_SCORE: Score = Score::Three;

/// A plain text password that is hard enough to guess to protect the dashboard.
#[derive(Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Accept `raw_password` if zxcvbn scores it at least three out of four.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with zxcvbn's advice on making it stronger.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let entropy = zxcvbn(raw_password, &[]);

        if entropy.score() >= MIN_SCORE {
            return Ok(Self(raw_password.to_owned()));
        }

        let advice = entropy
            .feedback()
            .map(ToString::to_string)
            .unwrap_or_else(|| "use a longer password".to_owned());

        Err(Error::TooWeak(advice))
    }

    /// Skip the strength check, for test databases that use "test".
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Debug for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValidatedPassword(********)")
    }
}

/// A salted bcrypt hash of the dashboard password.
#[derive(Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost used for the real password.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with the bcrypt work factor `cost`.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt rejects the cost.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash that was read back from the database.
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    /// The hash in the modular crypt format bcrypt writes.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `password` is the one this hash was made from.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash is malformed.
    pub fn verify(&self, password: &str) -> Result<bool, Error> {
        bcrypt::verify(password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

#[cfg(test)]
mod password_tests {
    use crate::Error;

    use super::{PasswordHash, ValidatedPassword};

    #[test]
    fn rejects_guessable_passwords() {
        for password in ["", "wedding2024", "password1234"] {
            assert!(
                matches!(ValidatedPassword::new(password), Err(Error::TooWeak(_))),
                "{password:?} should be too weak"
            );
        }
    }

    #[test]
    fn accepts_long_passphrase() {
        assert!(ValidatedPassword::new("confetti-under-the-old-oak-tree").is_ok());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let password = ValidatedPassword::new_unchecked("hunter2");
        let hash = PasswordHash::new(password.clone(), 4).unwrap();

        assert!(!format!("{password:?}").contains("hunter2"));
        assert!(!format!("{hash:?}").contains(hash.as_str()));
    }

    #[test]
    fn hash_only_verifies_its_own_password() {
        let password = ValidatedPassword::new("bouquet-toss-at-midnight").unwrap();

        let hash = PasswordHash::new(password, 4).unwrap();

        assert!(hash.verify("bouquet-toss-at-midnight").unwrap());
        assert!(!hash.verify("bouquet-toss-at-noon").unwrap());
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let password = ValidatedPassword::new_unchecked("first-dance");

        let first = PasswordHash::new(password.clone(), 4).unwrap();
        let second = PasswordHash::new(password, 4).unwrap();

        assert_ne!(first, second);
        assert!(second.verify("first-dance").unwrap());
    }

    #[test]
    fn stored_hash_round_trips_through_the_database_format() {
        let stored = PasswordHash::new(ValidatedPassword::new_unchecked("vows"), 4)
            .unwrap()
            .as_str()
            .to_owned();

        assert!(PasswordHash::from_stored(stored).verify("vows").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let hash = PasswordHash::from_stored("not a bcrypt hash".to_owned());

        assert!(matches!(hash.verify("vows"), Err(Error::HashingError(_))));
    }
}
