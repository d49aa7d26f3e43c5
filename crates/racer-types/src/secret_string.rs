//! Secure string type for private key material.
//!
//! `SecretString` wraps sensitive string data so that it is zeroed on
//! drop and redacted in every display path. The signing key from the
//! configuration file travels through the harness as this type and is
//! only exposed at the single point where the signer is constructed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

const REDACTED: &str = "***REDACTED***";

/// A string whose contents are zeroed on drop and never printed.
#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
	/// Wraps an owned string as secret material.
	pub fn new(s: String) -> Self {
		Self(Zeroizing::new(s))
	}

	/// Exposes the secret as a string slice.
	///
	/// The caller is responsible for keeping the exposed value out of
	/// logs and error messages.
	pub fn expose_secret(&self) -> &str {
		&self.0
	}

	/// Runs a closure over the exposed secret, limiting the scope in
	/// which the plain value exists.
	pub fn with_exposed<F, R>(&self, f: F) -> R
	where
		F: FnOnce(&str) -> R,
	{
		f(&self.0)
	}

	/// Returns the length of the secret in bytes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if the secret is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<&str> for SecretString {
	fn from(s: &str) -> Self {
		Self::new(s.to_string())
	}
}

impl From<String> for SecretString {
	fn from(s: String) -> Self {
		Self::new(s)
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretString({})", REDACTED)
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", REDACTED)
	}
}

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.0.as_str() == other.0.as_str()
	}
}

impl Eq for SecretString {}

// Serialization always redacts; secrets only ever enter through
// deserialization of the configuration file.
impl Serialize for SecretString {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(REDACTED)
	}
}

impl<'de> Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		Ok(SecretString::new(s))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_debug_and_display_redact() {
		let secret = SecretString::from("0xac0974bec39a17e36ba4a6b4d238ff944bacb478");
		assert_eq!(format!("{:?}", secret), "SecretString(***REDACTED***)");
		assert_eq!(format!("{}", secret), "***REDACTED***");
		assert!(!format!("{:?}", secret).contains("ac0974"));
	}

	#[test]
	fn test_expose_secret() {
		let secret = SecretString::from("hunter2");
		assert_eq!(secret.expose_secret(), "hunter2");
		assert_eq!(secret.len(), 7);
		assert!(!secret.is_empty());
	}

	#[test]
	fn test_with_exposed_scopes_access() {
		let secret = SecretString::from("key-material");
		let parsed_len = secret.with_exposed(|s| {
			assert_eq!(s, "key-material");
			s.len()
		});
		assert_eq!(parsed_len, 12);
	}

	#[test]
	fn test_equality() {
		assert_eq!(SecretString::from("a"), SecretString::from("a"));
		assert_ne!(SecretString::from("a"), SecretString::from("b"));
	}
}
