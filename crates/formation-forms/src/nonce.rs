//! Action nonces
//!
//! A nonce is an HMAC-SHA256 signature of an action name and a time tick,
//! encoded with URL-safe base64. A nonce stays valid for the tick it was
//! created in and the following one, i.e. between one and two
//! [`NONCE_TICK_SECONDS`] periods.

use base64::{Engine as _, engine::general_purpose};
use formation_conf::Settings;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of one nonce tick (12 hours)
pub const NONCE_TICK_SECONDS: u64 = 12 * 60 * 60;

/// Creates and verifies action nonces
#[derive(Clone)]
pub struct NonceManager {
	secret: Vec<u8>,
}

impl NonceManager {
	pub fn new(secret: impl AsRef<[u8]>) -> Self {
		Self {
			secret: secret.as_ref().to_vec(),
		}
	}

	pub fn from_settings(settings: &Settings) -> Self {
		if settings.nonce_secret.is_empty() {
			tracing::warn!("Nonce secret is empty; upload nonces are forgeable");
		}
		Self::new(settings.nonce_secret.as_bytes())
	}

	/// Create a nonce for `action` valid from now
	pub fn create(&self, action: &str) -> String {
		self.create_at(action, unix_now())
	}

	/// Verify a nonce for `action` against the current time
	pub fn verify(&self, action: &str, nonce: &str) -> bool {
		self.verify_at(action, nonce, unix_now())
	}

	pub fn create_at(&self, action: &str, now: u64) -> String {
		general_purpose::URL_SAFE_NO_PAD.encode(self.signature(action, tick(now)))
	}

	/// # Examples
	///
	/// ```
	/// use formation_forms::nonce::{NONCE_TICK_SECONDS, NonceManager};
	///
	/// let nonces = NonceManager::new("secret");
	/// let nonce = nonces.create_at("upload_file", 1_000);
	///
	/// assert!(nonces.verify_at("upload_file", &nonce, 1_000 + NONCE_TICK_SECONDS));
	/// assert!(!nonces.verify_at("upload_file", &nonce, 1_000 + 2 * NONCE_TICK_SECONDS));
	/// assert!(!nonces.verify_at("delete_file", &nonce, 1_000));
	/// ```
	pub fn verify_at(&self, action: &str, nonce: &str, now: u64) -> bool {
		let Ok(provided) = general_purpose::URL_SAFE_NO_PAD.decode(nonce) else {
			return false;
		};

		let current = tick(now);
		[current, current.saturating_sub(1)]
			.into_iter()
			.any(|tick| self.mac(action, tick).verify_slice(&provided).is_ok())
	}

	fn mac(&self, action: &str, tick: u64) -> HmacSha256 {
		let mut mac = HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
		mac.update(format!("{}|{}", tick, action).as_bytes());
		mac
	}

	fn signature(&self, action: &str, tick: u64) -> Vec<u8> {
		self.mac(action, tick).finalize().into_bytes().to_vec()
	}
}

impl std::fmt::Debug for NonceManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NonceManager").finish_non_exhaustive()
	}
}

fn tick(now: u64) -> u64 {
	now / NONCE_TICK_SECONDS
}

fn unix_now() -> u64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|elapsed| elapsed.as_secs())
		.unwrap_or_default()
}
