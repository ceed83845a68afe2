//! Simple file-backed [`SessionStore`] for CLI tools and long-running daemons.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::SessionTokens,
	store::{SessionStore, StoreError, StoreFuture},
};

/// Persists the session to a JSON file after each mutation.
///
/// The on-disk shape is a single object under the `token`/`refresh` keys, mirroring the
/// serde representation of [`SessionTokens`].
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Option<SessionTokens>>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading an existing session.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<Option<SessionTokens>, StoreError> {
		if !path.exists() {
			return Ok(None);
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(None);
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let tokens = serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})?;

		Ok(Some(tokens))
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &Option<SessionTokens>) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		match contents {
			Some(tokens) => {
				let serialized =
					serde_json::to_vec_pretty(tokens).map_err(|e| StoreError::Serialization {
						message: format!("Failed to serialize session snapshot: {e}"),
					})?;
				let mut tmp_path = self.path.clone();

				tmp_path.set_extension("tmp");

				{
					let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
						message: format!("Failed to create {}: {e}", tmp_path.display()),
					})?;

					file.write_all(&serialized).map_err(|e| StoreError::Backend {
						message: format!("Failed to write {}: {e}", tmp_path.display()),
					})?;
					file.sync_all().map_err(|e| StoreError::Backend {
						message: format!("Failed to sync {}: {e}", tmp_path.display()),
					})?;
				}

				fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
					message: format!("Failed to replace {}: {e}", self.path.display()),
				})
			},
			None =>
				if self.path.exists() {
					fs::remove_file(&self.path).map_err(|e| StoreError::Backend {
						message: format!("Failed to remove {}: {e}", self.path.display()),
					})
				} else {
					Ok(())
				},
		}
	}
}
impl SessionStore for FileStore {
	fn load(&self) -> StoreFuture<'_, Option<SessionTokens>> {
		Box::pin(async move { Ok(self.inner.read().clone()) })
	}

	fn save(&self, tokens: SessionTokens) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			*guard = Some(tokens);
			self.persist_locked(&guard)?;

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			*guard = None;
			self.persist_locked(&guard)?;

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process, time::SystemTime};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::auth::TokenSecret;

	fn temp_path() -> PathBuf {
		let stamp = SystemTime::now()
			.duration_since(SystemTime::UNIX_EPOCH)
			.expect("Clock should be past the epoch.")
			.as_nanos();
		let unique = format!("marquee_client_file_store_{}_{stamp}.json", process::id());

		env::temp_dir().join(unique)
	}

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_path();
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let tokens = SessionTokens::new(TokenSecret::new("A1"), Some(TokenSecret::new("R1")));
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.save(tokens.clone())).expect("Failed to save session to file store.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let fetched = rt
			.block_on(reopened.load())
			.expect("Failed to load session from file store.")
			.expect("File store lost session after reopen.");

		assert_eq!(fetched, tokens);

		rt.block_on(reopened.clear()).expect("Failed to clear file store session.");

		assert!(!path.exists());
	}
}
