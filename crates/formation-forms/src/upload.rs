//! File upload action
//!
//! The client script posts selected files together with the upload nonce.
//! [`UploadAction`] checks the nonce and hands the file to the host's
//! [`FileUploadProcessor`]; the JSON description of the stored file is sent
//! back so the script can fill the hidden input of the file field.

use crate::assets::upload_nonce_name;
use crate::nonce::NonceManager;
use bytes::Bytes;
use formation_conf::Settings;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
	#[error("Not allowed")]
	NotAllowed,
	#[error("{0}")]
	Processing(#[from] anyhow::Error),
	#[error("Cannot encode stored file: {0}")]
	Encode(#[from] serde_json::Error),
}

pub type UploadResult<T> = Result<T, UploadError>;

/// A file received from the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
	pub filename: String,
	pub content_type: String,
	pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
	/// Value of the `{namespace}_upload_file_nonce` parameter
	pub nonce: String,
	pub file: UploadedFile,
}

/// Where a processed upload ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
	pub path: PathBuf,
	pub url: String,
}

/// Upload directory and its public URL, taken from the settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
	pub dir: PathBuf,
	pub url: String,
}

impl UploadTarget {
	pub fn from_settings(settings: &Settings) -> Self {
		Self {
			dir: settings.uploads_dir.clone(),
			url: settings.uploads_url.trim_end_matches('/').to_string(),
		}
	}
}

/// Host storage for uploaded files
pub trait FileUploadProcessor: Send + Sync {
	fn process(&self, file: &UploadedFile, target: &UploadTarget) -> anyhow::Result<StoredFile>;
}

/// Nonce-checked upload endpoint
#[derive(Clone)]
pub struct UploadAction {
	nonces: NonceManager,
	nonce_name: String,
	target: UploadTarget,
	processor: Arc<dyn FileUploadProcessor>,
}

impl UploadAction {
	pub fn new(settings: &Settings, nonces: NonceManager, processor: Arc<dyn FileUploadProcessor>) -> Self {
		Self {
			nonces,
			nonce_name: upload_nonce_name(settings),
			target: UploadTarget::from_settings(settings),
			processor,
		}
	}

	/// Verify the nonce and store the file
	pub fn process(&self, request: &UploadRequest) -> UploadResult<StoredFile> {
		if !self.nonces.verify(&self.nonce_name, &request.nonce) {
			return Err(UploadError::NotAllowed);
		}
		Ok(self.processor.process(&request.file, &self.target)?)
	}

	/// Run the action and build the HTTP response: the stored file as JSON,
	/// or status 500 with the error message as plain text.
	pub fn handle(&self, request: &UploadRequest) -> Response<Bytes> {
		let result = self
			.process(request)
			.and_then(|stored| Ok(serde_json::to_vec(&stored)?));

		match result {
			Ok(body) => {
				tracing::debug!(filename = %request.file.filename, "Stored uploaded file");
				response(StatusCode::OK, "application/json", Bytes::from(body))
			}
			Err(error) => {
				tracing::warn!(filename = %request.file.filename, error = %error, "Rejected file upload");
				response(
					StatusCode::INTERNAL_SERVER_ERROR,
					"text/plain; charset=utf-8",
					Bytes::from(error.to_string()),
				)
			}
		}
	}
}

impl std::fmt::Debug for UploadAction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("UploadAction")
			.field("nonce_name", &self.nonce_name)
			.field("target", &self.target)
			.finish_non_exhaustive()
	}
}

pub(crate) fn response(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Bytes> {
	let mut response = Response::new(body);
	*response.status_mut() = status;
	response
		.headers_mut()
		.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
	response
}
