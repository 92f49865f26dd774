//! Route prefixes and header names shared by handlers and tests.

pub const API_PREFIX: &str = "/api";

/// Cookie written by the external auth library
pub const SESSION_COOKIE: &str = "better-auth.session_token";
pub const SECURE_SESSION_COOKIE: &str = "__Secure-better-auth.session_token";

/// Folders used for uploaded media
pub const IMAGE_FOLDER: &str = "uploads/images";
pub const VIDEO_FOLDER: &str = "uploads/videos";
